use thiserror::Error;

/// Failures that abort a conversion. Input-quality problems never end up
/// here unless strict mode asked for them.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Invalid SVG markup: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Root element is <{0}>, expected <svg>")]
    MissingSvgRoot(String),
    #[error(transparent)]
    PathData(#[from] PathDataError),
    #[error("Reference depth limit of {0} exceeded")]
    RecursionLimit(usize),
    #[error("Reference expansion budget of {0} exceeded")]
    ExpansionLimit(usize),
    #[error("Style resolution failed: {0}")]
    Style(String),
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Path data problems reported in strict mode. Offsets are byte offsets into
/// the `d` string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathDataError {
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedCharacter { offset: usize, found: char },
    #[error("unknown path command {letter:?} at offset {offset}")]
    UnknownCommand { offset: usize, letter: char },
    #[error("command {command:?} at offset {offset} takes arguments in groups of {expected}, found {found}")]
    IncompleteArguments {
        offset: usize,
        command: char,
        expected: usize,
        found: usize,
    },
}
