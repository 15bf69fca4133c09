use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use svg2lottie::curves::ArcHandles;
use svg2lottie::{convert_documents, ConvertOptions, PresentationStyleResolver, SvgDocument};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SVG files; more than one makes a flipbook in argument order
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Output JSON path (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,

    /// Frame rate
    #[arg(long, value_name = "N")]
    fps: Option<f64>,

    /// Length of a single-image animation, in frames
    #[arg(long, value_name = "FRAMES")]
    duration: Option<f64>,

    /// Fail on malformed path data and reference cycles
    #[arg(long)]
    strict: bool,

    /// Keep every contour of multi-contour paths
    #[arg(long)]
    all_subpaths: bool,

    /// Approximate arcs with handles that keep them on the ellipse
    #[arg(long)]
    exact_arcs: bool,

    /// JSON options file; flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> tracing_subscriber::filter::LevelFilter {
        match self {
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

impl Cli {
    /// Config file first, then command line overrides.
    fn options(&self) -> Result<ConvertOptions> {
        let mut options = match &self.config {
            Some(path) => ConvertOptions::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ConvertOptions::default(),
        };
        if let Some(fps) = self.fps {
            options.frame_rate = fps;
        }
        if let Some(duration) = self.duration {
            options.duration = duration;
        }
        options.strict |= self.strict;
        options.all_subpaths |= self.all_subpaths;
        if self.exact_arcs {
            options.arc_handles = ArcHandles::Exact;
        }
        Ok(options)
    }
}

fn init_logging(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.directive().into())
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.options()?;

    let mut documents = Vec::with_capacity(cli.inputs.len());
    for path in &cli.inputs {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let document = SvgDocument::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
        documents.push(document);
    }

    info!(inputs = documents.len(), fps = options.frame_rate, "Converting...");
    let animation =
        convert_documents(&documents, &PresentationStyleResolver, &options).context("Conversion failed")?;
    let json = animation.to_json(cli.pretty).context("Failed to serialize animation")?;

    match &cli.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_format);

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
