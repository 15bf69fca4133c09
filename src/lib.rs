//! # svg2lottie
//!
//! `svg2lottie` converts static SVG documents into Lottie animation JSON.
//!
//! One document becomes a single still layer. Several documents become a
//! flipbook: one layer per image, each visible for a short window of frames.
//!
//! The pipeline is `dom` (XML to node tree), `style` (per-node presentation
//! values), `scene` (node tree to nested shape groups) and `document`
//! (layers and timing). Output types live in the `lottie-data` crate.

/// Elliptical arc and quadratic to cubic conversion.
pub mod curves;
/// JSON-loadable conversion options.
pub mod config;
/// Animation assembly and frame timing.
pub mod document;
/// Owned SVG node tree.
pub mod dom;
pub mod errors;
/// Path data tokenizer and interpreter.
pub mod path_data;
/// `<use>` expansion.
pub mod reference;
/// Tree walk producing shape groups.
pub mod scene;
/// Geometry items for leaf elements.
pub mod shapes;
/// Style values and resolvers.
pub mod style;
/// Affine decomposition into Lottie transforms.
pub mod transform;

pub use config::ConvertOptions;
pub use dom::{SvgDocument, SvgElement, SvgNode};
pub use errors::{ConvertError, PathDataError};
pub use lottie_data::model::Animation;
pub use path_data::{parse_path_data, parse_path_data_strict, SubPath, Vertex};
pub use style::{PresentationStyleResolver, StyleResolver, StyleValues};

use tracing::instrument;

/// Converts parsed documents, resolving styles with `resolver`.
#[instrument(level = "info", skip_all, fields(sources = documents.len(), strict = options.strict))]
pub fn convert_documents(
    documents: &[SvgDocument],
    resolver: &dyn StyleResolver,
    options: &ConvertOptions,
) -> Result<Animation, ConvertError> {
    document::assemble(documents, resolver, options)
}

/// Parses each string as SVG and converts them with the presentation
/// attribute resolver.
pub fn convert_svg_strings(sources: &[&str], options: &ConvertOptions) -> Result<Animation, ConvertError> {
    let documents = sources
        .iter()
        .map(|text| SvgDocument::parse(text))
        .collect::<Result<Vec<_>, _>>()?;
    convert_documents(&documents, &PresentationStyleResolver, options)
}
