//! # Document Module
//!
//! Assembles the Lottie document from the per-source item lists.
//!
//! One source plays for the configured duration. Several sources play back
//! to back as a flipbook, each held for `max(1, round(fr / 5))` frames.

use crate::config::ConvertOptions;
use crate::dom::SvgDocument;
use crate::errors::ConvertError;
use crate::scene::SceneGraphBuilder;
use crate::style::StyleResolver;
use lottie_data::model::{Animation, Layer, Transform, SCHEMA_VERSION};
use tracing::{debug, instrument};

pub const DEFAULT_CANVAS_SIZE: f64 = 500.0;
pub const DOCUMENT_NAME: &str = "SVG Animation";

/// Frames each image is held for in sequence mode.
pub fn frames_per_image(frame_rate: f64) -> f64 {
    (frame_rate / 5.0).round().max(1.0)
}

/// Frame window `[ip, op)` of source `index` out of `count`.
pub fn layer_window(index: usize, count: usize, options: &ConvertOptions) -> (f64, f64) {
    if count <= 1 {
        return (0.0, options.duration);
    }
    let fpi = frames_per_image(options.frame_rate);
    (index as f64 * fpi, (index + 1) as f64 * fpi)
}

/// Converts `sources` into one document. The canvas is measured on the
/// first source only.
#[instrument(level = "debug", skip_all, fields(sources = sources.len()))]
pub fn assemble(
    sources: &[SvgDocument],
    resolver: &dyn StyleResolver,
    options: &ConvertOptions,
) -> Result<Animation, ConvertError> {
    let (width, height) = sources
        .first()
        .and_then(SvgDocument::dimensions)
        .unwrap_or((DEFAULT_CANVAS_SIZE, DEFAULT_CANVAS_SIZE));
    let center = [width / 2.0, height / 2.0];

    let count = sources.len();
    let mut layers = Vec::with_capacity(count);
    for (index, source) in sources.iter().enumerate() {
        let shapes = SceneGraphBuilder::new(source, resolver, options).build()?;
        let (ip, op) = layer_window(index, count, options);
        debug!(frame = index + 1, items = shapes.len(), ip, op, "built frame");
        layers.push(Layer::shape_layer(
            index as u32 + 1,
            format!("Frame {}", index + 1),
            Transform::new(center, center, [100.0, 100.0], 0.0),
            shapes,
            ip,
            op,
        ));
    }
    // Later frames draw underneath earlier ones.
    layers.reverse();

    let op = if count > 1 {
        count as f64 * frames_per_image(options.frame_rate)
    } else {
        options.duration
    };

    Ok(Animation {
        v: SCHEMA_VERSION.to_string(),
        fr: options.frame_rate,
        ip: 0.0,
        op,
        w: width,
        h: height,
        nm: Some(DOCUMENT_NAME.to_string()),
        ddd: 0,
        assets: Vec::new(),
        layers,
        markers: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_per_image() {
        assert_eq!(frames_per_image(30.0), 6.0);
        assert_eq!(frames_per_image(24.0), 5.0);
        assert_eq!(frames_per_image(60.0), 12.0);
        assert_eq!(frames_per_image(2.0), 1.0);
        assert_eq!(frames_per_image(0.0), 1.0);
    }

    #[test]
    fn test_layer_windows() {
        let options = ConvertOptions::default();
        assert_eq!(layer_window(0, 1, &options), (0.0, 60.0));
        assert_eq!(layer_window(0, 3, &options), (0.0, 6.0));
        assert_eq!(layer_window(2, 3, &options), (12.0, 18.0));
    }
}
