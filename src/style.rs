//! # Style Module
//!
//! Resolved presentation values for one node and the [`StyleResolver`] seam
//! the scene builder calls for every visited node.
//!
//! [`PresentationStyleResolver`] is the bundled implementation. It reads
//! presentation attributes and inline `style` declarations only; there is no
//! stylesheet cascade.

use crate::dom::SvgNode;
use crate::errors::ConvertError;
use crate::transform::parse_transform_origin;
use kurbo::{Affine, Point};
use lottie_data::model::{FillShape, Property, Shape, StrokeShape};
use std::str::FromStr;

/// An opaque-or-translucent color, channels in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub rgb: [f64; 3],
    pub alpha: f64,
}

impl Paint {
    pub const BLACK: Paint = Paint {
        rgb: [0.0, 0.0, 0.0],
        alpha: 1.0,
    };

    pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Paint {
            rgb: [red as f64 / 255.0, green as f64 / 255.0, blue as f64 / 255.0],
            alpha: alpha as f64 / 255.0,
        }
    }

    fn color(&self, ix: u32) -> Property<[f64; 4]> {
        Property::indexed([self.rgb[0], self.rgb[1], self.rgb[2], 1.0], ix)
    }

    /// `fl` item; `opacity` is in `0..=1` and the paint's own alpha is folded in.
    pub fn fill_shape(&self, opacity: f64) -> Shape {
        Shape::Fill(FillShape {
            nm: Some("Fill".to_string()),
            c: self.color(4),
            o: Property::indexed(opacity * self.alpha * 100.0, 5),
            r: 1,
        })
    }

    /// `st` item with round caps and joins.
    pub fn stroke_shape(&self, opacity: f64, width: f64) -> Shape {
        Shape::Stroke(StrokeShape {
            nm: Some("Stroke".to_string()),
            c: self.color(3),
            o: Property::indexed(opacity * self.alpha * 100.0, 4),
            w: Property::indexed(width, 5),
            lc: 1,
            lj: 1,
            ml: Some(4.0),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Inline,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

/// Style of one node after inheritance.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleValues {
    /// `None` means no fill is painted.
    pub fill: Option<Paint>,
    pub fill_opacity: f64,
    pub stroke: Option<Paint>,
    pub stroke_width: f64,
    pub stroke_opacity: f64,
    /// Value of `currentColor`.
    pub color: Paint,
    pub display: Display,
    pub visibility: Visibility,
    /// The node's own transform. Not inherited.
    pub transform: Option<Affine>,
    pub transform_origin: Option<Point>,
}

impl Default for StyleValues {
    fn default() -> Self {
        StyleValues {
            fill: Some(Paint::BLACK),
            fill_opacity: 1.0,
            stroke: None,
            stroke_width: 1.0,
            stroke_opacity: 1.0,
            color: Paint::BLACK,
            display: Display::Inline,
            visibility: Visibility::Visible,
            transform: None,
            transform_origin: None,
        }
    }
}

impl StyleValues {
    /// The starting point for a child: inherited properties kept,
    /// non-inherited ones reset.
    pub fn inherited(&self) -> StyleValues {
        StyleValues {
            display: Display::Inline,
            transform: None,
            transform_origin: None,
            ..self.clone()
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.display != Display::None && self.visibility == Visibility::Visible
    }

    /// Fill and stroke items for a leaf shape, in paint order.
    pub fn paint_shapes(&self) -> Vec<Shape> {
        let mut items = Vec::new();
        if let Some(fill) = self.fill.filter(|paint| paint.alpha > 0.0) {
            items.push(fill.fill_shape(self.fill_opacity));
        }
        if let Some(stroke) = self.stroke {
            if self.stroke_width > 0.0 {
                items.push(stroke.stroke_shape(self.stroke_opacity, self.stroke_width));
            }
        }
        items
    }
}

/// Computes the style of a node given its parent's style.
///
/// Called once per visited node, in document order.
pub trait StyleResolver {
    fn resolve(&self, node: &SvgNode, inherited: &StyleValues) -> Result<StyleValues, ConvertError>;
}

/// Resolves presentation attributes, then inline `style` declarations, which
/// take precedence. Unparsable values are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentationStyleResolver;

impl StyleResolver for PresentationStyleResolver {
    fn resolve(&self, node: &SvgNode, inherited: &StyleValues) -> Result<StyleValues, ConvertError> {
        let mut declarations: Vec<(&str, &str)> = node
            .attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        if let Some(style) = node.attribute("style") {
            declarations.extend(parse_declarations(style));
        }

        let mut values = inherited.inherited();
        // `currentColor` anywhere on the node refers to the node's own color.
        for (_, value) in declarations.iter().filter(|(name, _)| *name == "color") {
            if let Ok(color) = svgtypes::Color::from_str(value) {
                values.color = Paint::from_rgba8(color.red, color.green, color.blue, color.alpha);
            }
        }
        for (name, value) in declarations {
            apply_declaration(&mut values, inherited, name, value.trim());
        }
        Ok(values)
    }
}

fn parse_declarations(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style.split(';').filter_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        let name = name.trim();
        (!name.is_empty()).then_some((name, value.trim()))
    })
}

fn apply_declaration(values: &mut StyleValues, inherited: &StyleValues, name: &str, value: &str) {
    match name {
        "fill" => {
            if let Some(paint) = parse_paint(value, values.color, inherited.fill) {
                values.fill = paint;
            }
        }
        "stroke" => {
            if let Some(paint) = parse_paint(value, values.color, inherited.stroke) {
                values.stroke = paint;
            }
        }
        "fill-opacity" => {
            if let Some(opacity) = parse_opacity(value) {
                values.fill_opacity = opacity;
            }
        }
        "stroke-opacity" => {
            if let Some(opacity) = parse_opacity(value) {
                values.stroke_opacity = opacity;
            }
        }
        "stroke-width" => {
            if let Ok(width) = svgtypes::Length::from_str(value) {
                if width.unit != svgtypes::LengthUnit::Percent && width.number >= 0.0 {
                    values.stroke_width = width.number;
                }
            }
        }
        "display" => {
            values.display = if value == "none" { Display::None } else { Display::Inline };
        }
        "visibility" => match value {
            "visible" => values.visibility = Visibility::Visible,
            "hidden" => values.visibility = Visibility::Hidden,
            "collapse" => values.visibility = Visibility::Collapse,
            _ => {}
        },
        "transform" => {
            if let Ok(ts) = svgtypes::Transform::from_str(value) {
                values.transform = Some(Affine::new([ts.a, ts.b, ts.c, ts.d, ts.e, ts.f]));
            }
        }
        "transform-origin" => {
            if let Some(origin) = parse_transform_origin(value) {
                values.transform_origin = Some(origin);
            }
        }
        _ => {}
    }
}

/// `Some(None)` is an explicit "no paint"; `None` leaves the value untouched.
/// Gradient and pattern references are not supported and resolve to no paint.
fn parse_paint(value: &str, current_color: Paint, inherited: Option<Paint>) -> Option<Option<Paint>> {
    match svgtypes::Paint::from_str(value).ok()? {
        svgtypes::Paint::None => Some(None),
        svgtypes::Paint::Inherit => Some(inherited),
        svgtypes::Paint::CurrentColor => Some(Some(current_color)),
        svgtypes::Paint::Color(color) if color.alpha == 0 => Some(None),
        svgtypes::Paint::Color(color) => Some(Some(Paint::from_rgba8(
            color.red,
            color.green,
            color.blue,
            color.alpha,
        ))),
        _ => Some(None),
    }
}

fn parse_opacity(value: &str) -> Option<f64> {
    let length = svgtypes::Length::from_str(value).ok()?;
    let opacity = match length.unit {
        svgtypes::LengthUnit::None => length.number,
        svgtypes::LengthUnit::Percent => length.number / 100.0,
        _ => return None,
    };
    Some(opacity.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::SvgElement;

    fn resolve(node: SvgNode, inherited: &StyleValues) -> StyleValues {
        PresentationStyleResolver.resolve(&node, inherited).unwrap()
    }

    fn rect() -> SvgNode {
        SvgNode::new(
            "rect",
            SvgElement::Rect { x: 0.0, y: 0.0, width: 1.0, height: 1.0, rx: None, ry: None },
        )
    }

    #[test]
    fn test_defaults() {
        let values = resolve(rect(), &StyleValues::default());
        assert_eq!(values.fill, Some(Paint::BLACK));
        assert_eq!(values.stroke, None);
        assert_eq!(values.stroke_width, 1.0);
        assert!(values.is_rendered());
    }

    #[test]
    fn test_style_attribute_overrides_presentation_attribute() {
        let node = rect()
            .with_attribute("fill", "red")
            .with_attribute("style", "fill: #00ff00; stroke:blue ; stroke-width: 3px; fill-opacity: 50%");
        let values = resolve(node, &StyleValues::default());
        assert_eq!(values.fill, Some(Paint::from_rgba8(0, 255, 0, 255)));
        assert_eq!(values.stroke, Some(Paint::from_rgba8(0, 0, 255, 255)));
        assert_eq!(values.stroke_width, 3.0);
        assert_eq!(values.fill_opacity, 0.5);
    }

    #[test]
    fn test_current_color_and_inheritance() {
        let parent = resolve(
            SvgNode::new("g", SvgElement::Group)
                .with_attribute("color", "#ff0000")
                .with_attribute("stroke", "currentColor")
                .with_attribute("transform", "translate(5 5)"),
            &StyleValues::default(),
        );
        assert_eq!(parent.stroke, Some(Paint::from_rgba8(255, 0, 0, 255)));
        assert!(parent.transform.is_some());

        let child = resolve(rect().with_attribute("fill", "none"), &parent);
        assert_eq!(child.fill, None);
        assert_eq!(child.stroke, parent.stroke);
        assert_eq!(child.transform, None);
    }

    #[test]
    fn test_hidden_nodes() {
        let none = resolve(rect().with_attribute("style", "display:none"), &StyleValues::default());
        assert!(!none.is_rendered());
        let hidden = resolve(rect().with_attribute("visibility", "hidden"), &StyleValues::default());
        assert!(!hidden.is_rendered());
        // display does not inherit
        let child = resolve(rect(), &none);
        assert_eq!(child.display, Display::Inline);
    }

    #[test]
    fn test_unsupported_paint_and_transparent() {
        let values = resolve(
            rect().with_attribute("fill", "url(#grad)").with_attribute("stroke", "transparent"),
            &StyleValues::default(),
        );
        assert_eq!(values.fill, None);
        assert_eq!(values.stroke, None);
        let values = resolve(rect().with_attribute("fill", "not-a-color"), &StyleValues::default());
        assert_eq!(values.fill, Some(Paint::BLACK));
    }

    #[test]
    fn test_transform_and_origin() {
        let values = resolve(
            rect()
                .with_attribute("transform", "matrix(1 0 0 1 10 20)")
                .with_attribute("transform-origin", "50 50"),
            &StyleValues::default(),
        );
        assert_eq!(values.transform, Some(Affine::new([1.0, 0.0, 0.0, 1.0, 10.0, 20.0])));
        assert_eq!(values.transform_origin, Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_paint_shapes() {
        let values = StyleValues {
            fill: Some(Paint::from_rgba8(255, 0, 0, 255)),
            stroke: Some(Paint::BLACK),
            stroke_width: 0.0,
            fill_opacity: 0.5,
            ..StyleValues::default()
        };
        let items = values.paint_shapes();
        assert_eq!(items.len(), 1);
        match &items[0] {
            Shape::Fill(fill) => {
                assert_eq!(fill.c.k, [1.0, 0.0, 0.0, 1.0]);
                assert_eq!(fill.o.k, 50.0);
                assert_eq!(fill.r, 1);
            }
            other => panic!("expected fill, got {:?}", other),
        }

        let stroked = StyleValues { stroke_width: 2.0, ..values }.paint_shapes();
        assert_eq!(stroked.len(), 2);
        assert_eq!(stroked[1].type_tag(), "st");
    }
}
