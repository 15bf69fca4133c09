//! Geometry items for leaf elements.

use crate::config::ConvertOptions;
use crate::dom::SvgElement;
use crate::errors::PathDataError;
use crate::path_data::{parse_subpaths_with, SubPath};
use lottie_data::model::{EllipseShape, PathShape, Property, RectShape, Shape};

/// Geometry for `element`. Containers, references and unsupported elements
/// have none and yield an empty list.
///
/// Only the first contour of path-like elements is kept unless
/// `options.all_subpaths` is set.
pub fn convert_shape(element: &SvgElement, options: &ConvertOptions) -> Result<Vec<Shape>, PathDataError> {
    let shape = match element {
        SvgElement::Rect {
            x,
            y,
            width,
            height,
            rx,
            ry,
        } => Shape::Rect(RectShape {
            nm: Some("Rectangle".to_string()),
            p: Property::indexed([x + width / 2.0, y + height / 2.0], 3),
            s: Property::indexed([*width, *height], 2),
            r: Property::indexed(rx.or(*ry).unwrap_or(0.0), 4),
        }),
        SvgElement::Circle { cx, cy, r } => ellipse("Circle", *cx, *cy, 2.0 * r, 2.0 * r),
        SvgElement::Ellipse { cx, cy, rx, ry } => ellipse("Ellipse", *cx, *cy, 2.0 * rx, 2.0 * ry),
        SvgElement::Line { x1, y1, x2, y2 } => {
            return path_shapes(&format!("M{},{} L{},{}", x1, y1, x2, y2), options);
        }
        SvgElement::Polyline { points } => return path_shapes(&points_to_path_data(points, false), options),
        SvgElement::Polygon { points } => return path_shapes(&points_to_path_data(points, true), options),
        SvgElement::Path { d } => return path_shapes(d, options),
        SvgElement::Group | SvgElement::Symbol | SvgElement::Reference { .. } | SvgElement::Unsupported => {
            return Ok(Vec::new());
        }
    };
    Ok(vec![shape])
}

fn ellipse(name: &str, cx: f64, cy: f64, width: f64, height: f64) -> Shape {
    Shape::Ellipse(EllipseShape {
        nm: Some(name.to_string()),
        p: Property::indexed([cx, cy], 3),
        s: Property::indexed([width, height], 2),
    })
}

fn path_shapes(d: &str, options: &ConvertOptions) -> Result<Vec<Shape>, PathDataError> {
    let mut contours = parse_subpaths_with(d, options.parse_mode(), options.arc_handles)?;
    if !options.all_subpaths {
        contours.truncate(1);
    }
    if contours.is_empty() {
        contours.push(SubPath::default());
    }
    Ok(contours
        .iter()
        .map(|contour| {
            Shape::Path(PathShape {
                nm: Some("Path".to_string()),
                ks: Property::indexed(contour.to_bezier(), 2),
            })
        })
        .collect())
}

/// Rewrites a `points` list as path data. Entries that are not numbers and an
/// odd trailing coordinate are dropped.
pub fn points_to_path_data(points: &str, close: bool) -> String {
    let coords: Vec<f64> = points
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse().ok())
        .collect();

    let mut d = String::new();
    for (i, pair) in coords.chunks_exact(2).enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            d.push(' ');
        }
        d.push_str(&format!("{}{},{}", command, pair[0], pair[1]));
    }
    if close && !d.is_empty() {
        d.push_str(" Z");
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::ArcHandles;

    fn only(shapes: Vec<Shape>) -> Shape {
        assert_eq!(shapes.len(), 1);
        shapes.into_iter().next().unwrap()
    }

    #[test]
    fn test_rect() {
        let shape = only(
            convert_shape(
                &SvgElement::Rect { x: 0.0, y: 0.0, width: 10.0, height: 20.0, rx: Some(2.0), ry: None },
                &ConvertOptions::default(),
            )
            .unwrap(),
        );
        match shape {
            Shape::Rect(rect) => {
                assert_eq!(rect.p.k, [5.0, 10.0]);
                assert_eq!(rect.s.k, [10.0, 20.0]);
                assert_eq!(rect.r.k, 2.0);
            }
            other => panic!("expected rect, got {:?}", other),
        }
    }

    #[test]
    fn test_rect_corner_radius_falls_back_to_ry() {
        let shape = only(
            convert_shape(
                &SvgElement::Rect { x: 0.0, y: 0.0, width: 1.0, height: 1.0, rx: None, ry: Some(3.0) },
                &ConvertOptions::default(),
            )
            .unwrap(),
        );
        let Shape::Rect(rect) = shape else { panic!("expected rect") };
        assert_eq!(rect.r.k, 3.0);
    }

    #[test]
    fn test_circle_and_ellipse() {
        let options = ConvertOptions::default();
        let Shape::Ellipse(circle) = only(convert_shape(&SvgElement::Circle { cx: 4.0, cy: 5.0, r: 3.0 }, &options).unwrap())
        else {
            panic!("expected ellipse")
        };
        assert_eq!(circle.nm.as_deref(), Some("Circle"));
        assert_eq!(circle.p.k, [4.0, 5.0]);
        assert_eq!(circle.s.k, [6.0, 6.0]);

        let Shape::Ellipse(ellipse) = only(
            convert_shape(&SvgElement::Ellipse { cx: 0.0, cy: 0.0, rx: 2.0, ry: 7.0 }, &options).unwrap(),
        ) else {
            panic!("expected ellipse")
        };
        assert_eq!(ellipse.s.k, [4.0, 14.0]);
    }

    #[test]
    fn test_polygon_closes() {
        let Shape::Path(path) = only(
            convert_shape(
                &SvgElement::Polygon { points: "0,0 10,0 10,10".to_string() },
                &ConvertOptions::default(),
            )
            .unwrap(),
        ) else {
            panic!("expected path")
        };
        assert!(path.ks.k.c);
        assert_eq!(path.ks.k.v, vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]);
    }

    #[test]
    fn test_line_is_open_path() {
        let Shape::Path(path) = only(
            convert_shape(
                &SvgElement::Line { x1: 1.0, y1: 2.0, x2: 3.0, y2: 4.0 },
                &ConvertOptions::default(),
            )
            .unwrap(),
        ) else {
            panic!("expected path")
        };
        assert!(!path.ks.k.c);
        assert_eq!(path.ks.k.v, vec![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_points_list_cleanup() {
        assert_eq!(points_to_path_data("0,0 10 , 5 x 20,20 7", false), "M0,0 L10,5 L20,20");
        assert_eq!(points_to_path_data("1 2 3 4", true), "M1,2 L3,4 Z");
        assert_eq!(points_to_path_data("", true), "");
    }

    #[test]
    fn test_multiple_contours_are_opt_in() {
        let element = SvgElement::Path { d: "M0 0 L1 1 M5 5 L6 6".to_string() };
        assert_eq!(convert_shape(&element, &ConvertOptions::default()).unwrap().len(), 1);
        let options = ConvertOptions { all_subpaths: true, ..ConvertOptions::default() };
        assert_eq!(convert_shape(&element, &options).unwrap().len(), 2);
    }

    #[test]
    fn test_arc_handles_follow_options() {
        let element = SvgElement::Path { d: "M10,0 A10,10 0 0 1 0,10".to_string() };
        let out_tangent = |options: &ConvertOptions| {
            let Shape::Path(path) = only(convert_shape(&element, options).unwrap()) else {
                panic!("expected path")
            };
            path.ks.k.o[0]
        };

        let classic = out_tangent(&ConvertOptions::default());
        assert!(classic[0].abs() < 1e-9);
        assert!((classic[1] - 15.516_29).abs() < 1e-4);

        let exact = out_tangent(&ConvertOptions { arc_handles: ArcHandles::Exact, ..ConvertOptions::default() });
        assert!((exact[1] - 5.522_85).abs() < 1e-4);
    }

    #[test]
    fn test_empty_path_still_emits_item() {
        let Shape::Path(path) = only(
            convert_shape(&SvgElement::Path { d: String::new() }, &ConvertOptions::default()).unwrap(),
        ) else {
            panic!("expected path")
        };
        assert!(path.ks.k.is_empty());
    }

    #[test]
    fn test_containers_have_no_geometry() {
        assert!(convert_shape(&SvgElement::Group, &ConvertOptions::default()).unwrap().is_empty());
        assert!(convert_shape(&SvgElement::Unsupported, &ConvertOptions::default()).unwrap().is_empty());
    }
}
