//! # Transform Module
//!
//! Decomposes a 2D affine matrix plus a transform origin into Lottie's
//! anchor / position / scale / rotation model.
//!
//! Skew is never reconstructed: a sheared matrix comes out as the closest
//! scale + rotation and the `sk`/`sa` properties stay zero.

use kurbo::{Affine, Point, Vec2};
use lottie_data::model::Transform;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecomposedTransform {
    pub anchor: Point,
    pub position: Point,
    /// Percentages, 100 = unity.
    pub scale: Vec2,
    /// Degrees.
    pub rotation: f64,
}

impl DecomposedTransform {
    /// `matrix` is `[a b c d tx ty]`; `origin` defaults to `(0, 0)`.
    ///
    /// Without a matrix the anchor and position both sit on the origin so the
    /// object stays where it is.
    pub fn decompose(matrix: Option<Affine>, origin: Option<Point>) -> Self {
        let origin = origin.unwrap_or(Point::ORIGIN);
        let Some(matrix) = matrix else {
            return DecomposedTransform {
                anchor: origin,
                position: origin,
                scale: Vec2::new(100.0, 100.0),
                rotation: 0.0,
            };
        };

        let [a, b, c, d, tx, ty] = matrix.as_coeffs();
        DecomposedTransform {
            anchor: origin,
            position: Point::new(tx + origin.x, ty + origin.y),
            scale: Vec2::new(100.0 * a.hypot(b), 100.0 * c.hypot(d)),
            rotation: b.atan2(a).to_degrees(),
        }
    }

    /// Pure translation by `offset`.
    pub fn translation(offset: Vec2) -> Self {
        Self::decompose(Some(Affine::translate(offset)), None)
    }

    /// Group (`tr`) transform item contents.
    pub fn to_lottie(&self) -> Transform {
        Transform::new(
            [self.anchor.x, self.anchor.y],
            [self.position.x, self.position.y],
            [self.scale.x, self.scale.y],
            self.rotation,
        )
        .with_zero_skew()
    }
}

/// Parses a numeric `transform-origin` pair such as `"50 50"` or
/// `"12.5px 4px"`. Keywords and percentages are not supported.
pub fn parse_transform_origin(value: &str) -> Option<Point> {
    let mut parts = value.split_whitespace().map(|part| {
        svgtypes::Length::from_str(part)
            .ok()
            .filter(|len| matches!(len.unit, svgtypes::LengthUnit::None | svgtypes::LengthUnit::Px))
            .map(|len| len.number)
    });
    let x = parts.next()??;
    let y = parts.next()??;
    Some(Point::new(x, y))
}
