//! # Curves Module
//!
//! Cubic Bézier approximations of the non-cubic curve types found in path
//! data: quadratic curves (exact degree elevation) and elliptical arcs
//! (center parameterization, split into pieces of at most 90°).

use kurbo::{CubicBez, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Control handle length used for each arc piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcHandles {
    /// `α = sin(θ/2)·(√(4 + 3·tan²(θ/2)) − 1)·4/3`. Pieces bulge past the
    /// ellipse.
    #[default]
    Classic,
    /// `α = 4/3·tan(θ/4)`, which puts each piece's midpoint on the ellipse.
    Exact,
}

impl ArcHandles {
    /// Handle length, relative to the radius, for a piece sweeping `step`.
    pub fn alpha(self, step: f64) -> f64 {
        match self {
            ArcHandles::Classic => {
                let half = step / 2.0;
                let tan_half = half.tan();
                half.sin() * ((4.0 + 3.0 * tan_half * tan_half).sqrt() - 1.0) * 4.0 / 3.0
            }
            ArcHandles::Exact => 4.0 / 3.0 * (step / 4.0).tan(),
        }
    }
}

/// Elevates a quadratic Bézier to the equivalent cubic.
pub fn quad_to_cubic(p0: Point, cp: Point, p: Point) -> CubicBez {
    let cp1 = p0 + (cp - p0) * (2.0 / 3.0);
    let cp2 = p + (cp - p) * (2.0 / 3.0);
    CubicBez::new(p0, cp1, cp2, p)
}

/// Center parameterization of an SVG endpoint arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCenter {
    pub center: Point,
    /// Radii after scaling up radii too small to reach the end point.
    pub radii: Vec2,
    /// Rotation of the ellipse's x axis, in radians.
    pub x_rotation: f64,
    /// Angle of the start point on the unrotated ellipse, in radians.
    pub start_angle: f64,
    /// Signed sweep; negative runs counter-clockwise in SVG's y-down space.
    pub sweep_angle: f64,
}

impl ArcCenter {
    /// Number of cubic pieces, one per started quarter turn.
    pub fn segment_count(&self) -> usize {
        ((self.sweep_angle.abs() / FRAC_PI_2).ceil() as usize).max(1)
    }

    fn map(&self, local: Point) -> Point {
        let (sin_phi, cos_phi) = self.x_rotation.sin_cos();
        Point::new(
            cos_phi * local.x - sin_phi * local.y + self.center.x,
            sin_phi * local.x + cos_phi * local.y + self.center.y,
        )
    }
}

/// Solves the center parameterization of the arc from `from` to `to`.
///
/// Returns `None` when either radius is zero or both end points coincide; the
/// arc is then not an ellipse segment.
pub fn arc_center(
    from: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> Option<ArcCenter> {
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 || from == to {
        return None;
    }

    let phi = x_axis_rotation_deg.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    let half = (from - to) / 2.0;
    let x1p = cos_phi * half.x + sin_phi * half.y;
    let y1p = -sin_phi * half.x + cos_phi * half.y;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let rx_sq = rx * rx;
    let ry_sq = ry * ry;
    let numerator = rx_sq * ry_sq - rx_sq * y1p * y1p - ry_sq * x1p * x1p;
    let denominator = rx_sq * y1p * y1p + ry_sq * x1p * x1p;
    let mut factor = (numerator / denominator).max(0.0).sqrt();
    if large_arc == sweep {
        factor = -factor;
    }

    let cxp = factor * rx * y1p / ry;
    let cyp = -factor * ry * x1p / rx;
    let mid = from.midpoint(to);
    let center = Point::new(
        cos_phi * cxp - sin_phi * cyp + mid.x,
        sin_phi * cxp + cos_phi * cyp + mid.y,
    );

    let v1 = Vec2::new((x1p - cxp) / rx, (y1p - cyp) / ry);
    let v2 = Vec2::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);

    let start_angle = angle_between(Vec2::new(1.0, 0.0), v1);
    let mut sweep_angle = angle_between(v1, v2);
    if !sweep && sweep_angle > 0.0 {
        sweep_angle -= TAU;
    }
    if sweep && sweep_angle < 0.0 {
        sweep_angle += TAU;
    }

    Some(ArcCenter {
        center,
        radii: Vec2::new(rx, ry),
        x_rotation: phi,
        start_angle,
        sweep_angle,
    })
}

fn angle_between(u: Vec2, v: Vec2) -> f64 {
    let sign = if u.cross(v) < 0.0 { -1.0 } else { 1.0 };
    let cos = (u.dot(v) / (u.hypot() * v.hypot())).clamp(-1.0, 1.0);
    sign * cos.acos()
}

/// Approximates an SVG arc with cubic Béziers using [`ArcHandles::Classic`].
pub fn arc_to_cubic(
    from: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> Vec<CubicBez> {
    arc_to_cubic_with(from, rx, ry, x_axis_rotation_deg, large_arc, sweep, to, ArcHandles::Classic)
}

/// Approximates an SVG arc with cubic Béziers.
///
/// The first piece starts exactly at `from`, each piece starts exactly where
/// the previous one ended and the last piece ends exactly at `to`. Zero radii
/// give one straight pseudo-segment; coincident end points give no segments.
#[allow(clippy::too_many_arguments)]
pub fn arc_to_cubic_with(
    from: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
    handles: ArcHandles,
) -> Vec<CubicBez> {
    if from == to {
        return Vec::new();
    }
    let Some(arc) = arc_center(from, rx, ry, x_axis_rotation_deg, large_arc, sweep, to) else {
        return vec![CubicBez::new(from, from, to, to)];
    };

    let count = arc.segment_count();
    let step = arc.sweep_angle / count as f64;
    let (rx, ry) = (arc.radii.x, arc.radii.y);
    let alpha = handles.alpha(step);

    let mut segments = Vec::with_capacity(count);
    let mut start = from;
    for i in 0..count {
        let a1 = arc.start_angle + i as f64 * step;
        let a2 = arc.start_angle + (i + 1) as f64 * step;
        let (sin1, cos1) = a1.sin_cos();
        let (sin2, cos2) = a2.sin_cos();

        let cp1 = arc.map(Point::new(rx * (cos1 - alpha * sin1), ry * (sin1 + alpha * cos1)));
        let cp2 = arc.map(Point::new(rx * (cos2 + alpha * sin2), ry * (sin2 - alpha * cos2)));
        let end = if i + 1 == count {
            to
        } else {
            arc.map(Point::new(rx * cos2, ry * sin2))
        };

        segments.push(CubicBez::new(start, cp1, cp2, end));
        start = end;
    }
    segments
}
