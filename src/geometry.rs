//! Planar geometry helpers shared by the predicates and the sweep.
//!
//! Distances use `geo`'s Euclidean metric. The one closed-form routine kept
//! here is the segment/circle intersection used to refine match boundaries
//! to fractional curve positions.

use geo::line_measures::Distance;
use geo::{Coord, Euclidean, Line, Point};

use crate::fuzzy::Tolerance;

/// Distance between two coordinates.
#[inline]
pub fn point_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Euclidean.distance(&Point::from(a), &Point::from(b))
}

/// Distance from a coordinate to the closest point of a segment.
#[inline]
pub fn point_segment_distance(p: Coord<f64>, segment: &Line<f64>) -> f64 {
    Euclidean.distance(&Point::from(p), segment)
}

/// Midpoint of two coordinates.
#[inline]
pub fn midpoint(a: Coord<f64>, b: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

/// Point at parameter `t` along a segment (`t = 0` is the start).
#[inline]
pub fn point_on_segment(segment: &Line<f64>, t: f64) -> Coord<f64> {
    Coord {
        x: segment.start.x + t * (segment.end.x - segment.start.x),
        y: segment.start.y + t * (segment.end.y - segment.start.y),
    }
}

/// Parameters `t ∈ [0, 1]` at which `segment` crosses the circle of `radius`
/// around `center`, sorted ascending.
///
/// Substituting `p(t) = start + t (end - start)` into the circle equation
/// gives a quadratic in `t`. A zero-length segment, a negative discriminant
/// or any NaN yields no intersections.
pub fn segment_circle_params(
    segment: &Line<f64>,
    center: Coord<f64>,
    radius: f64,
    tol: &Tolerance,
) -> Vec<f64> {
    let x1 = segment.start.x - center.x;
    let y1 = segment.start.y - center.y;
    let dx = segment.end.x - segment.start.x;
    let dy = segment.end.y - segment.start.y;

    let a = dx * dx + dy * dy;
    let b = 2.0 * (x1 * dx + y1 * dy);
    let c = x1 * x1 + y1 * y1 - radius * radius;

    if !(a.is_finite() && b.is_finite() && c.is_finite()) || tol.sign(a) == Some(0) {
        return Vec::new();
    }

    let discriminant = b * b - 4.0 * a * c;
    let candidates = match tol.sign(discriminant) {
        None | Some(-1) => return Vec::new(),
        Some(0) => vec![-b / (2.0 * a)],
        Some(_) => {
            let root = discriminant.sqrt();
            vec![(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
        }
    };

    let mut params: Vec<f64> = candidates
        .into_iter()
        .map(|t| tol.snap_unit(t))
        .filter(|t| t.is_finite() && tol.in_unit(*t))
        .collect();
    params.sort_by(f64::total_cmp);
    params
}
