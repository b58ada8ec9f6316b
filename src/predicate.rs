//! Free space predicates.
//!
//! A predicate decides whether a grid coordinate lies in the free space of
//! two curves for a fixed epsilon, and answers which edges are borders that
//! no reachability step may cross.
//!
//! | Policy | Grid | Free when |
//! |--------|------|-----------|
//! | [`DiscretePredicate`] | direct | point `x` to point `y` within epsilon |
//! | [`VertexMonotonePredicate`] | doubled | point to edge (or edge to point) within epsilon |
//! | [`HalfEdgePredicate`] | direct | point to the half edges around the other point within epsilon, either way round |

use geo::{Coord, Line};

use crate::curve::ConcatenatedCurve;
use crate::distance::{CurveAccess, CurvePair};
use crate::error::{BundleError, Result};
use crate::fuzzy::Tolerance;
use crate::geometry::{midpoint, point_segment_distance};
use crate::grid::{DirectGrid, DoubledGrid, GraphCoord, GridCodec, is_even, low};

/// Which curve of the pair an edge index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The curve along x (columns).
    First,
    /// The curve along y (rows).
    Second,
}

/// Membership test for the free space of two curves.
pub trait FreeSpacePredicate {
    /// Layout of the grid this predicate is defined on.
    type Codec: GridCodec;

    /// Whether `at` is free. Coordinates outside the curves are never free.
    fn is_free(&self, at: GraphCoord) -> bool;

    /// Whether `edge` of the curve on `axis` is a border between source curves.
    fn crosses_border(&self, axis: Axis, edge: i32) -> bool;

    fn curves(&self) -> &CurvePair;

    fn epsilon(&self) -> f64;

    fn codec(&self) -> Self::Codec {
        Self::Codec::default()
    }
}

pub(crate) fn validate_epsilon(epsilon: f64) -> Result<f64> {
    if epsilon.is_finite() && epsilon >= 0.0 {
        Ok(epsilon)
    } else {
        Err(BundleError::InvalidEpsilon { epsilon })
    }
}

fn concatenation(pair: &CurvePair, axis: Axis) -> &ConcatenatedCurve {
    match axis {
        Axis::First => &pair.first,
        Axis::Second => &pair.second,
    }
}

#[inline]
fn index_in(i: i32, len: usize) -> Option<usize> {
    usize::try_from(i).ok().filter(|&i| i < len)
}

/// Point-to-point free space on the direct grid.
#[derive(Debug, Clone)]
pub struct DiscretePredicate {
    curves: CurvePair,
    epsilon: f64,
    tolerance: Tolerance,
}

impl DiscretePredicate {
    pub fn new(curves: CurvePair, epsilon: f64) -> Result<Self> {
        Ok(Self {
            curves,
            epsilon: validate_epsilon(epsilon)?,
            tolerance: Tolerance::default(),
        })
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl FreeSpacePredicate for DiscretePredicate {
    type Codec = DirectGrid;

    fn is_free(&self, at: GraphCoord) -> bool {
        match (
            index_in(at.x, self.curves.first_len()),
            index_in(at.y, self.curves.second_len()),
        ) {
            (Some(i), Some(j)) => self
                .tolerance
                .leq(self.curves.point_distance(i, j), self.epsilon),
            _ => false,
        }
    }

    fn crosses_border(&self, axis: Axis, edge: i32) -> bool {
        concatenation(&self.curves, axis).is_border_edge(i64::from(edge))
    }

    fn curves(&self) -> &CurvePair {
        &self.curves
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

/// Vertex-monotone (semi-weak) free space on the doubled grid.
///
/// A vertical grid edge `(2i, 2j + 1)` is free when point `i` of the first
/// curve is within epsilon of edge `j` of the second; a horizontal grid edge
/// `(2i + 1, 2j)` when edge `i` of the first is within epsilon of point `j`
/// of the second. Grid edges on border edges are never free.
#[derive(Debug, Clone)]
pub struct VertexMonotonePredicate {
    curves: CurvePair,
    epsilon: f64,
    tolerance: Tolerance,
}

impl VertexMonotonePredicate {
    pub fn new(curves: CurvePair, epsilon: f64) -> Result<Self> {
        Ok(Self {
            curves,
            epsilon: validate_epsilon(epsilon)?,
            tolerance: Tolerance::default(),
        })
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl FreeSpacePredicate for VertexMonotonePredicate {
    type Codec = DoubledGrid;

    fn is_free(&self, at: GraphCoord) -> bool {
        let first = self.curves.first_len();
        let second = self.curves.second_len();
        let distance = if is_even(at.x) {
            if is_even(at.y) || self.crosses_border(Axis::Second, low(at.y)) {
                return false;
            }
            match (
                index_in(low(at.x), first),
                index_in(low(at.y), second.saturating_sub(1)),
            ) {
                (Some(i), Some(j)) => self.curves.point_edge_distance(i, j),
                _ => return false,
            }
        } else {
            if !is_even(at.y) || self.crosses_border(Axis::First, low(at.x)) {
                return false;
            }
            match (
                index_in(low(at.x), first.saturating_sub(1)),
                index_in(low(at.y), second),
            ) {
                (Some(i), Some(j)) => self.curves.edge_point_distance(i, j),
                _ => return false,
            }
        };
        self.tolerance.leq(distance, self.epsilon)
    }

    fn crosses_border(&self, axis: Axis, edge: i32) -> bool {
        concatenation(&self.curves, axis).is_border_edge(i64::from(edge))
    }

    fn curves(&self) -> &CurvePair {
        &self.curves
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

/// Half-edge free space on the direct grid.
///
/// The half edges around point `j` form the segment from the midpoint of the
/// edge before `j` to the midpoint of the edge after it, cut off at `j` where
/// its source curve starts or ends. `(i, j)` is free when point `i` is within
/// epsilon of the half edges around `j`, or point `j` of the half edges
/// around `i`.
#[derive(Debug, Clone)]
pub struct HalfEdgePredicate {
    curves: CurvePair,
    epsilon: f64,
    tolerance: Tolerance,
}

impl HalfEdgePredicate {
    pub fn new(curves: CurvePair, epsilon: f64) -> Result<Self> {
        Ok(Self {
            curves,
            epsilon: validate_epsilon(epsilon)?,
            tolerance: Tolerance::default(),
        })
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Distance from point `i` of the curve on `point_axis` to the half
    /// edges around point `j` of the other curve.
    pub fn point_half_edge_distance(&self, point_axis: Axis, i: usize, j: usize) -> f64 {
        let (from, around) = match point_axis {
            Axis::First => (&self.curves.first, &self.curves.second),
            Axis::Second => (&self.curves.second, &self.curves.first),
        };
        let p = from.joined().point(i);
        point_segment_distance(p, &half_edges(around, j))
    }
}

/// Segment covering the half edges adjacent to point `j`.
pub fn half_edges(curve: &ConcatenatedCurve, j: usize) -> Line<f64> {
    let joined = curve.joined();
    let at: Coord<f64> = joined.point(j);
    let start = if j == 0 || curve.is_border_edge(j as i64 - 1) {
        at
    } else {
        midpoint(joined.point(j - 1), at)
    };
    let end = if curve.is_border_edge(j as i64) {
        at
    } else {
        midpoint(at, joined.point(j + 1))
    };
    Line::new(start, end)
}

impl FreeSpacePredicate for HalfEdgePredicate {
    type Codec = DirectGrid;

    fn is_free(&self, at: GraphCoord) -> bool {
        let (Some(i), Some(j)) = (
            index_in(at.x, self.curves.first_len()),
            index_in(at.y, self.curves.second_len()),
        ) else {
            return false;
        };
        self.tolerance
            .leq(self.point_half_edge_distance(Axis::First, i, j), self.epsilon)
            || self
                .tolerance
                .leq(self.point_half_edge_distance(Axis::Second, j, i), self.epsilon)
    }

    fn crosses_border(&self, axis: Axis, edge: i32) -> bool {
        concatenation(&self.curves, axis).is_border_edge(i64::from(edge))
    }

    fn curves(&self) -> &CurvePair {
        &self.curves
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }
}
