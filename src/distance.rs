//! Distance queries between two curves by index.
//!
//! Nothing is cached: each query recomputes its distance, which keeps memory
//! linear in the curve sizes even for long concatenations.

use std::sync::Arc;

use crate::curve::ConcatenatedCurve;
use crate::geometry::{point_distance, point_segment_distance};

/// Index-based distance oracle for a pair of curves.
///
/// The *first* curve spans the x axis of the free space diagram and the
/// *second* the y axis. All queries panic on indices outside the curves.
pub trait CurveAccess {
    /// Distance between point `i` of the first and point `j` of the second curve.
    fn point_distance(&self, i: usize, j: usize) -> f64;

    /// Distance between point `i` of the first and edge `j` of the second curve.
    fn point_edge_distance(&self, i: usize, j: usize) -> f64;

    /// Distance between edge `i` of the first and point `j` of the second curve.
    fn edge_point_distance(&self, i: usize, j: usize) -> f64;

    fn first_len(&self) -> usize;

    fn second_len(&self) -> usize;
}

/// Two shared concatenations forming the axes of a free space diagram.
#[derive(Debug, Clone)]
pub struct CurvePair {
    pub first: Arc<ConcatenatedCurve>,
    pub second: Arc<ConcatenatedCurve>,
}

impl CurvePair {
    pub fn new(first: Arc<ConcatenatedCurve>, second: Arc<ConcatenatedCurve>) -> Self {
        Self { first, second }
    }

    /// A concatenation matched against itself.
    pub fn symmetric(curve: Arc<ConcatenatedCurve>) -> Self {
        Self {
            first: Arc::clone(&curve),
            second: curve,
        }
    }
}

impl CurveAccess for CurvePair {
    #[inline]
    fn point_distance(&self, i: usize, j: usize) -> f64 {
        point_distance(self.first.joined().point(i), self.second.joined().point(j))
    }

    #[inline]
    fn point_edge_distance(&self, i: usize, j: usize) -> f64 {
        point_segment_distance(self.first.joined().point(i), &self.second.joined().edge(j))
    }

    #[inline]
    fn edge_point_distance(&self, i: usize, j: usize) -> f64 {
        point_segment_distance(self.second.joined().point(j), &self.first.joined().edge(i))
    }

    fn first_len(&self) -> usize {
        self.first.num_points()
    }

    fn second_len(&self) -> usize {
        self.second.num_points()
    }
}
