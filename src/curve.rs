//! Curves, concatenations of curves and fractional sub-curves.
//!
//! Points live behind an `Arc<[Coord]>`, so cloning a [`Curve`] is cheap and
//! the same data can be read from several matcher instances on different
//! threads.

use std::ops::Range;
use std::sync::Arc;

use geo::{Coord, Line};

use crate::error::{BundleError, OptionExt, Result};
use crate::geometry::{point_distance, point_on_segment};

/// An immutable planar polyline.
#[derive(Debug, Clone)]
pub struct Curve {
    id: Arc<str>,
    points: Arc<[Coord<f64>]>,
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.points == other.points
    }
}

impl Curve {
    /// Create a curve from planar coordinates.
    ///
    /// Fails if there are no points or any coordinate is not finite.
    pub fn new(id: impl Into<String>, points: Vec<Coord<f64>>) -> Result<Self> {
        let id: String = id.into();
        points
            .first()
            .ok_or_insufficient_points(&id, 0, 1)?;
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(BundleError::NonFiniteCoordinate {
                curve_id: id,
                index,
            });
        }
        Ok(Self {
            id: Arc::from(id),
            points: Arc::from(points),
        })
    }

    /// Create a curve from `(x, y)` pairs.
    pub fn from_xy(id: impl Into<String>, xy: &[(f64, f64)]) -> Result<Self> {
        Self::new(id, xy.iter().map(|&(x, y)| Coord { x, y }).collect())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn points(&self) -> &[Coord<f64>] {
        &self.points
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_edges(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// The `i`-th point. Panics if out of bounds.
    #[inline]
    pub fn point(&self, i: usize) -> Coord<f64> {
        self.points[i]
    }

    /// Edge `i`, connecting points `i` and `i + 1`. Panics if out of bounds.
    #[inline]
    pub fn edge(&self, i: usize) -> Line<f64> {
        Line::new(self.points[i], self.points[i + 1])
    }

    /// Total polyline length.
    pub fn euclidean_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| point_distance(w[0], w[1]))
            .sum()
    }

    /// The same path traversed backwards; the id gets a `~rev` suffix.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.to_vec();
        points.reverse();
        Self {
            id: Arc::from(format!("{}~rev", self.id)),
            points: Arc::from(points),
        }
    }
}

/// Several curves laid end to end in a single offset space.
///
/// The point at offset `offsets[k] + i` is point `i` of curve `k`. Edge `e`
/// of the joined space connects offsets `e` and `e + 1`; it is a *border*
/// edge when those belong to different source curves.
#[derive(Debug, Clone)]
pub struct ConcatenatedCurve {
    curves: Vec<Curve>,
    offsets: Vec<usize>,
    joined: Curve,
    border: Vec<bool>,
}

impl ConcatenatedCurve {
    /// Concatenate curves in the given order.
    pub fn new(curves: Vec<Curve>) -> Result<Self> {
        if curves.is_empty() {
            return Err(BundleError::EmptyConcatenation);
        }

        let total: usize = curves.iter().map(Curve::num_points).sum();
        let mut offsets = Vec::with_capacity(curves.len());
        let mut points = Vec::with_capacity(total);
        let mut border = vec![false; total.saturating_sub(1)];

        for curve in &curves {
            offsets.push(points.len());
            points.extend_from_slice(curve.points());
            let last = points.len() - 1;
            if last < border.len() {
                border[last] = true;
            }
        }

        let joined = Curve::new("concatenated", points)?;
        Ok(Self {
            curves,
            offsets,
            joined,
            border,
        })
    }

    /// Concatenate the curves followed by all of them reversed (in reverse
    /// order), for matching regardless of travel direction.
    pub fn with_reversed(curves: Vec<Curve>) -> Result<Self> {
        let mut all = curves.clone();
        all.extend(curves.iter().rev().map(Curve::reversed));
        Self::new(all)
    }

    /// A concatenation holding a single curve, without borders.
    pub fn single(curve: Curve) -> Self {
        let border = vec![false; curve.num_edges()];
        Self {
            curves: vec![curve.clone()],
            offsets: vec![0],
            joined: curve,
            border,
        }
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// Start offset of every source curve.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// All points as one curve.
    pub fn joined(&self) -> &Curve {
        &self.joined
    }

    pub fn num_points(&self) -> usize {
        self.joined.num_points()
    }

    /// Index of the source curve containing `offset`. Panics if out of range.
    pub fn curve_index(&self, offset: usize) -> usize {
        assert!(
            offset < self.num_points(),
            "offset {} outside concatenation of {} points",
            offset,
            self.num_points()
        );
        self.offsets.partition_point(|&start| start <= offset) - 1
    }

    /// Source curve containing `offset` together with its start offset.
    pub fn locate(&self, offset: usize) -> (&Curve, usize) {
        let k = self.curve_index(offset);
        (&self.curves[k], self.offsets[k])
    }

    /// Offsets covered by the source curve containing `offset`.
    pub fn curve_range(&self, offset: usize) -> Range<usize> {
        let (curve, start) = self.locate(offset);
        start..start + curve.num_points()
    }

    /// Whether edge `edge` of the joined space crosses a seam.
    ///
    /// Negative and out-of-range edges count as borders.
    #[inline]
    pub fn is_border_edge(&self, edge: i64) -> bool {
        usize::try_from(edge)
            .ok()
            .and_then(|e| self.border.get(e).copied())
            .unwrap_or(true)
    }

    /// Whether offsets `a` and `b` lie on the same source curve.
    pub fn same_curve(&self, a: usize, b: usize) -> bool {
        self.curve_index(a) == self.curve_index(b)
    }
}

impl From<Curve> for ConcatenatedCurve {
    fn from(curve: Curve) -> Self {
        Self::single(curve)
    }
}

/// A fractional sub-range of a source curve.
///
/// `from` and `to` are point positions: integer parts select an edge and the
/// fractional part the position along it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubCurve {
    pub curve: Curve,
    pub from: f64,
    pub to: f64,
}

impl SubCurve {
    pub fn new(curve: Curve, from: f64, to: f64) -> Self {
        Self { curve, from, to }
    }

    /// Number of index units covered.
    pub fn interval_length(&self) -> f64 {
        self.to - self.from
    }

    /// Coordinate at a fractional position of the parent curve.
    pub fn position(&self, at: f64) -> Coord<f64> {
        let last = self.curve.num_points() - 1;
        let at = at.clamp(0.0, last as f64);
        let edge = (at.floor() as usize).min(last.saturating_sub(1));
        if last == 0 {
            return self.curve.point(0);
        }
        point_on_segment(&self.curve.edge(edge), at - edge as f64)
    }

    /// Boundary points followed by every full vertex strictly inside.
    pub fn points(&self) -> Vec<Coord<f64>> {
        let mut points = vec![self.position(self.from)];
        let first_inner = self.from.floor() as usize + 1;
        let last_inner = self.to.ceil() as usize;
        for i in first_inner..last_inner {
            points.push(self.curve.point(i));
        }
        points.push(self.position(self.to));
        points
    }

    pub fn euclidean_length(&self) -> f64 {
        self.points()
            .windows(2)
            .map(|w| point_distance(w[0], w[1]))
            .sum()
    }
}
