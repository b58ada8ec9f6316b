//! Sweep-mode matching of one representative against many candidate curves.
//!
//! The sweep builds the vertex-monotone reachability graph of a single
//! representative (x axis) against the concatenation of all candidates
//! (y axis) in one pass, never removing columns. While building it tracks the
//! *frontier*: vertices that have outgoing edges but are not the target of
//! any edge. Every frontier vertex ends a maximal match, and
//! [`SweepMatcher::collect_events`] turns those matches into start/end events
//! for a sweep line over the representative.
//!
//! With a [`CandidateIndex`] each column only visits rows whose candidate
//! edges lie near the representative. The rows visited are always a superset
//! of the free ones, so pruning never changes the result.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use geo::Coord;
use log::{debug, info};

use crate::MatchConfig;
use crate::curve::{ConcatenatedCurve, Curve, SubCurve};
use crate::distance::{CurveAccess, CurvePair};
use crate::error::{BundleError, OptionExt, Result};
use crate::fuzzy::Tolerance;
use crate::geometry::segment_circle_params;
use crate::graph::ReachabilityGraph;
use crate::grid::{DoubledGrid, GraphCoord, GridCodec, low, up};
use crate::index::{CandidateIndex, EdgeRTree};
use crate::predicate::{FreeSpacePredicate, VertexMonotonePredicate};

/// A position in the free space diagram in curve indices: point `x` of the
/// representative against point `y` of the concatenated candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchVertex {
    pub x: usize,
    pub y: usize,
}

impl MatchVertex {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Bottom end of the grid edge represented by `at`.
    pub fn start_of(at: GraphCoord) -> Self {
        Self::new(low(at.x) as usize, low(at.y) as usize)
    }

    /// Top end of the grid edge represented by `at`.
    pub fn end_of(at: GraphCoord) -> Self {
        Self::new(low(at.x) as usize, up(at.y) as usize)
    }
}

/// Start or end of a match `[start.x, end.x]` on the representative, paired
/// with the matched range `[start.y, end.y]` of the candidates.
///
/// Events order by the representative index they fire at. At equal index
/// end events come first, then the other end of the match, then the matched
/// height, then the end and start heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub start: MatchVertex,
    pub end: MatchVertex,
    pub is_start: bool,
}

impl Event {
    pub const fn new(start: MatchVertex, end: MatchVertex, is_start: bool) -> Self {
        Self {
            start,
            end,
            is_start,
        }
    }

    /// Representative index at which this event fires.
    pub fn primary_index(&self) -> usize {
        if self.is_start { self.start.x } else { self.end.x }
    }

    /// Representative index of the opposite end of the match.
    pub fn secondary_index(&self) -> usize {
        if self.is_start { self.end.x } else { self.start.x }
    }

    /// Length of the matched range in candidate indices.
    pub fn height(&self) -> i64 {
        self.end.y as i64 - self.start.y as i64
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.primary_index()
            .cmp(&other.primary_index())
            .then(self.is_start.cmp(&other.is_start))
            .then(self.secondary_index().cmp(&other.secondary_index()))
            .then(self.height().cmp(&other.height()))
            .then(self.end.y.cmp(&other.end.y))
            .then(self.start.y.cmp(&other.start.y))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Merge two ascending, duplicate-free slices into one.
pub fn linear_merge(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                merged.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                merged.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                merged.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}

/// Matches one representative against a concatenation of candidates.
pub struct SweepMatcher {
    representative: Curve,
    candidates: Arc<ConcatenatedCurve>,
    graph: ReachabilityGraph<VertexMonotonePredicate>,
    frontier: BTreeSet<GraphCoord>,
    index: Option<Arc<dyn CandidateIndex>>,
    epsilon: f64,
    tolerance: Tolerance,
    index_exponent: f64,
    computed: bool,
}

impl SweepMatcher {
    /// Create a matcher; builds an [`EdgeRTree`] when `config.use_index` is set.
    pub fn new(
        representative: Curve,
        candidates: Arc<ConcatenatedCurve>,
        config: &MatchConfig,
    ) -> Result<Self> {
        let index: Option<Arc<dyn CandidateIndex>> = if config.use_index {
            Some(Arc::new(EdgeRTree::new(&candidates)))
        } else {
            None
        };
        Self::build(representative, candidates, config, index)
    }

    /// Create a matcher pruning columns with a shared `index` over `candidates`.
    pub fn with_index(
        representative: Curve,
        candidates: Arc<ConcatenatedCurve>,
        config: &MatchConfig,
        index: Arc<dyn CandidateIndex>,
    ) -> Result<Self> {
        Self::build(representative, candidates, config, Some(index))
    }

    fn build(
        representative: Curve,
        candidates: Arc<ConcatenatedCurve>,
        config: &MatchConfig,
        index: Option<Arc<dyn CandidateIndex>>,
    ) -> Result<Self> {
        config.validate()?;
        let tolerance = Tolerance::new(config.tolerance);
        let pair = CurvePair::new(
            Arc::new(ConcatenatedCurve::single(representative.clone())),
            Arc::clone(&candidates),
        );
        let predicate =
            VertexMonotonePredicate::new(pair, config.epsilon)?.with_tolerance(tolerance);
        Ok(Self {
            representative,
            candidates,
            graph: ReachabilityGraph::new(predicate),
            frontier: BTreeSet::new(),
            index,
            epsilon: config.epsilon,
            tolerance,
            index_exponent: config.index_exponent,
            computed: false,
        })
    }

    pub fn representative(&self) -> &Curve {
        &self.representative
    }

    pub fn candidates(&self) -> &ConcatenatedCurve {
        &self.candidates
    }

    pub fn graph(&self) -> &ReachabilityGraph<VertexMonotonePredicate> {
        &self.graph
    }

    /// Vertices ending a maximal match.
    pub fn frontier(&self) -> &BTreeSet<GraphCoord> {
        &self.frontier
    }

    /// Build the graph over every representative column. Idempotent.
    pub fn compute(&mut self) {
        if self.computed {
            return;
        }
        let start = std::time::Instant::now();
        let mut previous: Vec<usize> = Vec::new();
        let mut full_scans = 0usize;

        for column in 0..self.graph.width() {
            let rows = match self.pruned_rows(column) {
                Some(fresh) => linear_merge(&previous, &fresh),
                None => {
                    full_scans += 1;
                    self.all_rows()
                }
            };

            let frontier = &mut self.frontier;
            self.graph.add_column_with(&rows, |source, target| {
                frontier.remove(&target);
                frontier.insert(source);
            });

            let codec = self.graph.codec();
            previous = rows
                .iter()
                .copied()
                .filter(|&row| {
                    codec
                        .coord_at(column, row)
                        .is_some_and(|at| !self.graph.edges(at).is_empty())
                })
                .collect();
        }

        self.computed = true;
        info!(
            "[Sweep] Built {} columns for '{}' against {} candidates in {}ms ({} full scans, {} frontier vertices)",
            self.graph.width(),
            self.representative.id(),
            self.candidates.curves().len(),
            start.elapsed().as_millis(),
            full_scans,
            self.frontier.len()
        );
    }

    /// Rows of `column` not excluded up front: horizontal grid edges on the
    /// first or last point of a candidate curve are never built.
    fn row_allowed(&self, row: usize) -> bool {
        if row % 2 == 1 {
            return true;
        }
        let j = row / 2;
        let range = self.candidates.curve_range(j);
        j != range.start && j + 1 != range.end
    }

    fn all_rows(&self) -> Vec<usize> {
        (0..self.graph.height())
            .filter(|&row| self.row_allowed(row))
            .collect()
    }

    /// Rows near the representative at `column`, or `None` when the index is
    /// missing or the query is too unselective to beat a full scan.
    fn pruned_rows(&self, column: usize) -> Option<Vec<usize>> {
        let index = self.index.as_ref()?;
        let reach = self.epsilon + self.tolerance.delta;
        let threshold = (index.len() as f64).powf(self.index_exponent);

        let point = self.representative.point(column);
        let verticals = index.query_near(point, reach);
        let horizontals = if column > 0 {
            let edge = self.representative.edge(column - 1);
            index.query_window(
                Coord {
                    x: edge.start.x.min(edge.end.x) - reach,
                    y: edge.start.y.min(edge.end.y) - reach,
                },
                Coord {
                    x: edge.start.x.max(edge.end.x) + reach,
                    y: edge.start.y.max(edge.end.y) + reach,
                },
            )
        } else {
            Vec::new()
        };

        if (verticals.len() + horizontals.len()) as f64 > threshold {
            debug!(
                "[Sweep] Column {}: {} hits above threshold {:.1}, scanning fully",
                column,
                verticals.len() + horizontals.len(),
                threshold
            );
            return None;
        }

        let mut rows: Vec<usize> = verticals.iter().map(|&e| 2 * e + 1).collect();
        for &e in &horizontals {
            rows.push(2 * e);
            rows.push(2 * e + 2);
        }
        rows.sort_unstable();
        rows.dedup();
        rows.retain(|&row| row < self.graph.height() && self.row_allowed(row));
        Some(rows)
    }

    /// Start and end events of every maximal match, in sweep order.
    ///
    /// Call [`SweepMatcher::compute`] first; before that the set is empty.
    pub fn collect_events(&self) -> BTreeSet<Event> {
        let mut events = BTreeSet::new();
        for &tip in &self.frontier {
            let Some(vertical) = self.first_vertical(tip) else {
                continue;
            };
            if let Some(edge) = self.graph.min_edge(vertical) {
                let start = MatchVertex::start_of(edge.origin);
                let end = MatchVertex::end_of(vertical);
                events.insert(Event::new(start, end, true));
                events.insert(Event::new(start, end, false));
            }
        }
        info!(
            "[Sweep] Collected {} events from {} frontier vertices",
            events.len(),
            self.frontier.len()
        );
        events
    }

    /// Follow topmost edges from `at` until a vertical grid edge.
    fn first_vertical(&self, mut at: GraphCoord) -> Option<GraphCoord> {
        while !DoubledGrid::is_vertical(at) {
            at = self.graph.edges(at).first()?.target;
        }
        Some(at)
    }

    /// Candidate curve containing the start height of `event`.
    pub fn trajectory(&self, event: &Event) -> Option<&Curve> {
        (event.start.y < self.candidates.num_points())
            .then(|| self.candidates.locate(event.start.y).0)
    }

    /// The piece `[from, to]` of the concatenation as a sub-curve of the
    /// candidate curve containing `from`.
    pub fn sub_trajectory(&self, from: usize, to: usize) -> Result<SubCurve> {
        let (curve, offset) = (from < self.candidates.num_points() && from <= to)
            .then(|| self.candidates.locate(from))
            .ok_or_range(from, to)?;
        if curve.num_edges() < to - offset {
            return Err(BundleError::RangeOutsideCurve { from, to });
        }
        Ok(SubCurve::new(
            curve.clone(),
            (from - offset) as f64,
            (to - offset) as f64,
        ))
    }

    /// Candidate piece matched by the representative range `[from, to]`,
    /// for a match ending at `end`, with both ends refined to where the
    /// candidate enters and leaves the epsilon disk.
    pub fn trimmed_sub_trajectory(
        &self,
        from: usize,
        to: usize,
        end: MatchVertex,
    ) -> Option<SubCurve> {
        if end.x < to || end.y == 0 || end.y >= self.candidates.num_points() {
            return None;
        }
        let lower = 2 * from as i32;
        let higher = 2 * to as i32;
        let top = self.back_pass(
            DoubledGrid::vertical(end.x as i32, end.y as i32 - 1),
            lower,
            higher,
        )?;
        let bottom = self.back_pass(top, lower, lower)?;

        let (bound_from, bound_to) = self.refine_bounds(
            low(bottom.x) as usize,
            low(top.x) as usize,
            low(bottom.y) as usize,
            up(top.y) as usize,
        )?;
        if bound_from > bound_to {
            return None;
        }
        let (curve, offset) = self.candidates.locate(end.y);
        Some(SubCurve::new(
            curve.clone(),
            bound_from - offset as f64,
            bound_to - offset as f64,
        ))
    }

    /// Walk back from `at` while right of `higher`, following the first edge
    /// whose origin lies at or left of `lower`.
    fn back_pass(&self, mut at: GraphCoord, lower: i32, higher: i32) -> Option<GraphCoord> {
        while at.x > higher {
            at = self
                .graph
                .edges(at)
                .iter()
                .find(|edge| edge.origin.x <= lower)?
                .target;
        }
        Some(at)
    }

    /// Fractional candidate bounds for representative points `s` and `t`
    /// matched to candidate heights `ys` and `yt`.
    fn refine_bounds(&self, s: usize, t: usize, ys: usize, yt: usize) -> Option<(f64, f64)> {
        let curves = self.graph.predicate().curves();
        let joined = self.candidates.joined();

        let from = if self
            .tolerance
            .leq(curves.point_distance(s, ys), self.epsilon)
        {
            ys as f64
        } else {
            if ys + 1 >= joined.num_points() {
                return None;
            }
            let params = segment_circle_params(
                &joined.edge(ys),
                self.representative.point(s),
                self.epsilon,
                &self.tolerance,
            );
            ys as f64 + params.first()?
        };

        let to = if self
            .tolerance
            .leq(curves.point_distance(t, yt), self.epsilon)
        {
            yt as f64
        } else {
            if yt == 0 {
                return None;
            }
            let params = segment_circle_params(
                &joined.edge(yt - 1),
                self.representative.point(t),
                self.epsilon,
                &self.tolerance,
            );
            (yt - 1) as f64 + params.last()?
        };

        Some((from, to))
    }
}

/// Run one sweep per representative against shared candidates.
///
/// With the `parallel` feature the sweeps run on the rayon pool. The
/// candidate index is built once and shared.
pub fn collect_events_batch(
    representatives: &[Curve],
    candidates: Arc<ConcatenatedCurve>,
    config: &MatchConfig,
) -> Result<Vec<BTreeSet<Event>>> {
    config.validate()?;
    let start = std::time::Instant::now();
    let index: Option<Arc<dyn CandidateIndex>> = if config.use_index {
        Some(Arc::new(EdgeRTree::new(&candidates)))
    } else {
        None
    };

    let sweep = |representative: &Curve| -> Result<BTreeSet<Event>> {
        let mut matcher = SweepMatcher::build(
            representative.clone(),
            Arc::clone(&candidates),
            config,
            index.clone(),
        )?;
        matcher.compute();
        Ok(matcher.collect_events())
    };

    #[cfg(feature = "parallel")]
    let results: Result<Vec<BTreeSet<Event>>> = {
        use rayon::prelude::*;
        representatives.par_iter().map(sweep).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results: Result<Vec<BTreeSet<Event>>> = representatives.iter().map(sweep).collect();

    info!(
        "[Batch] Swept {} representatives in {}ms",
        representatives.len(),
        start.elapsed().as_millis()
    );
    results
}
