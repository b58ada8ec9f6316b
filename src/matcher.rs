//! Windowed start queries over a [`ReachabilityGraph`].
//!
//! The matcher answers: given that a match ends at height `yt` of the second
//! curve in column `t`, is there a monotone path back to column `s`, and at
//! which height does it start? The walk prefers the bottommost admissible
//! edge, which makes the matched piece of the second curve as long as
//! possible, except next to forbidden height ranges where it keeps to the
//! topmost edge instead.

use std::ops::{Range, RangeInclusive};

use log::debug;

use crate::graph::{ReachEdge, ReachabilityGraph};
use crate::grid::{GraphCoord, GridCodec};
use crate::predicate::{
    DiscretePredicate, FreeSpacePredicate, HalfEdgePredicate, VertexMonotonePredicate,
};

/// Order in which a vertex's edges are tried during a backward walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    TopmostFirst,
    BottommostFirst,
}

impl TraversalOrder {
    /// `TopmostFirst` when the span `[top - 1, top]` of the second curve
    /// touches a forbidden range, `BottommostFirst` otherwise.
    pub fn select(top: i32, forbidden: &[RangeInclusive<usize>]) -> Self {
        let touches = forbidden.iter().any(|range| {
            let (lo, hi) = (*range.start() as i64, *range.end() as i64);
            let top = i64::from(top);
            lo <= top && top <= hi + 1
        });
        if touches {
            TraversalOrder::TopmostFirst
        } else {
            TraversalOrder::BottommostFirst
        }
    }

    /// First edge in this order whose label is at most `s`.
    pub fn pick(self, edges: &[ReachEdge], s: usize) -> Option<&ReachEdge> {
        match self {
            TraversalOrder::TopmostFirst => edges.iter().find(|e| e.label <= s),
            TraversalOrder::BottommostFirst => edges.iter().rev().find(|e| e.label <= s),
        }
    }
}

/// Sliding-window matcher answering [`WindowedMatcher::find_start`] queries.
#[derive(Debug)]
pub struct WindowedMatcher<P: FreeSpacePredicate> {
    graph: ReachabilityGraph<P>,
}

/// Point-to-point matching.
pub type DiscreteMatcher = WindowedMatcher<DiscretePredicate>;
/// Vertex-monotone (semi-weak) matching.
pub type VertexMonotoneMatcher = WindowedMatcher<VertexMonotonePredicate>;
/// Half-edge matching.
pub type HalfEdgeMatcher = WindowedMatcher<HalfEdgePredicate>;

impl<P: FreeSpacePredicate> WindowedMatcher<P> {
    pub fn new(predicate: P) -> Self {
        Self {
            graph: ReachabilityGraph::new(predicate),
        }
    }

    pub fn graph(&self) -> &ReachabilityGraph<P> {
        &self.graph
    }

    pub fn window(&self) -> Range<usize> {
        self.graph.window()
    }

    /// See [`ReachabilityGraph::add_column`].
    pub fn add_column(&mut self) {
        self.graph.add_column();
    }

    /// See [`ReachabilityGraph::remove_column`].
    pub fn remove_column(&mut self) {
        self.graph.remove_column();
    }

    /// Height on the second curve at which a monotone path ending at
    /// `(t, yt)` starts in column `s`.
    ///
    /// Returns `None` if `s` or `t` lies outside the window, `s > t`, the end
    /// point is not free, or the walk dead-ends. Heights inside `forbidden`
    /// make the walk keep to the topmost edges so the matched piece stays
    /// clear of them.
    ///
    /// When the end point already lies on column `s` (always the case for
    /// `t == s` on the direct grid), its own height is returned without
    /// following any edge; there is no fallback to height 0.
    pub fn find_start(
        &self,
        s: usize,
        t: usize,
        yt: usize,
        forbidden: &[RangeInclusive<usize>],
    ) -> Option<usize> {
        let window = self.graph.window();
        if s > t || !window.contains(&s) || !window.contains(&t) {
            return None;
        }

        let codec = self.graph.codec();
        let start = codec.query_start(t, yt)?;
        if !self.graph.is_materialized(start) {
            return None;
        }
        if let Some(height) = codec.start_height(start, s) {
            return Some(height);
        }

        let mut current: GraphCoord = start;
        loop {
            let order = TraversalOrder::select(codec.span_top(current.y), forbidden);
            let Some(edge) = order.pick(self.graph.edges(current), s) else {
                debug!(
                    "[Matcher] Dead end at {} for s={} t={} yt={}",
                    current, s, t, yt
                );
                return None;
            };
            if let Some(height) = codec.start_height(edge.target, s) {
                return Some(height);
            }
            current = edge.target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(x: i32, y: i32, label: usize) -> ReachEdge {
        let target = GraphCoord::new(x, y);
        ReachEdge {
            target,
            label,
            origin: target,
        }
    }

    #[test]
    fn test_select_touching_ranges() {
        assert_eq!(TraversalOrder::select(3, &[]), TraversalOrder::BottommostFirst);
        assert_eq!(TraversalOrder::select(3, &[3..=5]), TraversalOrder::TopmostFirst);
        // [2, 3] touches [0, 2]
        assert_eq!(TraversalOrder::select(3, &[0..=2]), TraversalOrder::TopmostFirst);
        assert_eq!(TraversalOrder::select(4, &[0..=2]), TraversalOrder::BottommostFirst);
        assert_eq!(TraversalOrder::select(3, &[4..=9]), TraversalOrder::BottommostFirst);
    }

    #[test]
    fn test_pick_respects_label() {
        let edges = [edge(1, 3, 2), edge(1, 2, 0), edge(2, 2, 1)];
        let top = TraversalOrder::TopmostFirst.pick(&edges, 0).unwrap();
        assert_eq!(top.target, GraphCoord::new(1, 2));
        let bottom = TraversalOrder::BottommostFirst.pick(&edges, 1).unwrap();
        assert_eq!(bottom.target, GraphCoord::new(2, 2));
        assert!(TraversalOrder::TopmostFirst.pick(&[], 5).is_none());
    }
}
