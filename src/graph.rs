//! Incrementally built reachability graph over a window of columns.
//!
//! Every free grid coordinate inside the window is a vertex. Edges point to
//! free neighbours with smaller coordinates (left, down, or diagonally
//! down-left in curve terms), so the graph is acyclic and every backward walk
//! terminates. Each edge carries a *label*: the smallest first-curve index
//! reachable from its target, and the *origin*: the sink at which that
//! minimum is attained.
//!
//! Columns are materialized left to right with [`ReachabilityGraph::add_column`]
//! and dropped from the left with [`ReachabilityGraph::remove_column`].

use std::collections::VecDeque;
use std::ops::Range;

use log::debug;

use crate::distance::CurveAccess;
use crate::grid::{GraphCoord, GridCodec};
use crate::predicate::{Axis, FreeSpacePredicate};

/// Directed, labelled edge towards a free neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachEdge {
    pub target: GraphCoord,
    /// Smallest first-curve index reachable through `target`.
    pub label: usize,
    /// Sink where the path realizing `label` ends.
    pub origin: GraphCoord,
}

/// A materialized free vertex and its outgoing edges, topmost target first.
#[derive(Debug, Clone, Default)]
struct Cell {
    edges: Vec<ReachEdge>,
}

/// Reachability graph for one predicate.
#[derive(Debug)]
pub struct ReachabilityGraph<P: FreeSpacePredicate> {
    predicate: P,
    codec: P::Codec,
    columns: VecDeque<Vec<Option<Cell>>>,
    graph_min: usize,
    height: usize,
    width: usize,
}

impl<P: FreeSpacePredicate> ReachabilityGraph<P> {
    /// Create a graph with an empty window.
    pub fn new(predicate: P) -> Self {
        let codec = predicate.codec();
        let height = codec.column_height(predicate.curves().second_len());
        let width = predicate.curves().first_len();
        Self {
            predicate,
            codec,
            columns: VecDeque::new(),
            graph_min: 0,
            height,
            width,
        }
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    pub fn codec(&self) -> P::Codec {
        self.codec
    }

    /// Materialized columns as the half-open range `graph_min..graph_max + 1`.
    pub fn window(&self) -> Range<usize> {
        self.graph_min..self.graph_min + self.columns.len()
    }

    /// Number of rows in every column.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns the first curve provides.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether `at` is a free vertex inside the window.
    pub fn is_materialized(&self, at: GraphCoord) -> bool {
        self.cell(at).is_some()
    }

    /// Outgoing edges of `at`, topmost target first. Empty for sinks and for
    /// coordinates that are not materialized.
    pub fn edges(&self, at: GraphCoord) -> &[ReachEdge] {
        self.cell(at).map_or(&[], |cell| cell.edges.as_slice())
    }

    /// First edge with the minimum label.
    pub fn min_edge(&self, at: GraphCoord) -> Option<&ReachEdge> {
        min_label_edge(self.edges(at))
    }

    /// All materialized vertices, column by column and bottom to top.
    pub fn vertices(&self) -> impl Iterator<Item = GraphCoord> + '_ {
        self.columns.iter().enumerate().flat_map(move |(offset, column)| {
            let x = self.graph_min + offset;
            column
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_some())
                .filter_map(move |(row, _)| self.codec.coord_at(x, row))
        })
    }

    /// Materialize column `graph_max + 1` over every row.
    ///
    /// # Panics
    ///
    /// Panics if the first curve has no further column.
    pub fn add_column(&mut self) {
        let rows: Vec<usize> = (0..self.height).collect();
        self.add_column_with(&rows, |_, _| {});
    }

    /// Materialize the next column over `rows` (ascending) only, calling
    /// `on_edge(source, target)` for every edge created.
    pub(crate) fn add_column_with<F>(&mut self, rows: &[usize], mut on_edge: F)
    where
        F: FnMut(GraphCoord, GraphCoord),
    {
        let column = self.window().end;
        assert!(
            column < self.width,
            "add_column past the end: column {} of {}",
            column,
            self.width
        );

        self.columns
            .push_back((0..self.height).map(|_| None).collect());
        let back = self.columns.len() - 1;

        let mut free = 0usize;
        let mut edge_count = 0usize;
        for &row in rows {
            debug_assert!(row < self.height, "row {} outside column", row);
            let Some(at) = self.codec.coord_at(column, row) else {
                continue;
            };
            if !self.predicate.is_free(at) {
                continue;
            }
            let edges = self.build_edges(at);
            for edge in &edges {
                on_edge(at, edge.target);
            }
            free += 1;
            edge_count += edges.len();
            self.columns[back][row] = Some(Cell { edges });
        }

        debug!(
            "[Graph] Added column {}: {} free vertices, {} edges, window {:?}",
            column,
            free,
            edge_count,
            self.window()
        );
    }

    /// Drop column `graph_min` and every edge pointing into it.
    ///
    /// # Panics
    ///
    /// Panics if the window is empty.
    pub fn remove_column(&mut self) {
        assert!(!self.columns.is_empty(), "remove_column on an empty window");
        self.columns.pop_front();
        self.graph_min += 1;

        let graph_min = self.graph_min as i32;
        let codec = self.codec;
        let mut dropped = 0usize;
        if let Some(front) = self.columns.front_mut() {
            for cell in front.iter_mut().flatten() {
                let before = cell.edges.len();
                cell.edges
                    .retain(|edge| codec.column_of(edge.target.x) >= graph_min);
                dropped += before - cell.edges.len();
            }
        }

        debug!(
            "[Graph] Removed column {}: {} edges dropped, window {:?}",
            self.graph_min - 1,
            dropped,
            self.window()
        );
    }

    fn cell(&self, at: GraphCoord) -> Option<&Cell> {
        let column = usize::try_from(self.codec.column_of(at.x)).ok()?;
        let row = usize::try_from(at.y).ok()?;
        let offset = column.checked_sub(self.graph_min)?;
        if self.codec.coord_at(column, row)? != at {
            return None;
        }
        self.columns.get(offset)?.get(row)?.as_ref()
    }

    /// Edges out of `at` towards already materialized vertices.
    fn build_edges(&self, at: GraphCoord) -> Vec<ReachEdge> {
        let mut edges = Vec::with_capacity(2);
        for target in self.codec.steps(at).into_iter().flatten() {
            let (first_edge, second_edge) = self.codec.crossed_edges(at, target);
            if first_edge.is_some_and(|e| self.predicate.crosses_border(Axis::First, e))
                || second_edge.is_some_and(|e| self.predicate.crosses_border(Axis::Second, e))
            {
                continue;
            }
            let Some(cell) = self.cell(target) else {
                continue;
            };
            let reach = match min_label_edge(&cell.edges) {
                Some(min) => Some((min.label, min.origin)),
                None => self
                    .codec
                    .sink_label(target)
                    .map(|label| (label as usize, target)),
            };
            if let Some((label, origin)) = reach {
                edges.push(ReachEdge {
                    target,
                    label,
                    origin,
                });
            }
        }
        edges
    }
}

/// First edge attaining the minimum label.
pub(crate) fn min_label_edge(edges: &[ReachEdge]) -> Option<&ReachEdge> {
    edges
        .iter()
        .reduce(|best, edge| if edge.label < best.label { edge } else { best })
}
