//! Spatial index over candidate curve edges, used to prune sweep columns.

use geo::Coord;
use rstar::{AABB, RTree, RTreeObject};

use crate::curve::ConcatenatedCurve;

/// Window queries over the edges of a concatenated candidate curve.
pub trait CandidateIndex: Send + Sync {
    /// Offsets of edges whose bounding box intersects `[min, max]`, ascending.
    fn query_window(&self, min: Coord<f64>, max: Coord<f64>) -> Vec<usize>;

    /// Number of indexed edges.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Edges whose bounding box comes within `radius` of `center` along
    /// both axes.
    fn query_near(&self, center: Coord<f64>, radius: f64) -> Vec<usize> {
        self.query_window(
            Coord {
                x: center.x - radius,
                y: center.y - radius,
            },
            Coord {
                x: center.x + radius,
                y: center.y + radius,
            },
        )
    }
}

/// A candidate edge with its offset in the concatenation.
#[derive(Debug, Clone, Copy)]
pub struct IndexedEdge {
    pub offset: usize,
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl RTreeObject for IndexedEdge {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

/// R-tree of every non-border edge of a concatenated curve.
pub struct EdgeRTree {
    tree: RTree<IndexedEdge>,
}

impl EdgeRTree {
    pub fn new(curve: &ConcatenatedCurve) -> Self {
        let joined = curve.joined();
        let edges: Vec<IndexedEdge> = (0..joined.num_edges())
            .filter(|&e| !curve.is_border_edge(e as i64))
            .map(|e| {
                let line = joined.edge(e);
                IndexedEdge {
                    offset: e,
                    min: [
                        line.start.x.min(line.end.x),
                        line.start.y.min(line.end.y),
                    ],
                    max: [
                        line.start.x.max(line.end.x),
                        line.start.y.max(line.end.y),
                    ],
                }
            })
            .collect();
        Self {
            tree: RTree::bulk_load(edges),
        }
    }
}

impl CandidateIndex for EdgeRTree {
    fn query_window(&self, min: Coord<f64>, max: Coord<f64>) -> Vec<usize> {
        let envelope = AABB::from_corners([min.x, min.y], [max.x, max.y]);
        let mut found: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|edge| edge.offset)
            .collect();
        found.sort_unstable();
        found
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}
