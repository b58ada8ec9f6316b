//! Grid coordinates of the free space diagram.
//!
//! Two layouts share the graph machinery:
//!
//! - [`DirectGrid`]: coordinates are plain curve indices; a vertex is a pair
//!   of curve points (discrete and half-edge policies).
//! - [`DoubledGrid`]: even values address vertices (`vertex(i) = 2i`) and odd
//!   values edge intervals (`edge(i) = 2i + 1`). A graph vertex is a grid
//!   edge of the diagram: `(2i, 2j + 1)` is the vertical grid edge at point
//!   `i` spanning edge `j`, `(2i + 1, 2j)` the horizontal one at point `j`.
//!
//! A *column* is the unit materialized by `add_column`. For the doubled grid
//! column `i` holds the vertical grid edges at `x = 2i` and the horizontal
//! grid edges ending there (`x = 2i - 1`); both are addressed by their `y`,
//! whose parity tells them apart. Rows are therefore addressed by `y` in
//! both layouts.

use std::fmt;

/// A position in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphCoord {
    pub x: i32,
    pub y: i32,
}

impl GraphCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GraphCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Grid coordinate of vertex `i`.
#[inline]
pub const fn vertex(i: i32) -> i32 {
    2 * i
}

/// Grid coordinate of edge `i`.
#[inline]
pub const fn edge(i: i32) -> i32 {
    2 * i + 1
}

/// Enclosing lower curve index (floor of half).
#[inline]
pub const fn low(c: i32) -> i32 {
    c.div_euclid(2)
}

/// Enclosing upper curve index (ceil of half).
#[inline]
pub const fn up(c: i32) -> i32 {
    (c + 1).div_euclid(2)
}

#[inline]
pub const fn is_even(c: i32) -> bool {
    c & 1 == 0
}

/// Candidate steps out of a vertex, topmost first. At most three.
pub type Steps = [Option<GraphCoord>; 3];

/// Mapping between curve indices, columns and grid coordinates.
pub trait GridCodec: Copy + Default + fmt::Debug {
    /// Rows per column for a second curve of `second_len` points.
    fn column_height(&self, second_len: usize) -> usize;

    /// Coordinate stored at `row` of `column`, if that slot exists.
    fn coord_at(&self, column: usize, row: usize) -> Option<GraphCoord>;

    /// Column holding grid x-coordinate `x`.
    fn column_of(&self, x: i32) -> i32;

    /// Curve index on the first curve addressed by `x`.
    fn curve_x(&self, x: i32) -> i32;

    /// Steps towards smaller coordinates, ordered top to bottom.
    fn steps(&self, at: GraphCoord) -> Steps;

    /// Label of a vertex without outgoing edges, or `None` if such a vertex
    /// must not be stepped onto.
    fn sink_label(&self, at: GraphCoord) -> Option<i32>;

    /// First-curve edge and second-curve edge crossed by a step, when the
    /// target's own freeness does not already cover them.
    fn crossed_edges(&self, from: GraphCoord, to: GraphCoord) -> (Option<i32>, Option<i32>);

    /// Vertex a backward query starts from for a match ending at `(t, yt)`.
    fn query_start(&self, t: usize, yt: usize) -> Option<GraphCoord>;

    /// Height on the second curve if `at` is a valid match start on column `s`.
    fn start_height(&self, at: GraphCoord, s: usize) -> Option<usize>;

    /// Upper second-curve index of the span covered by `y`.
    fn span_top(&self, y: i32) -> i32;
}

/// Plain curve-index grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectGrid;

impl GridCodec for DirectGrid {
    fn column_height(&self, second_len: usize) -> usize {
        second_len
    }

    fn coord_at(&self, column: usize, row: usize) -> Option<GraphCoord> {
        Some(GraphCoord::new(column as i32, row as i32))
    }

    #[inline]
    fn column_of(&self, x: i32) -> i32 {
        x
    }

    #[inline]
    fn curve_x(&self, x: i32) -> i32 {
        x
    }

    fn steps(&self, at: GraphCoord) -> Steps {
        let GraphCoord { x, y } = at;
        [
            Some(GraphCoord::new(x - 1, y)),
            Some(GraphCoord::new(x - 1, y - 1)),
            Some(GraphCoord::new(x, y - 1)),
        ]
    }

    fn sink_label(&self, at: GraphCoord) -> Option<i32> {
        Some(at.x)
    }

    fn crossed_edges(&self, from: GraphCoord, to: GraphCoord) -> (Option<i32>, Option<i32>) {
        (
            (to.x < from.x).then_some(to.x),
            (to.y < from.y).then_some(to.y),
        )
    }

    fn query_start(&self, t: usize, yt: usize) -> Option<GraphCoord> {
        Some(GraphCoord::new(t as i32, yt as i32))
    }

    fn start_height(&self, at: GraphCoord, s: usize) -> Option<usize> {
        (at.x == s as i32).then_some(at.y as usize)
    }

    #[inline]
    fn span_top(&self, y: i32) -> i32 {
        y
    }
}

/// Doubled grid where vertices and edge intervals interleave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoubledGrid;

impl DoubledGrid {
    /// Vertex for the horizontal grid edge starting at `(x, y)`.
    #[inline]
    pub const fn horizontal(x: i32, y: i32) -> GraphCoord {
        GraphCoord::new(edge(x), vertex(y))
    }

    /// Vertex for the vertical grid edge starting at `(x, y)`.
    #[inline]
    pub const fn vertical(x: i32, y: i32) -> GraphCoord {
        GraphCoord::new(vertex(x), edge(y))
    }

    #[inline]
    pub const fn is_vertical(at: GraphCoord) -> bool {
        is_even(at.x)
    }

    #[inline]
    pub const fn is_horizontal(at: GraphCoord) -> bool {
        is_even(at.y)
    }
}

impl GridCodec for DoubledGrid {
    fn column_height(&self, second_len: usize) -> usize {
        (2 * second_len).saturating_sub(1)
    }

    fn coord_at(&self, column: usize, row: usize) -> Option<GraphCoord> {
        let (column, row) = (column as i32, row as i32);
        if is_even(row) {
            (column > 0).then(|| GraphCoord::new(vertex(column) - 1, row))
        } else {
            Some(GraphCoord::new(vertex(column), row))
        }
    }

    #[inline]
    fn column_of(&self, x: i32) -> i32 {
        up(x)
    }

    #[inline]
    fn curve_x(&self, x: i32) -> i32 {
        low(x)
    }

    fn steps(&self, at: GraphCoord) -> Steps {
        let GraphCoord { x, y } = at;
        if Self::is_vertical(at) {
            // left to the previous vertical, bottom to the horizontal below-left
            [
                Some(GraphCoord::new(x - 2, y)),
                Some(GraphCoord::new(x - 1, y - 1)),
                None,
            ]
        } else {
            // left to the vertical below-left, bottom to the horizontal below
            [
                Some(GraphCoord::new(x - 1, y - 1)),
                Some(GraphCoord::new(x, y - 2)),
                None,
            ]
        }
    }

    fn sink_label(&self, at: GraphCoord) -> Option<i32> {
        Self::is_vertical(at).then_some(low(at.x))
    }

    fn crossed_edges(&self, from: GraphCoord, to: GraphCoord) -> (Option<i32>, Option<i32>) {
        (
            (from.x - to.x == 2).then_some(low(to.x)),
            (from.y - to.y == 2).then_some(low(to.y)),
        )
    }

    fn query_start(&self, t: usize, yt: usize) -> Option<GraphCoord> {
        (yt >= 1).then(|| Self::vertical(t as i32, yt as i32 - 1))
    }

    fn start_height(&self, at: GraphCoord, s: usize) -> Option<usize> {
        (Self::is_vertical(at) && low(at.x) == s as i32).then_some(low(at.y) as usize)
    }

    #[inline]
    fn span_top(&self, y: i32) -> i32 {
        up(y)
    }
}
