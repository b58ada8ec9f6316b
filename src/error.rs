//! Unified error handling.
//!
//! Query misses are not errors: `find_start` and trimmed sub-trajectories
//! report them with `Option`. `BundleError` covers bad input data, while
//! caller bugs (removing from an empty window, indexing past a curve) panic.

use thiserror::Error;

/// Errors produced while building curves, configurations and sub-trajectories.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BundleError {
    /// A curve has fewer points than the operation needs.
    #[error("curve {curve_id} has {point_count} points, at least {minimum_required} required")]
    InsufficientPoints {
        curve_id: String,
        point_count: usize,
        minimum_required: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("curve {curve_id} has a non-finite coordinate at index {index}")]
    NonFiniteCoordinate { curve_id: String, index: usize },

    /// Epsilon must be finite and non-negative.
    #[error("invalid epsilon {epsilon}: must be finite and non-negative")]
    InvalidEpsilon { epsilon: f64 },

    /// A concatenation needs at least one curve.
    #[error("cannot concatenate an empty set of curves")]
    EmptyConcatenation,

    /// The requested range does not lie within a single source curve.
    #[error("range [{from}, {to}] does not fit a single source curve")]
    RangeOutsideCurve { from: usize, to: usize },

    /// Reading input failed (CLI only).
    #[error("i/o error: {0}")]
    Io(String),

    /// Parsing a GPX document failed (CLI only).
    #[error("gpx error: {0}")]
    Gpx(String),
}

impl From<std::io::Error> for BundleError {
    fn from(err: std::io::Error) -> Self {
        BundleError::Io(err.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Conversions from `Option` into [`BundleError`] variants.
pub trait OptionExt<T> {
    /// Map `None` to [`BundleError::InsufficientPoints`].
    fn ok_or_insufficient_points(
        self,
        curve_id: &str,
        point_count: usize,
        minimum_required: usize,
    ) -> Result<T>;

    /// Map `None` to [`BundleError::RangeOutsideCurve`].
    fn ok_or_range(self, from: usize, to: usize) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_insufficient_points(
        self,
        curve_id: &str,
        point_count: usize,
        minimum_required: usize,
    ) -> Result<T> {
        self.ok_or_else(|| BundleError::InsufficientPoints {
            curve_id: curve_id.to_string(),
            point_count,
            minimum_required,
        })
    }

    fn ok_or_range(self, from: usize, to: usize) -> Result<T> {
        self.ok_or(BundleError::RangeOutsideCurve { from, to })
    }
}
