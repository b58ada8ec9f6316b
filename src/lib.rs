//! # Trace Bundle
//!
//! Free space reachability engine for discovering bundles of GPS
//! trajectories that travel, within a distance epsilon, along the same path.
//!
//! This library provides:
//! - Free space predicates for discrete, vertex-monotone and half-edge matching
//! - An incrementally built, labelled reachability graph over a sliding window
//! - Windowed start queries (`find_start`) for the outer bundle search
//! - A sweep mode matching one representative against many candidates at once,
//!   pruned with an R-tree, producing ordered start/end events
//! - Parallel batch sweeps
//!
//! ## Features
//!
//! - **`parallel`** - Run batch sweeps on the rayon pool
//! - **`synthetic`** - Seeded generator of noisy corridor tracks
//! - **`cli`** - The `tracebundle-cli` debugging tool (GPX input)
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tracebundle::{ConcatenatedCurve, Curve, CurvePair, DiscretePredicate, WindowedMatcher};
//!
//! let a = Curve::from_xy("a", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).unwrap();
//! let b = Curve::from_xy("b", &[(0.0, 0.1), (1.0, 0.1), (2.0, 0.1)]).unwrap();
//! let pair = CurvePair::new(
//!     Arc::new(ConcatenatedCurve::from(a)),
//!     Arc::new(ConcatenatedCurve::from(b)),
//! );
//!
//! let mut matcher = WindowedMatcher::new(DiscretePredicate::new(pair, 0.5).unwrap());
//! for _ in 0..3 {
//!     matcher.add_column();
//! }
//! assert_eq!(matcher.find_start(0, 2, 2, &[]), Some(0));
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{BundleError, OptionExt, Result};

// Numeric and geometric building blocks
pub mod fuzzy;
pub mod geometry;
pub use fuzzy::Tolerance;

// Curves and index-based distance access
pub mod curve;
pub mod distance;
pub use curve::{ConcatenatedCurve, Curve, SubCurve};
pub use distance::{CurveAccess, CurvePair};

// Grid layouts and free space predicates
pub mod grid;
pub mod predicate;
pub use grid::{DirectGrid, DoubledGrid, GraphCoord, GridCodec};
pub use predicate::{
    Axis, DiscretePredicate, FreeSpacePredicate, HalfEdgePredicate, VertexMonotonePredicate,
};

// Reachability graph and windowed queries
pub mod graph;
pub mod matcher;
pub use graph::{ReachEdge, ReachabilityGraph};
pub use matcher::{
    DiscreteMatcher, HalfEdgeMatcher, TraversalOrder, VertexMonotoneMatcher, WindowedMatcher,
};

// Sweep mode with spatial pruning
pub mod index;
pub mod sweep;
pub use index::{CandidateIndex, EdgeRTree};
pub use sweep::{Event, MatchVertex, SweepMatcher, collect_events_batch};

// Synthetic corridor data for tests, benchmarks and the CLI demo
#[cfg(feature = "synthetic")]
pub mod synthetic;

/// Distance policy deciding which grid coordinates are free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreeSpacePolicy {
    /// Point to point
    Discrete,
    /// Point to edge and edge to point (semi-weak Fréchet)
    VertexMonotone,
    /// Point to the half edges around the other point, symmetric
    HalfEdge,
}

impl FreeSpacePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FreeSpacePolicy::Discrete => "discrete",
            FreeSpacePolicy::VertexMonotone => "vertex_monotone",
            FreeSpacePolicy::HalfEdge => "half_edge",
        }
    }
}

impl std::fmt::Display for FreeSpacePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FreeSpacePolicy {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "discrete" => Ok(FreeSpacePolicy::Discrete),
            "vertex_monotone" | "semi_weak" => Ok(FreeSpacePolicy::VertexMonotone),
            "half_edge" => Ok(FreeSpacePolicy::HalfEdge),
            other => Err(format!("unknown free space policy '{}'", other)),
        }
    }
}

impl Default for FreeSpacePolicy {
    fn default() -> Self {
        FreeSpacePolicy::VertexMonotone
    }
}

/// Configuration for reachability matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum distance between matched positions.
    /// Default: 25.0 meters
    pub epsilon: f64,

    /// Absolute slack for all floating point comparisons.
    /// Default: 1e-6
    pub tolerance: f64,

    /// Distance policy for windowed matching. Sweeps always use vertex-monotone.
    /// Default: VertexMonotone
    pub policy: FreeSpacePolicy,

    /// A sweep column falls back to a full scan when its index query returns
    /// more than `candidate_edges ^ index_exponent` hits.
    /// Default: 0.77
    pub index_exponent: f64,

    /// Prune sweep columns with an R-tree over the candidate edges.
    /// Default: true
    pub use_index: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            epsilon: 25.0,
            tolerance: fuzzy::DEFAULT_DELTA,
            policy: FreeSpacePolicy::default(),
            index_exponent: 0.77,
            use_index: true,
        }
    }
}

impl MatchConfig {
    /// Config with the given epsilon and defaults otherwise.
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self {
            epsilon,
            ..Self::default()
        }
    }

    /// Check that epsilon is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        predicate::validate_epsilon(self.epsilon).map(|_| ())
    }
}
