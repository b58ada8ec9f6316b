//! Synthetic planar track generator for tests, benchmarking and the CLI demo.
//!
//! Generates noisy tracks that share a known corridor, so the bundle that
//! matching should discover is known up front. Coordinates are planar metres.
//!
//! Feature-gated behind `synthetic`.
//!
//! # Example
//!
//! ```rust
//! use tracebundle::synthetic::{CorridorPattern, CorridorScenario};
//!
//! let scenario = CorridorScenario {
//!     track_count: 12,
//!     corridor_length: 2_000.0,
//!     overlap_fraction: 0.75,
//!     pattern: CorridorPattern::Winding,
//!     approach_length: 300.0,
//!     noise_sigma: 3.0,
//!     point_spacing: 10.0,
//!     seed: 42,
//! };
//!
//! let dataset = scenario.generate();
//! assert_eq!(dataset.tracks.len(), 12);
//! ```

use std::f64::consts::PI;

use geo::Coord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::curve::Curve;

/// Shape of the shared corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorPattern {
    /// Straight line with minor drift.
    Straight,
    /// Winding road, gentle sinusoidal turns plus random jitter.
    Winding,
    /// Loop returning near its start.
    Loop,
}

/// Scenario for one shared corridor.
#[derive(Debug, Clone)]
pub struct CorridorScenario {
    /// Number of tracks to generate.
    pub track_count: usize,
    /// Length of the shared corridor in metres.
    pub corridor_length: f64,
    /// Fraction of tracks that follow the corridor (0.0-1.0).
    pub overlap_fraction: f64,
    /// Corridor shape.
    pub pattern: CorridorPattern,
    /// Length of the random lead-in and lead-out around the corridor.
    pub approach_length: f64,
    /// Gaussian noise standard deviation in metres.
    pub noise_sigma: f64,
    /// Distance between consecutive points in metres.
    pub point_spacing: f64,
    /// RNG seed for deterministic reproduction.
    pub seed: u64,
}

impl Default for CorridorScenario {
    fn default() -> Self {
        Self {
            track_count: 20,
            corridor_length: 2_000.0,
            overlap_fraction: 0.8,
            pattern: CorridorPattern::Winding,
            approach_length: 300.0,
            noise_sigma: 3.0,
            point_spacing: 10.0,
            seed: 42,
        }
    }
}

/// Generated tracks plus the ground-truth corridor.
#[derive(Debug, Clone)]
pub struct CorridorDataset {
    pub tracks: Vec<Curve>,
    /// Noise-free corridor polyline.
    pub corridor: Curve,
    /// Ids of tracks that follow the corridor.
    pub corridor_track_ids: Vec<String>,
    pub total_points: usize,
}

fn advance(from: Coord<f64>, heading: f64, distance: f64) -> Coord<f64> {
    Coord {
        x: from.x + distance * heading.cos(),
        y: from.y + distance * heading.sin(),
    }
}

fn generate_corridor(scenario: &CorridorScenario, rng: &mut StdRng) -> Vec<Coord<f64>> {
    let steps = (scenario.corridor_length / scenario.point_spacing).ceil() as usize;
    let mut points = Vec::with_capacity(steps + 1);
    let mut heading = PI / 6.0;
    let mut current = Coord { x: 0.0, y: 0.0 };
    points.push(current);

    for i in 0..steps {
        heading += match scenario.pattern {
            CorridorPattern::Straight => rng.gen_range(-0.02..0.02),
            CorridorPattern::Winding => {
                let base_turn = (i as f64 * 0.05).sin() * 0.1;
                base_turn + rng.gen_range(-0.05..0.05)
            }
            CorridorPattern::Loop => 2.0 * PI / steps as f64 + rng.gen_range(-0.02..0.02),
        };
        current = advance(current, heading, scenario.point_spacing);
        points.push(current);
    }
    points
}

fn random_walk(
    start: Coord<f64>,
    length: f64,
    initial_heading: f64,
    spacing: f64,
    rng: &mut StdRng,
) -> Vec<Coord<f64>> {
    let steps = (length / spacing).ceil() as usize;
    let mut points = Vec::with_capacity(steps + 1);
    let mut heading = initial_heading;
    let mut current = start;
    points.push(current);
    for _ in 0..steps {
        heading += rng.gen_range(-0.3..0.3);
        current = advance(current, heading, spacing);
        points.push(current);
    }
    points
}

/// Gaussian noise via the Box-Muller transform.
fn add_noise(points: &[Coord<f64>], sigma: f64, rng: &mut StdRng) -> Vec<Coord<f64>> {
    if sigma <= 0.0 {
        return points.to_vec();
    }
    points
        .iter()
        .map(|p| {
            let u1: f64 = rng.gen_range(0.0001..1.0);
            let u2: f64 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt() * sigma;
            Coord {
                x: p.x + r * (2.0 * PI * u2).cos(),
                y: p.y + r * (2.0 * PI * u2).sin(),
            }
        })
        .collect()
}

fn curve(id: String, points: Vec<Coord<f64>>) -> Curve {
    // Generated points are finite and non-empty by construction.
    match Curve::new(id, points) {
        Ok(curve) => curve,
        Err(err) => unreachable!("synthetic curve rejected: {}", err),
    }
}

impl CorridorScenario {
    /// Generate the dataset for this scenario.
    pub fn generate(&self) -> CorridorDataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let corridor = generate_corridor(self, &mut rng);
        let (first, last) = (corridor[0], corridor[corridor.len() - 1]);

        let mut tracks = Vec::with_capacity(self.track_count);
        let mut corridor_track_ids = Vec::new();

        for index in 0..self.track_count {
            let id = format!("synth_{:04}", index);
            let follows: f64 = rng.r#gen();
            let points = if follows < self.overlap_fraction {
                corridor_track_ids.push(id.clone());

                let approach_heading: f64 = rng.gen_range(0.0..(2.0 * PI));
                let approach_start = advance(first, approach_heading, self.approach_length);
                let mut approach = random_walk(
                    approach_start,
                    self.approach_length * 0.8,
                    approach_heading + PI,
                    self.point_spacing,
                    &mut rng,
                );
                approach.extend(add_noise(&corridor, self.noise_sigma, &mut rng));
                let departure_heading: f64 = rng.gen_range(0.0..(2.0 * PI));
                let departure = random_walk(
                    last,
                    self.approach_length * 0.8,
                    departure_heading,
                    self.point_spacing,
                    &mut rng,
                );
                approach.extend(departure.into_iter().skip(1));
                approach
            } else {
                let length: f64 = rng.gen_range(0.5..1.5) * self.corridor_length;
                let heading: f64 = rng.gen_range(0.0..(2.0 * PI));
                let offset = advance(first, heading, self.corridor_length);
                random_walk(offset, length, heading, self.point_spacing, &mut rng)
            };
            tracks.push(curve(id, points));
        }

        let total_points = tracks.iter().map(Curve::num_points).sum();
        CorridorDataset {
            tracks,
            corridor: curve("corridor".to_string(), corridor),
            corridor_track_ids,
            total_points,
        }
    }
}
