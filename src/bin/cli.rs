//! tracebundle CLI - Debug tool for free space reachability matching
//!
//! Usage:
//!   tracebundle-cli sweep <folder> --epsilon <m> [--representative <file>]
//!   tracebundle-cli window <folder> --epsilon <m> [--policy <p>] [--width <n>]
//!   tracebundle-cli demo [--tracks <n>] [--seed <s>]
//!
//! GPX tracks are projected to local planar metres around the first point
//! loaded, then matched. Output shows events and matches so the behaviour of
//! the labelled graph can be inspected on real data.

use clap::{Parser, Subcommand};
use gpx::{Gpx, read};
use geo::Coord;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracebundle::{
    BundleError, ConcatenatedCurve, Curve, CurvePair, DiscretePredicate, Event,
    FreeSpacePolicy, FreeSpacePredicate, HalfEdgePredicate, MatchConfig, SweepMatcher,
    VertexMonotonePredicate, WindowedMatcher,
    synthetic::{CorridorPattern, CorridorScenario},
};

#[derive(Parser)]
#[command(name = "tracebundle-cli")]
#[command(about = "Debug tool for free space reachability matching", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep one representative against all tracks and print events
    Sweep {
        /// Folder containing GPX files
        folder: PathBuf,

        /// Matching distance in meters
        #[arg(short, long, default_value = "25")]
        epsilon: f64,

        /// File name of the representative (defaults to the first track)
        #[arg(short, long)]
        representative: Option<String>,

        /// Scan every column instead of using the R-tree
        #[arg(long)]
        no_index: bool,
    },

    /// Slide a window over the concatenated tracks and query match starts
    Window {
        /// Folder containing GPX files
        folder: PathBuf,

        /// Matching distance in meters
        #[arg(short, long, default_value = "25")]
        epsilon: f64,

        /// Free space policy: discrete, vertex_monotone or half_edge
        #[arg(short, long, default_value = "vertex_monotone")]
        policy: FreeSpacePolicy,

        /// Window width in points
        #[arg(short, long, default_value = "20")]
        width: usize,
    },

    /// Sweep synthetic corridor tracks
    Demo {
        /// Number of generated tracks
        #[arg(short, long, default_value = "10")]
        tracks: usize,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Matching distance in meters
        #[arg(short, long, default_value = "15")]
        epsilon: f64,
    },
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Sweep {
            folder,
            epsilon,
            representative,
            no_index,
        } => load_tracks(&folder, cli.verbose).and_then(|tracks| {
            let config = MatchConfig {
                epsilon,
                use_index: !no_index,
                ..MatchConfig::default()
            };
            run_sweep(tracks, representative.as_deref(), &config, cli.verbose)
        }),
        Commands::Window {
            folder,
            epsilon,
            policy,
            width,
        } => load_tracks(&folder, cli.verbose)
            .and_then(|tracks| run_window(tracks, epsilon, policy, width)),
        Commands::Demo {
            tracks,
            seed,
            epsilon,
        } => run_demo(tracks, seed, epsilon, cli.verbose),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Meters per degree of latitude (approximately constant).
const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Equirectangular projection around a fixed origin.
struct LocalProjection {
    origin_lat: f64,
    origin_lng: f64,
    meters_per_deg_lng: f64,
}

impl LocalProjection {
    fn new(origin_lat: f64, origin_lng: f64) -> Self {
        Self {
            origin_lat,
            origin_lng,
            meters_per_deg_lng: METERS_PER_DEG_LAT * origin_lat.to_radians().cos(),
        }
    }

    fn project(&self, lat: f64, lng: f64) -> Coord<f64> {
        Coord {
            x: (lng - self.origin_lng) * self.meters_per_deg_lng,
            y: (lat - self.origin_lat) * METERS_PER_DEG_LAT,
        }
    }
}

/// Load all GPX files of a folder as planar curves.
fn load_tracks(folder: &Path, verbose: bool) -> Result<Vec<Curve>, BundleError> {
    println!("\n{}", "=".repeat(60));
    println!("Loading GPX files from: {}", folder.display());
    println!("{}", "=".repeat(60));

    let mut paths: Vec<PathBuf> = fs::read_dir(folder)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "gpx"))
        .collect();
    paths.sort();

    let mut projection: Option<LocalProjection> = None;
    let mut tracks = Vec::new();
    for path in paths {
        if verbose {
            println!("\n  Processing: {}", path.display());
        }
        match parse_gpx_file(&path) {
            Ok((name, latlng)) => {
                let projection = projection
                    .get_or_insert_with(|| LocalProjection::new(latlng[0].0, latlng[0].1));
                let points = latlng
                    .iter()
                    .map(|&(lat, lng)| projection.project(lat, lng))
                    .collect();
                let curve = Curve::new(name, points)?;
                println!(
                    "  [OK] {} - {} points, {:.1}km",
                    curve.id(),
                    curve.num_points(),
                    curve.euclidean_length() / 1000.0
                );
                tracks.push(curve);
            }
            Err(e) => {
                eprintln!("  [ERR] Failed to parse {}: {}", path.display(), e);
            }
        }
    }

    println!("\nLoaded {} tracks", tracks.len());
    if tracks.is_empty() {
        return Err(BundleError::EmptyConcatenation);
    }
    Ok(tracks)
}

/// Parse a single GPX file into its name and `(lat, lng)` points.
fn parse_gpx_file(path: &Path) -> Result<(String, Vec<(f64, f64)>), BundleError> {
    let file = File::open(path)?;
    let gpx: Gpx = read(BufReader::new(file)).map_err(|e| BundleError::Gpx(e.to_string()))?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();

    let mut points = Vec::new();
    for track in &gpx.tracks {
        for segment in &track.segments {
            for pt in &segment.points {
                points.push((pt.point().y(), pt.point().x()));
            }
        }
    }

    if points.is_empty() {
        return Err(BundleError::Gpx("no track points found".to_string()));
    }
    Ok((name, points))
}

fn run_sweep(
    tracks: Vec<Curve>,
    representative: Option<&str>,
    config: &MatchConfig,
    verbose: bool,
) -> Result<(), BundleError> {
    let representative = match representative {
        Some(name) => {
            let stem = name.trim_end_matches(".gpx");
            tracks
                .iter()
                .find(|t| t.id() == stem)
                .cloned()
                .ok_or_else(|| BundleError::Io(format!("no track named '{}'", name)))?
        }
        None => tracks[0].clone(),
    };

    println!("\n{}", "=".repeat(60));
    println!(
        "Sweeping '{}' ({} points) against {} tracks, epsilon {}m",
        representative.id(),
        representative.num_points(),
        tracks.len(),
        config.epsilon
    );
    println!("{}", "=".repeat(60));

    let candidates = Arc::new(ConcatenatedCurve::new(tracks)?);
    let mut matcher = SweepMatcher::new(representative, Arc::clone(&candidates), config)?;
    matcher.compute();
    let events = matcher.collect_events();
    print_events(&matcher, &events, verbose);
    Ok(())
}

fn print_events(matcher: &SweepMatcher, events: &BTreeSet<Event>, verbose: bool) {
    let matches: Vec<&Event> = events.iter().filter(|e| e.is_start).collect();
    println!("\n{} matches ({} events)", matches.len(), events.len());

    for event in matches {
        let track = matcher.trajectory(event).map_or("?", Curve::id);
        let trimmed =
            matcher.trimmed_sub_trajectory(event.start.x, event.end.x, event.end);
        match trimmed {
            Some(sub) => println!(
                "  rep [{:>4}, {:>4}] ~ {} [{:.2}, {:.2}] ({:.1} points, {:.0}m)",
                event.start.x,
                event.end.x,
                track,
                sub.from,
                sub.to,
                sub.interval_length(),
                sub.euclidean_length()
            ),
            None => println!(
                "  rep [{:>4}, {:>4}] ~ {} [{}, {}] (untrimmed)",
                event.start.x, event.end.x, track, event.start.y, event.end.y
            ),
        }
    }

    if verbose {
        println!("\nEvent queue:");
        for event in events {
            println!(
                "  {} at {:>4}: ({}, {}) -> ({}, {})",
                if event.is_start { "start" } else { "end  " },
                event.primary_index(),
                event.start.x,
                event.start.y,
                event.end.x,
                event.end.y
            );
        }
    }
}

fn run_window(
    tracks: Vec<Curve>,
    epsilon: f64,
    policy: FreeSpacePolicy,
    width: usize,
) -> Result<(), BundleError> {
    let curves = Arc::new(ConcatenatedCurve::new(tracks)?);
    let pair = CurvePair::symmetric(Arc::clone(&curves));

    println!("\n{}", "=".repeat(60));
    println!(
        "Sliding a {}-point window over {} points, policy {}, epsilon {}m",
        width,
        curves.num_points(),
        policy,
        epsilon
    );
    println!("{}", "=".repeat(60));

    match policy {
        FreeSpacePolicy::Discrete => {
            slide(WindowedMatcher::new(DiscretePredicate::new(pair, epsilon)?), &curves, width)
        }
        FreeSpacePolicy::VertexMonotone => slide(
            WindowedMatcher::new(VertexMonotonePredicate::new(pair, epsilon)?),
            &curves,
            width,
        ),
        FreeSpacePolicy::HalfEdge => {
            slide(WindowedMatcher::new(HalfEdgePredicate::new(pair, epsilon)?), &curves, width)
        }
    }
    Ok(())
}

/// Slide the window one column at a time; for every full window inside a
/// single track, count the heights a match from its left to its right end
/// reaches, excluding the window's own piece.
fn slide<P: FreeSpacePredicate>(
    mut matcher: WindowedMatcher<P>,
    curves: &ConcatenatedCurve,
    width: usize,
) {
    let width = width.max(2);
    let n = curves.num_points();
    let mut total = 0usize;

    for t in 0..n {
        matcher.add_column();
        if matcher.window().len() > width {
            matcher.remove_column();
        }
        if t + 1 < width {
            continue;
        }
        let s = t + 1 - width;
        if !curves.same_curve(s, t) {
            continue;
        }
        let forbidden: [RangeInclusive<usize>; 1] = [s..=t];
        let starts: Vec<(usize, usize)> = (0..n)
            .filter_map(|yt| matcher.find_start(s, t, yt, &forbidden).map(|ys| (ys, yt)))
            .filter(|&(ys, yt)| !(s..=t).contains(&ys) && !(s..=t).contains(&yt))
            .collect();
        if !starts.is_empty() {
            let (ys, yt) = starts[0];
            let (track, offset) = curves.locate(ys);
            println!(
                "  [{:>5}, {:>5}] {} matches, first on {} [{}, {}]",
                s,
                t,
                starts.len(),
                track.id(),
                ys - offset,
                yt - offset
            );
        }
        total += starts.len();
    }

    println!("\nTotal matches: {}", total);
}

fn run_demo(tracks: usize, seed: u64, epsilon: f64, verbose: bool) -> Result<(), BundleError> {
    let scenario = CorridorScenario {
        track_count: tracks,
        pattern: CorridorPattern::Winding,
        seed,
        ..CorridorScenario::default()
    };
    let dataset = scenario.generate();
    println!(
        "Generated {} tracks ({} points), {} follow the corridor",
        dataset.tracks.len(),
        dataset.total_points,
        dataset.corridor_track_ids.len()
    );

    let config = MatchConfig::with_epsilon(epsilon);
    let candidates = Arc::new(ConcatenatedCurve::new(dataset.tracks)?);
    let mut matcher = SweepMatcher::new(dataset.corridor, candidates, &config)?;
    matcher.compute();
    let events = matcher.collect_events();
    print_events(&matcher, &events, verbose);
    Ok(())
}
