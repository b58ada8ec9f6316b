//! Tests for sweep module

use std::sync::Arc;
use tracebundle::{
    BundleError, ConcatenatedCurve, Curve, DoubledGrid, Event, MatchConfig, MatchVertex,
    SweepMatcher, collect_events_batch,
};

fn line(id: &str, from: usize, to: usize, y: f64) -> Curve {
    let xy: Vec<(f64, f64)> = (from..=to).map(|i| (i as f64, y)).collect();
    Curve::from_xy(id, &xy).unwrap()
}

/// A near candidate covering x in [2, 8] and a far one.
fn candidates() -> Arc<ConcatenatedCurve> {
    Arc::new(
        ConcatenatedCurve::new(vec![line("near", 2, 8, 0.2), line("far", 0, 4, 50.0)]).unwrap(),
    )
}

fn config(use_index: bool) -> MatchConfig {
    MatchConfig {
        use_index,
        ..MatchConfig::with_epsilon(0.5)
    }
}

fn swept(
    representative: Curve,
    candidates: Arc<ConcatenatedCurve>,
    use_index: bool,
) -> SweepMatcher {
    let mut matcher = SweepMatcher::new(representative, candidates, &config(use_index)).unwrap();
    matcher.compute();
    matcher
}

#[test]
fn test_single_match_events() {
    let matcher = swept(line("rep", 0, 10, 0.0), candidates(), true);
    assert_eq!(
        matcher.frontier().iter().copied().collect::<Vec<_>>(),
        vec![DoubledGrid::vertical(8, 5)]
    );

    let events: Vec<Event> = matcher.collect_events().into_iter().collect();
    let start = MatchVertex::new(2, 0);
    let end = MatchVertex::new(8, 6);
    assert_eq!(
        events,
        vec![Event::new(start, end, true), Event::new(start, end, false)]
    );
    assert_eq!(events[0].primary_index(), 2);
    assert_eq!(events[1].primary_index(), 8);
    assert_eq!(events[0].height(), 6);
    assert_eq!(matcher.trajectory(&events[0]).unwrap().id(), "near");
}

#[test]
fn test_compute_is_idempotent() {
    let mut matcher =
        SweepMatcher::new(line("rep", 0, 10, 0.0), candidates(), &config(true)).unwrap();
    assert!(matcher.collect_events().is_empty());
    matcher.compute();
    let first = matcher.collect_events();
    matcher.compute();
    assert_eq!(matcher.collect_events(), first);
    assert_eq!(matcher.graph().window(), 0..11);
}

#[test]
fn test_pruning_matches_full_scan() {
    let pruned = swept(line("rep", 0, 10, 0.0), candidates(), true);
    let full = swept(line("rep", 0, 10, 0.0), candidates(), false);
    assert_eq!(pruned.frontier(), full.frontier());
    assert_eq!(pruned.collect_events(), full.collect_events());
}

#[test]
fn test_two_copies_give_two_matches() {
    let curves = Arc::new(
        ConcatenatedCurve::new(vec![line("first", 2, 8, 0.2), line("second", 2, 8, -0.2)])
            .unwrap(),
    );
    let matcher = swept(line("rep", 0, 10, 0.0), curves, true);
    let events = matcher.collect_events();
    assert_eq!(events.len(), 4);

    let starts: Vec<&Event> = events.iter().filter(|e| e.is_start).collect();
    assert_eq!(starts.len(), 2);
    assert_eq!(starts[0].start, MatchVertex::new(2, 0));
    assert_eq!(starts[1].start, MatchVertex::new(2, 7));
    assert_eq!(matcher.trajectory(starts[1]).unwrap().id(), "second");
}

#[test]
fn test_events_never_span_candidates() {
    let curves = candidates();
    let matcher = swept(line("rep", 0, 10, 0.0), Arc::clone(&curves), true);
    for event in matcher.collect_events() {
        assert!(event.start.x <= event.end.x);
        assert!(event.start.y <= event.end.y);
        assert!(curves.same_curve(event.start.y, event.end.y));
    }
}

#[test]
fn test_sub_trajectory() {
    let matcher = swept(line("rep", 0, 10, 0.0), candidates(), true);

    let near = matcher.sub_trajectory(0, 6).unwrap();
    assert_eq!(near.curve.id(), "near");
    assert_eq!((near.from, near.to), (0.0, 6.0));

    let far = matcher.sub_trajectory(7, 9).unwrap();
    assert_eq!(far.curve.id(), "far");
    assert_eq!((far.from, far.to), (0.0, 2.0));

    assert_eq!(
        matcher.sub_trajectory(0, 7),
        Err(BundleError::RangeOutsideCurve { from: 0, to: 7 })
    );
    assert!(matcher.sub_trajectory(5, 3).is_err());
    assert!(matcher.sub_trajectory(100, 101).is_err());
}

#[test]
fn test_trimmed_sub_trajectory() {
    let matcher = swept(line("rep", 0, 10, 0.0), candidates(), true);
    let end = MatchVertex::new(8, 6);

    let trimmed = matcher.trimmed_sub_trajectory(2, 8, end).unwrap();
    assert_eq!(trimmed.curve.id(), "near");
    assert_eq!((trimmed.from, trimmed.to), (0.0, 6.0));

    // range past the end of the match
    assert!(matcher.trimmed_sub_trajectory(2, 9, end).is_none());
    // height 0 ends nothing
    assert!(
        matcher
            .trimmed_sub_trajectory(2, 8, MatchVertex::new(8, 0))
            .is_none()
    );
}

#[test]
fn test_trimmed_refines_to_circle() {
    // the candidate starts early, so its first point lies outside the disk
    // around representative point 0
    let candidate =
        Curve::from_xy("c", &[(-0.8, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]).unwrap();
    let curves = Arc::new(ConcatenatedCurve::from(candidate));
    let matcher = swept(line("rep", 0, 3, 0.0), curves, false);

    let events = matcher.collect_events();
    let end_event = events.iter().find(|e| !e.is_start).unwrap();
    assert_eq!(end_event.start, MatchVertex::new(0, 0));
    assert_eq!(end_event.end, MatchVertex::new(3, 3));

    let trimmed = matcher.trimmed_sub_trajectory(0, 3, end_event.end).unwrap();
    // (-0.8, 0) + t * (1.8, 0) enters the disk of radius 0.5 at x = -0.5
    assert!((trimmed.from - 0.3 / 1.8).abs() < 1e-9);
    assert_eq!(trimmed.to, 3.0);
}

#[test]
fn test_trimmed_bounds_inverted() {
    // both representative points lie near the same candidate edge, in the
    // opposite order along it
    let candidate = Curve::from_xy("c", &[(0.0, 0.0), (10.0, 0.0)]).unwrap();
    let representative = Curve::from_xy("rep", &[(8.0, 0.9), (2.0, 0.9)]).unwrap();
    let curves = Arc::new(ConcatenatedCurve::from(candidate));
    let mut matcher = SweepMatcher::new(
        representative,
        curves,
        &MatchConfig {
            use_index: false,
            ..MatchConfig::with_epsilon(1.0)
        },
    )
    .unwrap();
    matcher.compute();

    let start = MatchVertex::new(0, 0);
    let end = MatchVertex::new(1, 1);
    assert_eq!(
        matcher.collect_events().into_iter().collect::<Vec<_>>(),
        vec![Event::new(start, end, true), Event::new(start, end, false)]
    );
    // entering near x = 7.56 but leaving near x = 2.44
    assert!(matcher.trimmed_sub_trajectory(0, 1, end).is_none());
    assert!(matcher.sub_trajectory(0, 1).is_ok());
}

#[test]
fn test_invalid_config_rejected() {
    let result = SweepMatcher::new(
        line("rep", 0, 3, 0.0),
        candidates(),
        &MatchConfig::with_epsilon(-1.0),
    );
    assert!(matches!(result, Err(BundleError::InvalidEpsilon { .. })));
}

#[test]
fn test_batch_matches_single_sweeps() {
    let reps = vec![
        line("rep-a", 0, 10, 0.0),
        line("rep-b", 3, 12, 0.1),
        line("rep-c", 0, 5, 20.0),
    ];
    let curves = candidates();
    let batch = collect_events_batch(&reps, Arc::clone(&curves), &config(true)).unwrap();
    assert_eq!(batch.len(), reps.len());

    for (rep, events) in reps.iter().zip(&batch) {
        let single = swept(rep.clone(), Arc::clone(&curves), false);
        assert_eq!(events, &single.collect_events(), "{}", rep.id());
    }
    assert!(batch[2].is_empty());
}

#[cfg(feature = "synthetic")]
mod synthetic_corridors {
    use super::*;
    use tracebundle::synthetic::{CorridorPattern, CorridorScenario};

    #[test]
    fn test_pruning_matches_full_scan_on_corridor() {
        let dataset = CorridorScenario {
            track_count: 6,
            corridor_length: 600.0,
            pattern: CorridorPattern::Winding,
            ..CorridorScenario::default()
        }
        .generate();
        let curves = Arc::new(ConcatenatedCurve::new(dataset.tracks.clone()).unwrap());

        let pruned_config = MatchConfig::with_epsilon(15.0);
        let full_config = MatchConfig {
            use_index: false,
            ..pruned_config.clone()
        };
        let mut pruned =
            SweepMatcher::new(dataset.corridor.clone(), Arc::clone(&curves), &pruned_config)
                .unwrap();
        let mut full =
            SweepMatcher::new(dataset.corridor.clone(), Arc::clone(&curves), &full_config)
                .unwrap();
        pruned.compute();
        full.compute();

        let events = pruned.collect_events();
        assert_eq!(events, full.collect_events());
        assert!(!events.is_empty());

        for event in events.iter().filter(|e| !e.is_start) {
            assert!(curves.same_curve(event.start.y, event.end.y));
            if let Some(piece) =
                pruned.trimmed_sub_trajectory(event.start.x, event.end.x, event.end)
            {
                assert!(piece.from <= piece.to);
                assert!(piece.from >= 0.0);
                assert!(piece.to <= (piece.curve.num_points() - 1) as f64);
            }
        }
    }
}
