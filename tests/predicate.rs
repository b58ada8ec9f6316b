//! Tests for predicate module

use std::sync::Arc;
use tracebundle::{
    ConcatenatedCurve, Curve, CurvePair, DiscretePredicate, DoubledGrid, FreeSpacePredicate,
    GraphCoord, HalfEdgePredicate, Tolerance, VertexMonotonePredicate,
};

fn zigzag(id: &str, n: usize, phase: f64) -> Curve {
    let xy: Vec<(f64, f64)> = (0..n)
        .map(|i| (i as f64 * 1.5, ((i as f64 + phase) * 0.9).sin() * 2.0))
        .collect();
    Curve::from_xy(id, &xy).unwrap()
}

fn symmetric(curves: Vec<Curve>) -> CurvePair {
    CurvePair::symmetric(Arc::new(ConcatenatedCurve::new(curves).unwrap()))
}

#[test]
fn test_discrete_threshold_inclusive() {
    let a = Curve::from_xy("a", &[(0.0, 0.0), (1.0, 0.0)]).unwrap();
    let b = Curve::from_xy("b", &[(0.0, 2.0), (1.0, 2.5)]).unwrap();
    let pair = CurvePair::new(
        Arc::new(ConcatenatedCurve::from(a)),
        Arc::new(ConcatenatedCurve::from(b)),
    );
    let pred = DiscretePredicate::new(pair.clone(), 2.0).unwrap();
    assert!(pred.is_free(GraphCoord::new(0, 0)));
    assert!(!pred.is_free(GraphCoord::new(1, 1)));
    assert!(!pred.is_free(GraphCoord::new(2, 0)));
    assert!(!pred.is_free(GraphCoord::new(0, -1)));

    // slightly outside, rescued only by a generous tolerance
    let strict = DiscretePredicate::new(pair.clone(), 1.9999).unwrap();
    assert!(!strict.is_free(GraphCoord::new(0, 0)));
    let loose = DiscretePredicate::new(pair, 1.9999)
        .unwrap()
        .with_tolerance(Tolerance::new(1e-3));
    assert!(loose.is_free(GraphCoord::new(0, 0)));
}

#[test]
fn test_half_edge_symmetry() {
    let pair = symmetric(vec![zigzag("a", 12, 0.0), zigzag("b", 9, 0.7)]);
    let n = pair.first.num_points() as i32;
    let pred = HalfEdgePredicate::new(pair, 1.2).unwrap();

    for i in 0..n {
        for j in 0..n {
            assert_eq!(
                pred.is_free(GraphCoord::new(i, j)),
                pred.is_free(GraphCoord::new(j, i)),
                "asymmetric at ({}, {})",
                i,
                j
            );
        }
    }
}

#[test]
fn test_half_edge_reaches_farther_than_discrete() {
    // points of b sit between the points of a
    let a = Curve::from_xy("a", &[(0.0, 0.0), (4.0, 0.0), (8.0, 0.0)]).unwrap();
    let b = Curve::from_xy("b", &[(2.0, 0.5), (6.0, 0.5)]).unwrap();
    let pair = CurvePair::new(
        Arc::new(ConcatenatedCurve::from(a)),
        Arc::new(ConcatenatedCurve::from(b)),
    );
    let discrete = DiscretePredicate::new(pair.clone(), 1.0).unwrap();
    let half_edge = HalfEdgePredicate::new(pair, 1.0).unwrap();

    assert!(!discrete.is_free(GraphCoord::new(0, 0)));
    // half edges around a[0] run from (0, 0) to (2, 0)
    assert!(half_edge.is_free(GraphCoord::new(0, 0)));
    assert!(half_edge.is_free(GraphCoord::new(1, 0)));
    assert!(!half_edge.is_free(GraphCoord::new(2, 0)));
}

#[test]
fn test_vertex_monotone_border_exclusion() {
    // the seam between a and b passes right next to everything
    let a = Curve::from_xy("a", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).unwrap();
    let b = Curve::from_xy("b", &[(2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]).unwrap();
    let pair = symmetric(vec![a, b]);
    let pred = VertexMonotonePredicate::new(pair, 10.0).unwrap();

    // edge 2 of the concatenation joins a and b
    for i in 0..6 {
        assert!(!pred.is_free(DoubledGrid::vertical(i, 2)));
        assert!(!pred.is_free(DoubledGrid::horizontal(2, i)));
        assert!(pred.is_free(DoubledGrid::vertical(i, 1)));
        assert!(pred.is_free(DoubledGrid::horizontal(3, i)));
    }
    // last edge index 4 exists, 5 does not
    assert!(pred.is_free(DoubledGrid::vertical(0, 4)));
    assert!(!pred.is_free(DoubledGrid::vertical(0, 5)));
}

#[test]
fn test_predicate_reports_epsilon() {
    let pair = symmetric(vec![zigzag("a", 4, 0.0)]);
    assert_eq!(VertexMonotonePredicate::new(pair.clone(), 3.5).unwrap().epsilon(), 3.5);
    assert_eq!(HalfEdgePredicate::new(pair, 0.0).unwrap().epsilon(), 0.0);
}
