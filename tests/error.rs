//! Tests for error module

use tracebundle::error::{BundleError, OptionExt};
use tracebundle::{Curve, MatchConfig};

#[test]
fn test_error_display() {
    let err = BundleError::InsufficientPoints {
        curve_id: "test-1".to_string(),
        point_count: 1,
        minimum_required: 2,
    };
    assert!(err.to_string().contains("test-1"));
    assert!(err.to_string().contains("1 points"));

    let err = BundleError::RangeOutsideCurve { from: 3, to: 9 };
    assert!(err.to_string().contains("[3, 9]"));
}

#[test]
fn test_option_ext() {
    let none: Option<i32> = None;
    let result = none.ok_or_insufficient_points("test", 0, 2);
    assert!(matches!(
        result,
        Err(BundleError::InsufficientPoints { .. })
    ));

    let some = Some(5).ok_or_range(0, 1);
    assert_eq!(some, Ok(5));
    assert_eq!(
        None::<i32>.ok_or_range(2, 4),
        Err(BundleError::RangeOutsideCurve { from: 2, to: 4 })
    );
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.gpx");
    let err: BundleError = io.into();
    assert!(matches!(err, BundleError::Io(ref msg) if msg.contains("missing.gpx")));
}

#[test]
fn test_curve_errors() {
    assert!(matches!(
        Curve::new("empty", Vec::new()),
        Err(BundleError::InsufficientPoints { point_count: 0, .. })
    ));
    assert_eq!(
        Curve::from_xy("nan", &[(0.0, 0.0), (f64::NAN, 1.0)]).unwrap_err(),
        BundleError::NonFiniteCoordinate {
            curve_id: "nan".to_string(),
            index: 1
        }
    );
}

#[test]
fn test_invalid_epsilon() {
    for epsilon in [-3.0, f64::INFINITY, f64::NAN] {
        let config = MatchConfig::with_epsilon(epsilon);
        assert!(matches!(
            config.validate(),
            Err(BundleError::InvalidEpsilon { .. })
        ));
    }
    assert!(MatchConfig::default().validate().is_ok());
    assert!(MatchConfig::with_epsilon(0.0).validate().is_ok());
}
