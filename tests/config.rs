//! Tests for match configuration

use tracebundle::{FreeSpacePolicy, MatchConfig};

#[test]
fn test_default_config() {
    let config = MatchConfig::default();
    assert_eq!(config.epsilon, 25.0);
    assert_eq!(config.tolerance, 1e-6);
    assert_eq!(config.policy, FreeSpacePolicy::VertexMonotone);
    assert_eq!(config.index_exponent, 0.77);
    assert!(config.use_index);
}

#[test]
fn test_config_json_roundtrip() {
    let config = MatchConfig {
        epsilon: 12.5,
        policy: FreeSpacePolicy::HalfEdge,
        use_index: false,
        ..MatchConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"half_edge\""));
    let parsed: MatchConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_json_uses_defaults() {
    let parsed: MatchConfig =
        serde_json::from_str(r#"{"epsilon": 40.0, "policy": "discrete"}"#).unwrap();
    assert_eq!(parsed.epsilon, 40.0);
    assert_eq!(parsed.policy, FreeSpacePolicy::Discrete);
    assert_eq!(parsed.index_exponent, MatchConfig::default().index_exponent);
    assert!(parsed.use_index);

    assert!(serde_json::from_str::<MatchConfig>(r#"{"policy": "continuous"}"#).is_err());
}

#[test]
fn test_policy_parse_and_display() {
    for policy in [
        FreeSpacePolicy::Discrete,
        FreeSpacePolicy::VertexMonotone,
        FreeSpacePolicy::HalfEdge,
    ] {
        assert_eq!(policy.to_string().parse::<FreeSpacePolicy>(), Ok(policy));
    }
    assert_eq!(
        "Semi-Weak".parse::<FreeSpacePolicy>(),
        Ok(FreeSpacePolicy::VertexMonotone)
    );
    assert_eq!("half-edge".parse(), Ok(FreeSpacePolicy::HalfEdge));
    assert!("frechet".parse::<FreeSpacePolicy>().is_err());
    assert_eq!(FreeSpacePolicy::default().as_str(), "vertex_monotone");
}
