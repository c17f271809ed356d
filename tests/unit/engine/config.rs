use super::*;

#[test]
fn defaults() {
    let c = EngineConfig::default();
    assert_eq!(c.device_pixel_ratio, 1.0);
    assert_eq!(c.min_tile_size, 2);
    assert!(!c.cpu_only);
    assert!(c.validate().is_ok());
}

#[test]
fn partial_json_fills_defaults() {
    let c: EngineConfig = serde_json::from_str(r#"{"cpu_only":true}"#).unwrap();
    assert!(c.cpu_only);
    assert_eq!(c.device_pixel_ratio, 1.0);
    assert_eq!(c.id, None);
}

#[test]
fn rejects_bad_pixel_ratio_and_blank_id() {
    assert!(
        EngineConfig::default()
            .with_device_pixel_ratio(0.0)
            .validate()
            .is_err()
    );
    assert!(
        EngineConfig::default()
            .with_device_pixel_ratio(f64::INFINITY)
            .validate()
            .is_err()
    );
    assert!(EngineConfig::default().with_id("  ").validate().is_err());
}

#[test]
fn resolve_id_prefers_configured() {
    assert_eq!(EngineConfig::default().with_id("main").resolve_id(), "main");
    let a = EngineConfig::default().resolve_id();
    let b = EngineConfig::default().resolve_id();
    assert_ne!(a, b);
}
