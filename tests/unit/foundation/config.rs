use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = EngineConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.surface_size, 600);
    assert_eq!(cfg.fallback_primary(), DEFAULT_PRIMARY);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: EngineConfig = serde_json::from_str(
        r#"{ "app_origin": "https://dojo.example.com", "geometry": { "dot_ratio": 0.4 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.app_origin, "https://dojo.example.com");
    assert_eq!(cfg.surface_size, 600);
    assert_eq!(cfg.geometry.dot_ratio, 0.4);
    assert_eq!(cfg.geometry.padding_ratio, QrGeometry::default().padding_ratio);
}

#[test]
fn from_path_reads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    std::fs::write(&good, r#"{ "surface_size": 800 }"#).unwrap();
    assert_eq!(EngineConfig::from_path(&good).unwrap().surface_size, 800);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{ "surface_size": 16 }"#).unwrap();
    assert!(matches!(
        EngineConfig::from_path(&bad),
        Err(CheckinError::Validation(_))
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{").unwrap();
    assert!(matches!(
        EngineConfig::from_path(&broken),
        Err(CheckinError::Serde(_))
    ));

    assert!(EngineConfig::from_path(dir.path().join("missing.json")).is_err());
}

#[test]
fn overrides_apply_and_validate() {
    let cfg = EngineConfig::default()
        .with_overrides(|k| match k {
            ENV_APP_ORIGIN => Some("https://scan.example.org/".to_string()),
            ENV_SURFACE_SIZE => Some(" 1024 ".to_string()),
            _ => None,
        })
        .unwrap();
    assert_eq!(cfg.app_origin, "https://scan.example.org/");
    assert_eq!(cfg.surface_size, 1024);

    let err = EngineConfig::default()
        .with_overrides(|k| (k == ENV_SURFACE_SIZE).then(|| "big".to_string()))
        .unwrap_err();
    assert!(err.to_string().contains(ENV_SURFACE_SIZE));

    assert!(
        EngineConfig::default()
            .with_overrides(|k| (k == ENV_APP_ORIGIN).then(|| "ftp://x".to_string()))
            .is_err()
    );
}

#[test]
fn invalid_fallback_primary_degrades() {
    let cfg = EngineConfig {
        fallback_primary: "nope".to_string(),
        ..EngineConfig::default()
    };
    assert_eq!(cfg.fallback_primary(), DEFAULT_PRIMARY);
}

#[test]
fn surface_size_bounds_are_inclusive() {
    for (size, ok) in [
        (MIN_SURFACE_SIZE - 1, false),
        (MIN_SURFACE_SIZE, true),
        (MAX_SURFACE_SIZE, true),
        (MAX_SURFACE_SIZE + 1, false),
    ] {
        let cfg = EngineConfig {
            surface_size: size,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.validate().is_ok(), ok, "size {size}");
    }
}
