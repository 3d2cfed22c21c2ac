use super::*;

#[test]
fn defaults_are_identity() {
    let cfg = TransformConfig::default();
    assert_eq!(cfg.width_scale, 1.0);
    assert_eq!(cfg.height_scale, 1.0);
    assert_eq!((cfg.tile_x, cfg.tile_y), (1, 1));
    assert!(cfg.validate().is_ok());
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let cfg: TransformConfig = serde_json::from_str(r#"{ "tile_x": 3, "flip_vertical": true }"#)
        .expect("parse");
    assert_eq!(cfg.tile_x, 3);
    assert!(cfg.flip_vertical);
    assert_eq!(cfg.width_scale, 1.0);
}

#[test]
fn validate_rejects_zero_tiles() {
    let cfg = TransformConfig {
        tile_y: 0,
        ..TransformConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_non_finite_values() {
    let cfg = TransformConfig {
        rotate: f64::NAN,
        ..TransformConfig::default()
    };
    let err = cfg.validate().expect_err("nan rotate");
    assert!(err.to_string().contains("rotate"));
}
