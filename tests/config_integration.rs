//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;

use serial_test::serial;
use tempfile::tempdir;
use xform::config::{AppConfig, ProjectionKind, TransformStep};
use xform::Pipeline;
use xform_math::Vec3;

#[test]
#[serial]
fn test_default_file_loads() {
    let config = AppConfig::load().unwrap();
    assert_eq!(config.projection.kind, ProjectionKind::Perspective);
    assert_eq!(config.transform.steps.len(), 3);
    assert_eq!(config.transform.points.len(), 3);

    let pipeline = Pipeline::from_config(&config).unwrap();
    let origin = pipeline.project(Vec3::zero()).unwrap();
    assert!(origin.z > -1.0 && origin.z < 1.0, "origin = {:?}", origin);
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("XFORM_PROJECTION__NEAR", "0.5");
    let config = AppConfig::load();
    std::env::remove_var("XFORM_PROJECTION__NEAR");

    assert_eq!(config.unwrap().projection.near, 0.5);
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("default.toml"),
        "[projection]\nkind = \"perspective\"\nnear = 1.0\nfar = 10.0\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("user.toml"),
        "[projection]\nkind = \"frustum\"\n\n\
         [[transform.steps]]\nop = \"rotate_z\"\ndegrees = 90.0\n",
    )
    .unwrap();

    let config = AppConfig::load_from(dir.path()).unwrap();

    assert_eq!(config.projection.kind, ProjectionKind::Frustum);
    // Untouched keys keep the default file's values
    assert_eq!(config.projection.near, 1.0);
    assert_eq!(config.projection.far, 10.0);
    assert_eq!(config.transform.steps, vec![TransformStep::RotateZ { degrees: 90.0 }]);
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = AppConfig::load_from(dir.path().join("does-not-exist")).unwrap();

    assert_eq!(config.debug.log_level, "info");
    assert!(config.transform.steps.is_empty());
}

#[test]
#[serial]
fn test_invalid_file_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("default.toml"),
        "[[transform.steps]]\nop = \"rotate\"\n\
         axis = { x = 0.0, y = 0.0, z = 0.0 }\ndegrees = 10.0\n",
    )
    .unwrap();

    let err = AppConfig::load_from(dir.path()).unwrap_err();
    assert!(err.to_string().contains("rotation axis"), "err = {}", err);
}

#[test]
#[serial]
fn test_unknown_step_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("default.toml"), "[[transform.steps]]\nop = \"shear\"\n")
        .unwrap();

    assert!(AppConfig::load_from(dir.path()).is_err());
}

#[test]
#[serial]
fn test_perspective_near_zero_file_rejected() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("default.toml"),
        "[projection]\nkind = \"perspective\"\nnear = 0.0\nfar = 10.0\n",
    )
    .unwrap();

    let err = AppConfig::load_from(dir.path()).unwrap_err();
    assert!(err.to_string().contains("positive near"), "err = {}", err);
}
