//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`XFORM_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use xform_math::Vec3;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Projection configuration
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Model transform configuration
    #[serde(default)]
    pub transform: TransformConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`XFORM_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // XFORM_PROJECTION__NEAR=0.5 -> projection.near = 0.5
        figment = figment.merge(Env::prefixed("XFORM_").split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would produce a degenerate or undefined transform
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.projection.validate()?;
        for (i, step) in self.transform.steps.iter().enumerate() {
            if let TransformStep::Rotate { axis, .. } = step {
                if axis.length_squared() == 0.0 {
                    return Err(ConfigError::invalid(format!(
                        "transform step {}: rotation axis must be non-zero",
                        i
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Kind of projection matrix to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    /// Off-axis frustum from the six clipping planes
    Frustum,
    /// Symmetric frustum from field of view and aspect ratio
    Perspective,
}

/// Projection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Which of the plane sets below is used
    pub kind: ProjectionKind,
    /// Left clipping plane (frustum)
    pub left: f32,
    /// Right clipping plane (frustum)
    pub right: f32,
    /// Bottom clipping plane (frustum)
    pub bottom: f32,
    /// Top clipping plane (frustum)
    pub top: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Vertical field of view in degrees (perspective)
    pub fov_y: f32,
    /// Width over height (perspective)
    pub aspect: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            kind: ProjectionKind::Perspective,
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
            near: 0.1,
            far: 100.0,
            fov_y: 45.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl ProjectionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let planes = [self.left, self.right, self.bottom, self.top, self.near, self.far];
        if planes.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::invalid("projection: clipping planes must be finite"));
        }
        if self.near == self.far {
            return Err(ConfigError::invalid("projection: near and far planes coincide"));
        }
        match self.kind {
            ProjectionKind::Frustum => {
                if self.left == self.right || self.bottom == self.top {
                    return Err(ConfigError::invalid(
                        "projection: frustum needs left != right and bottom != top",
                    ));
                }
            }
            ProjectionKind::Perspective => {
                if self.near <= 0.0 || self.far <= 0.0 {
                    return Err(ConfigError::invalid(
                        "projection: perspective needs positive near and far planes",
                    ));
                }
                if !self.aspect.is_finite() || self.aspect <= 0.0 {
                    return Err(ConfigError::invalid("projection: aspect ratio must be positive"));
                }
                if !(self.fov_y > 0.0 && self.fov_y < 180.0) {
                    return Err(ConfigError::invalid(
                        "projection: fov_y must be between 0 and 180 degrees",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// One operation of the model transform chain
///
/// Steps are right-multiplied in order onto an identity matrix, so the last
/// step is the first one applied to a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformStep {
    /// Scale along each axis
    Scale { x: f32, y: f32, z: f32 },
    /// Translate along each axis
    Translate { x: f32, y: f32, z: f32 },
    /// Rotate about an arbitrary axis
    Rotate { axis: Vec3<f32>, degrees: f32 },
    /// Rotate about the Z axis
    RotateZ { degrees: f32 },
}

/// Model transform configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Transform chain, outermost first
    pub steps: Vec<TransformStep>,
    /// Model-space points to push through the pipeline
    pub points: Vec<Vec3<f32>>,
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    /// Error for a setting that parsed but cannot be used
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.projection.kind, ProjectionKind::Perspective);
        assert_eq!(config.debug.log_level, "info");
        assert!(config.transform.steps.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("fov_y"));
        assert!(toml.contains("log_level"));
    }

    #[test]
    fn test_steps_deserialize_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [[transform.steps]]
            op = "translate"
            x = 1.0
            y = 2.0
            z = 3.0

            [[transform.steps]]
            op = "rotate"
            axis = { x = 0.0, y = 1.0, z = 0.0 }
            degrees = 90.0

            [[transform.steps]]
            op = "rotate_z"
            degrees = 45.0
            "#,
        )
        .unwrap();

        assert_eq!(config.transform.steps.len(), 3);
        assert_eq!(
            config.transform.steps[0],
            TransformStep::Translate { x: 1.0, y: 2.0, z: 3.0 }
        );
        assert_eq!(
            config.transform.steps[1],
            TransformStep::Rotate { axis: Vec3::new(0.0, 1.0, 0.0), degrees: 90.0 }
        );
        assert_eq!(config.transform.steps[2], TransformStep::RotateZ { degrees: 45.0 });
    }

    #[test]
    fn test_degenerate_frustum_rejected() {
        let mut config = AppConfig::default();
        config.projection.kind = ProjectionKind::Frustum;
        config.projection.left = 1.0;
        config.projection.right = 1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("left != right"));
    }

    #[test]
    fn test_zero_axis_rejected() {
        let mut config = AppConfig::default();
        config.transform.steps.push(TransformStep::Rotate {
            axis: Vec3::zero(),
            degrees: 30.0,
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("step 0"));
    }

    #[test]
    fn test_bad_aspect_rejected() {
        let mut config = AppConfig::default();
        config.projection.aspect = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_perspective_zero_near_rejected() {
        let mut config = AppConfig::default();
        config.projection.near = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("positive near"));

        config.projection.near = 0.1;
        config.projection.far = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_projection_rejected() {
        let mut config = AppConfig::default();
        config.projection.aspect = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.projection.fov_y = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.projection.far = f32::INFINITY;
        assert!(config.validate().is_err());
    }
}
