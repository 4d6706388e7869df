//! Model and projection matrices built from configuration

use xform_math::{Mat4f, Quatf, Vec3f, Vec4f};

use crate::config::{AppConfig, ConfigError, ProjectionConfig, ProjectionKind, TransformStep};

/// A model transform followed by a projection
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pipeline {
    /// Model-to-eye transform
    pub model: Mat4f,
    /// Eye-to-clip transform
    pub projection: Mat4f,
}

impl Pipeline {
    /// Build both matrices, validating the config first
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut model = Mat4f::identity();
        for step in &config.transform.steps {
            apply_step(&mut model, step);
        }
        log::debug!("model matrix from {} steps", config.transform.steps.len());

        Ok(Self {
            model,
            projection: build_projection(&config.projection),
        })
    }

    /// Projection applied after the model transform
    pub fn combined(&self) -> Mat4f {
        self.projection * self.model
    }

    /// Clip-space coordinates of a model-space point
    pub fn clip(&self, point: Vec3f) -> Vec4f {
        self.combined() * point.extend(1.0)
    }

    /// Normalized device coordinates of a model-space point
    ///
    /// Returns `None` when the point lands on the eye plane (`w == 0`).
    pub fn project(&self, point: Vec3f) -> Option<Vec3f> {
        let clip = self.clip(point);
        if clip.w == 0.0 {
            log::warn!("point {:?} has w = 0 after projection", point);
            return None;
        }
        Some(clip.xyz() / clip.w)
    }
}

fn apply_step(model: &mut Mat4f, step: &TransformStep) {
    match *step {
        TransformStep::Scale { x, y, z } => {
            model.scale_xyz(x, y, z);
        }
        TransformStep::Translate { x, y, z } => {
            model.translate_xyz(x, y, z);
        }
        TransformStep::Rotate { axis, degrees } => {
            let q = Quatf::from_axis_angle(axis, degrees.to_radians());
            model.rotate(&q);
        }
        TransformStep::RotateZ { degrees } => {
            model.rotate_z(degrees.to_radians());
        }
    }
}

fn build_projection(p: &ProjectionConfig) -> Mat4f {
    let mut m = Mat4f::identity();
    match p.kind {
        ProjectionKind::Frustum => {
            m.set_frustum(p.left, p.right, p.bottom, p.top, p.near, p.far);
        }
        ProjectionKind::Perspective => {
            m.set_perspective(p.fov_y.to_radians(), p.aspect, p.near, p.far);
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use xform_math::Vec3;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3f, b: Vec3f) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn frustum_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.projection.kind = ProjectionKind::Frustum;
        config.projection.near = 1.0;
        config.projection.far = 10.0;
        config
    }

    #[test]
    fn test_empty_steps_give_identity_model() {
        let pipeline = Pipeline::from_config(&AppConfig::default()).unwrap();
        assert_eq!(pipeline.model, Mat4f::identity());
    }

    #[test]
    fn test_steps_apply_last_first() {
        let mut config = frustum_config();
        config.transform.steps = vec![
            TransformStep::Translate { x: 1.0, y: 0.0, z: 0.0 },
            TransformStep::Scale { x: 2.0, y: 2.0, z: 2.0 },
        ];
        let pipeline = Pipeline::from_config(&config).unwrap();

        // Scale first, then translate
        let p = pipeline.model * Vec3::new(1.0, 1.0, 1.0);
        assert!(vec_approx_eq(p, Vec3::new(3.0, 2.0, 2.0)), "p = {:?}", p);
    }

    #[test]
    fn test_rotate_step_matches_rotate_z() {
        let mut a = frustum_config();
        a.transform.steps = vec![TransformStep::Rotate {
            axis: Vec3::new(0.0, 0.0, 5.0),
            degrees: 90.0,
        }];
        let mut b = frustum_config();
        b.transform.steps = vec![TransformStep::RotateZ { degrees: 90.0 }];

        let a = Pipeline::from_config(&a).unwrap();
        let b = Pipeline::from_config(&b).unwrap();

        let p = a.model * Vec3::new(1.0, 0.0, 0.0);
        let q = b.model * Vec3::new(1.0, 0.0, 0.0);
        assert!(vec_approx_eq(p, Vec3::new(0.0, 1.0, 0.0)), "p = {:?}", p);
        assert!(vec_approx_eq(p, q));
    }

    #[test]
    fn test_project_near_and_far_planes() {
        let pipeline = Pipeline::from_config(&frustum_config()).unwrap();

        let near = pipeline.project(Vec3::new(0.0, 0.0, -1.0)).unwrap();
        let far = pipeline.project(Vec3::new(0.0, 0.0, -10.0)).unwrap();
        assert!(approx_eq(near.z, -1.0), "near = {:?}", near);
        assert!(approx_eq(far.z, 1.0), "far = {:?}", far);
    }

    #[test]
    fn test_project_frustum_corner() {
        let pipeline = Pipeline::from_config(&frustum_config()).unwrap();

        // Top-right corner of the near plane
        let corner = pipeline.project(Vec3::new(1.0, 1.0, -1.0)).unwrap();
        assert!(approx_eq(corner.x, 1.0));
        assert!(approx_eq(corner.y, 1.0));
    }

    #[test]
    fn test_project_eye_plane_is_none() {
        let pipeline = Pipeline::from_config(&frustum_config()).unwrap();
        assert!(pipeline.project(Vec3::new(1.0, 1.0, 0.0)).is_none());
    }

    #[test]
    fn test_combined_applies_model_first() {
        let mut config = frustum_config();
        config.transform.steps = vec![TransformStep::Translate { x: 0.0, y: 0.0, z: -1.0 }];
        let pipeline = Pipeline::from_config(&config).unwrap();

        // Origin is pushed onto the near plane
        let origin = pipeline.project(Vec3::zero()).unwrap();
        assert!(approx_eq(origin.z, -1.0), "origin = {:?}", origin);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = frustum_config();
        config.projection.far = config.projection.near;
        assert!(Pipeline::from_config(&config).is_err());
    }

    #[test]
    fn test_perspective_through_eye_rejected() {
        let mut config = AppConfig::default();
        config.projection.near = 0.0;
        assert!(Pipeline::from_config(&config).is_err());
    }
}
