//! Transform Mathematics Library
//!
//! Fixed-size vectors, square matrices and quaternions, generic over the
//! scalar element type, for 2D/3D transform composition and projection.
//!
//! ## Core Types
//!
//! - [`Vec2`], [`Vec3`], [`Vec4`] - small vectors with componentwise arithmetic
//! - [`Quaternion`] - 3D rotation as (x, y, z, w)
//! - [`Mat3`] - row-major 3x3 matrix, 2D affine transforms
//! - [`Mat4`] - row-major 4x4 matrix, 3D transforms and perspective projection
//!
//! Matrices multiply column vectors from the right and every transform
//! builder right-multiplies, so
//!
//! ```
//! use xform_math::{Mat4, Vec3};
//!
//! let mut m = Mat4::<f32>::identity();
//! m.translate_xyz(1.0, 0.0, 0.0).scale_uniform(2.0);
//! // scaled first, then translated
//! assert_eq!(m * Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 2.0, 2.0));
//! ```

mod scalar;
mod vec2;
mod vec3;
mod vec4;
mod quaternion;
pub mod mat3;
pub mod mat4;

pub use scalar::Scalar;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
pub use quaternion::Quaternion;
pub use mat3::Mat3;
pub use mat4::Mat4;

pub type Vec2f = Vec2<f32>;
pub type Vec3f = Vec3<f32>;
pub type Vec4f = Vec4<f32>;
pub type Quatf = Quaternion<f32>;
pub type Mat3f = Mat3<f32>;
pub type Mat3d = Mat3<f64>;
pub type Mat4f = Mat4<f32>;
pub type Mat4d = Mat4<f64>;
