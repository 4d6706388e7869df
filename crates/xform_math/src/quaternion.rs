//! Quaternion for representing 3D rotations
//!
//! Components are stored as (x, y, z, w) with `w` the scalar part. For a
//! rotation by `angle` about a unit axis the quaternion is
//! `(axis * sin(angle / 2), cos(angle / 2))`.
//!
//! Nothing here normalizes implicitly except [`Quaternion::from_axis_angle`]
//! and [`Quaternion::from_rotation_vector`], which need a direction anyway.
//! Conversion to and from rotation matrices lives on [`Mat4`](crate::Mat4).

use std::ops::{Add, Index, IndexMut, Mul, MulAssign, Neg, Sub};

use bytemuck::{Pod, Zeroable};
use num_traits::{AsPrimitive, Float};

use crate::scalar::two;
use crate::{Scalar, Vec3};

/// Rotation quaternion (x, y, z, w)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quaternion<T> {
    /// First vector component
    pub x: T,
    /// Second vector component
    pub y: T,
    /// Third vector component
    pub z: T,
    /// Scalar component
    pub w: T,
}

// SAFETY: `repr(C)` with four `T` fields, no padding.
unsafe impl<T: Zeroable> Zeroable for Quaternion<T> {}
unsafe impl<T: Pod> Pod for Quaternion<T> {}

impl<T: Scalar> Default for Quaternion<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T> Quaternion<T> {
    /// Create a quaternion from its four components
    #[inline]
    pub const fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w }
    }
}

impl<T: Scalar> Quaternion<T> {
    /// Identity quaternion (no rotation)
    #[inline]
    pub fn identity() -> Self {
        Self::new(T::zero(), T::zero(), T::zero(), T::one())
    }

    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::identity();
        self
    }

    /// The vector part (x, y, z)
    #[inline]
    pub fn vector(&self) -> Vec3<T> {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Squared norm
    #[inline]
    pub fn norm_squared(&self) -> T {
        self.dot(self)
    }

    /// Convert to a different element type with `as` semantics
    pub fn to<U>(&self) -> Quaternion<U>
    where
        T: AsPrimitive<U>,
        U: Scalar,
    {
        Quaternion::new(self.x.as_(), self.y.as_(), self.z.as_(), self.w.as_())
    }
}

impl<T: Scalar + Neg<Output = T>> Quaternion<T> {
    /// Conjugate, the inverse rotation for unit quaternions
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }
}

impl<T: Scalar + Float> Quaternion<T> {
    /// Rotation by `angle` radians about the axis `axis / |axis|`.
    ///
    /// The axis is normalized first, so the result is a unit quaternion for
    /// any non-zero axis.
    pub fn from_axis_angle(axis: Vec3<T>, angle: T) -> Self {
        Self::from_prepared_axis(axis.normalized(), angle)
    }

    /// Rotation whose axis is the direction of `v` and whose angle in
    /// radians is `|v|`. The zero vector gives the identity.
    pub fn from_rotation_vector(v: Vec3<T>) -> Self {
        let angle = v.length();
        if angle == T::zero() {
            log::trace!("zero rotation vector, using identity quaternion");
            return Self::identity();
        }
        Self::from_prepared_axis(v / angle, angle)
    }

    /// Overwrite with a rotation by `angle` radians about (x, y, z).
    ///
    /// The axis components are used as given: pass a unit axis to get a
    /// unit quaternion.
    pub fn set_rotation(&mut self, x: T, y: T, z: T, angle: T) -> &mut Self {
        *self = Self::from_prepared_axis(Vec3::new(x, y, z), angle);
        self
    }

    fn from_prepared_axis(axis: Vec3<T>, angle: T) -> Self {
        let (sin_h, cos_h) = (angle / two()).sin_cos();
        Self::new(axis.x * sin_h, axis.y * sin_h, axis.z * sin_h, cos_h)
    }

    #[inline]
    pub fn norm(&self) -> T {
        self.norm_squared().sqrt()
    }

    /// Normalize to unit norm, a zero quaternion becomes the identity
    pub fn normalized(&self) -> Self {
        let n = self.norm();
        if n > T::zero() {
            *self * (T::one() / n)
        } else {
            Self::identity()
        }
    }

    /// Rotate a vector: `q * v * q⁻¹` for a unit quaternion
    pub fn rotate(&self, v: Vec3<T>) -> Vec3<T> {
        let u = self.vector();
        let t = u.cross(v) * two();
        v + t * self.w + u.cross(t)
    }

    /// Spherical linear interpolation along the shorter arc
    pub fn slerp(&self, other: &Self, t: T) -> Self {
        let mut cos_theta = self.dot(other);
        let mut end = *other;
        if cos_theta < T::zero() {
            cos_theta = -cos_theta;
            end = -end;
        }

        // Nearly parallel: fall back to normalized lerp
        if cos_theta > T::one() - T::epsilon().sqrt() {
            return (*self * (T::one() - t) + end * t).normalized();
        }

        let theta = cos_theta.acos();
        let sin_theta = theta.sin();
        let a = ((T::one() - t) * theta).sin() / sin_theta;
        let b = (t * theta).sin() / sin_theta;
        *self * a + end * b
    }
}

impl<T> Index<usize> for Quaternion<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Quaternion index out of range: {}", index),
        }
    }
}

impl<T> IndexMut<usize> for Quaternion<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Quaternion index out of range: {}", index),
        }
    }
}

/// Hamilton product: `a * b` applies `b` first, then `a`
impl<T: Scalar> Mul for Quaternion<T> {
    type Output = Self;
    fn mul(self, b: Self) -> Self {
        let a = self;
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }
}

impl<T: Scalar> MulAssign for Quaternion<T> {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl<T: Scalar> Mul<T> for Quaternion<T> {
    type Output = Self;
    #[inline]
    fn mul(self, s: T) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl<T: Scalar> Add for Quaternion<T> {
    type Output = Self;
    #[inline]
    fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y, self.z + o.z, self.w + o.w)
    }
}

impl<T: Scalar> Sub for Quaternion<T> {
    type Output = Self;
    #[inline]
    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y, self.z - o.z, self.w - o.w)
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for Quaternion<T> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3<f32>, b: Vec3<f32>) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn quat_approx_eq(a: Quaternion<f32>, b: Quaternion<f32>) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z) && approx_eq(a.w, b.w)
    }

    #[test]
    fn test_identity_rotation() {
        let q = Quaternion::<f32>::identity();
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(q.rotate(v), v));
        assert_eq!(Quaternion::<f32>::default(), q);
    }

    #[test]
    fn test_set_rotation_keeps_axis_scale() {
        let mut q = Quaternion::<f32>::identity();
        q.set_rotation(1.0, 2.0, 3.0, PI / 6.0);
        let s = (PI / 12.0).sin();
        assert!(approx_eq(q.x, s));
        assert!(approx_eq(q.y, 2.0 * s));
        assert!(approx_eq(q.z, 3.0 * s));
        assert!(approx_eq(q.w, (PI / 12.0).cos()));
    }

    #[test]
    fn test_from_axis_angle_normalizes_axis() {
        let q = Quaternion::from_axis_angle(Vec3::new(0.0f32, 0.0, 5.0), FRAC_PI_2);
        assert!(approx_eq(q.norm(), 1.0));
        assert!(approx_eq(q.z, (PI / 4.0).sin()));
    }

    #[test]
    fn test_rotation_vector() {
        let q = Quaternion::from_rotation_vector(Vec3::new(0.0f32, 0.0, FRAC_PI_2));
        // X rotated 90 degrees about Z becomes Y
        let rotated = q.rotate(Vec3::unit_x());
        assert!(vec_approx_eq(rotated, Vec3::unit_y()), "Expected Y, got {:?}", rotated);
    }

    #[test]
    fn test_zero_rotation_vector_is_identity() {
        let q = Quaternion::from_rotation_vector(Vec3::<f64>::zero());
        assert_eq!(q, Quaternion::identity());
    }

    #[test]
    fn test_hamilton_product_composes() {
        let a = Quaternion::from_axis_angle(Vec3::unit_z(), FRAC_PI_2);
        let b = Quaternion::from_axis_angle(Vec3::unit_x(), FRAC_PI_2);
        let v = Vec3::new(0.0f32, 1.0, 0.0);
        // a * b applies b first
        let composed = (a * b).rotate(v);
        let sequential = a.rotate(b.rotate(v));
        assert!(vec_approx_eq(composed, sequential), "{:?} vs {:?}", composed, sequential);
    }

    #[test]
    fn test_conjugate_inverts() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0f32, 1.0, 0.0), 1.1);
        let p = q * q.conjugate();
        assert!(quat_approx_eq(p, Quaternion::identity()), "got {:?}", p);
    }

    #[test]
    fn test_integer_product() {
        let i = Quaternion::new(1, 0, 0, 0);
        let j = Quaternion::new(0, 1, 0, 0);
        assert_eq!(i * j, Quaternion::new(0, 0, 1, 0));
        assert_eq!(j * i, Quaternion::new(0, 0, -1, 0));
        assert_eq!(i * i, Quaternion::new(0, 0, 0, -1));
    }

    #[test]
    fn test_normalized() {
        let q = Quaternion::new(2.0f32, 0.0, 0.0, 2.0).normalized();
        assert!(approx_eq(q.norm(), 1.0));
        assert_eq!(Quaternion::new(0.0f32, 0.0, 0.0, 0.0).normalized(), Quaternion::identity());
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let a = Quaternion::<f32>::identity();
        let b = Quaternion::from_axis_angle(Vec3::unit_z(), FRAC_PI_2);
        assert!(quat_approx_eq(a.slerp(&b, 0.0), a));
        assert!(quat_approx_eq(a.slerp(&b, 1.0), b));

        let mid = a.slerp(&b, 0.5);
        let expected = Quaternion::from_axis_angle(Vec3::unit_z(), FRAC_PI_2 / 2.0);
        assert!(quat_approx_eq(mid, expected), "got {:?}", mid);
    }

    #[test]
    fn test_to_and_index() {
        let q = Quaternion::new(1.5f32, -2.5, 3.9, 0.1);
        assert_eq!(q.to::<i32>(), Quaternion::new(1, -2, 3, 0));
        assert_eq!(q[1], -2.5);
    }
}
