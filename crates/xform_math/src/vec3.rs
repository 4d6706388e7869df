//! 3D vector type

use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use bytemuck::{Pod, Zeroable};
use num_traits::{AsPrimitive, Float};

use crate::{Scalar, Vec2, Vec4};

/// 3D vector with x, y, z components
///
/// Used on its own and as a row of [`Mat3`](crate::Mat3).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

// SAFETY: `repr(C)` struct of three `T` fields, so there is no padding and
// every bit pattern valid for `T` is valid for the vector.
unsafe impl<T: Zeroable> Zeroable for Vec3<T> {}
unsafe impl<T: Pod> Pod for Vec3<T> {}

impl<T> Vec3<T> {
    /// Create a new Vec3
    #[inline]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl<T: Scalar> Vec3<T> {
    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    #[inline]
    pub fn unit_x() -> Self {
        Self::new(T::one(), T::zero(), T::zero())
    }

    #[inline]
    pub fn unit_y() -> Self {
        Self::new(T::zero(), T::one(), T::zero())
    }

    #[inline]
    pub fn unit_z() -> Self {
        Self::new(T::zero(), T::zero(), T::one())
    }

    /// Dot product
    #[inline]
    pub fn dot(self, other: Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product (right-handed)
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length squared (avoids the square root)
    #[inline]
    pub fn length_squared(self) -> T {
        self.dot(self)
    }

    /// Component-wise multiplication (Hadamard product)
    #[inline]
    pub fn component_mul(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Drop the z component
    #[inline]
    pub fn xy(self) -> Vec2<T> {
        Vec2::new(self.x, self.y)
    }

    /// Append a w component
    #[inline]
    pub fn extend(self, w: T) -> Vec4<T> {
        Vec4::new(self.x, self.y, self.z, w)
    }

    /// Convert to a different element type with `as` semantics
    #[inline]
    pub fn to<U>(self) -> Vec3<U>
    where
        T: AsPrimitive<U>,
        U: Scalar,
    {
        Vec3::new(self.x.as_(), self.y.as_(), self.z.as_())
    }
}

impl<T: Scalar + Float> Vec3<T> {
    /// Length (magnitude)
    #[inline]
    pub fn length(self) -> T {
        self.length_squared().sqrt()
    }

    /// Normalize to unit length, the zero vector stays zero
    #[inline]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > T::zero() {
            self / len
        } else {
            Self::zero()
        }
    }

    /// Linear interpolation between two vectors
    #[inline]
    pub fn lerp(self, other: Self, t: T) -> Self {
        self * (T::one() - t) + other * t
    }
}

impl<T> From<[T; 3]> for Vec3<T> {
    fn from([x, y, z]: [T; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl<T> From<Vec3<T>> for [T; 3] {
    fn from(v: Vec3<T>) -> Self {
        [v.x, v.y, v.z]
    }
}

impl<T> Index<usize> for Vec3<T> {
    type Output = T;
    #[inline]
    fn index(&self, index: usize) -> &T {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index out of range: {}", index),
        }
    }
}

impl<T> IndexMut<usize> for Vec3<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vec3 index out of range: {}", index),
        }
    }
}

// Operator overloads

impl<T: Scalar> Add for Vec3<T> {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<T: Scalar> AddAssign for Vec3<T> {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl<T: Scalar> Sub for Vec3<T> {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<T: Scalar> SubAssign for Vec3<T> {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl<T: Scalar> Mul<T> for Vec3<T> {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: T) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl<T: Scalar> MulAssign<T> for Vec3<T> {
    #[inline]
    fn mul_assign(&mut self, scalar: T) {
        self.x *= scalar;
        self.y *= scalar;
        self.z *= scalar;
    }
}

impl<T: Scalar> Div<T> for Vec3<T> {
    type Output = Self;
    #[inline]
    fn div(self, scalar: T) -> Self {
        Self::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl<T: Scalar> DivAssign<T> for Vec3<T> {
    #[inline]
    fn div_assign(&mut self, scalar: T) {
        self.x /= scalar;
        self.y /= scalar;
        self.z /= scalar;
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for Vec3<T> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}
