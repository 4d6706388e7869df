//! 2D vector type

use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use bytemuck::{Pod, Zeroable};
use num_traits::{AsPrimitive, Float};

use crate::{Scalar, Vec3};

/// 2D vector with x, y components
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

// SAFETY: `repr(C)` with two `T` fields, no padding.
unsafe impl<T: Zeroable> Zeroable for Vec2<T> {}
unsafe impl<T: Pod> Pod for Vec2<T> {}

impl<T> Vec2<T> {
    #[inline]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Scalar> Vec2<T> {
    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero())
    }

    #[inline]
    pub fn dot(self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length_squared(self) -> T {
        self.dot(self)
    }

    #[inline]
    pub fn component_mul(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Append a z component
    #[inline]
    pub fn extend(self, z: T) -> Vec3<T> {
        Vec3::new(self.x, self.y, z)
    }

    #[inline]
    pub fn to<U>(self) -> Vec2<U>
    where
        T: AsPrimitive<U>,
        U: Scalar,
    {
        Vec2::new(self.x.as_(), self.y.as_())
    }
}

impl<T: Scalar + Float> Vec2<T> {
    #[inline]
    pub fn length(self) -> T {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > T::zero() {
            self / len
        } else {
            Self::zero()
        }
    }

    #[inline]
    pub fn lerp(self, other: Self, t: T) -> Self {
        self * (T::one() - t) + other * t
    }
}

impl<T> From<[T; 2]> for Vec2<T> {
    fn from([x, y]: [T; 2]) -> Self {
        Self::new(x, y)
    }
}

impl<T> From<Vec2<T>> for [T; 2] {
    fn from(v: Vec2<T>) -> Self {
        [v.x, v.y]
    }
}

impl<T> Index<usize> for Vec2<T> {
    type Output = T;
    #[inline]
    fn index(&self, index: usize) -> &T {
        match index {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Vec2 index out of range: {}", index),
        }
    }
}

impl<T> IndexMut<usize> for Vec2<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("Vec2 index out of range: {}", index),
        }
    }
}

// Operator overloads

impl<T: Scalar> Add for Vec2<T> {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Scalar> AddAssign for Vec2<T> {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl<T: Scalar> Sub for Vec2<T> {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl<T: Scalar> SubAssign for Vec2<T> {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl<T: Scalar> Mul<T> for Vec2<T> {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: T) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl<T: Scalar> MulAssign<T> for Vec2<T> {
    #[inline]
    fn mul_assign(&mut self, scalar: T) {
        self.x *= scalar;
        self.y *= scalar;
    }
}

impl<T: Scalar> Div<T> for Vec2<T> {
    type Output = Self;
    #[inline]
    fn div(self, scalar: T) -> Self {
        Self::new(self.x / scalar, self.y / scalar)
    }
}

impl<T: Scalar> DivAssign<T> for Vec2<T> {
    #[inline]
    fn div_assign(&mut self, scalar: T) {
        self.x /= scalar;
        self.y /= scalar;
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for Vec2<T> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}
