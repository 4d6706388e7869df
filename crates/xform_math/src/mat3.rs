//! 3x3 matrix for 2D affine transforms
//!
//! Storage is row-major: three [`Vec3`] rows, nothing else, so the matrix
//! can be reinterpreted as nine contiguous scalars (see [`Mat3::as_slice`]).
//!
//! Vectors are treated as columns and multiplied from the right (`M * v`).
//! The transform builders (`scale`, `translate`, `rotate`) all right-multiply
//! the current matrix, so a chain `m.translate(..).rotate(..)` applies the
//! rotation to a vector first and the translation last.

use std::fmt;
use std::ops::{Index, IndexMut, Mul, MulAssign};

use bytemuck::{Pod, Zeroable};
use num_traits::{AsPrimitive, Float};

use crate::{Scalar, Vec2, Vec3};

/// 3x3 matrix type (row-major)
///
/// `Default` gives the zero matrix; use [`Mat3::identity`] or
/// [`Mat3::set_identity`] before composing transforms.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mat3<T> {
    rows: [Vec3<T>; 3],
}

// SAFETY: `repr(C)` wrapper around `[Vec3<T>; 3]`, which is itself padding-free.
unsafe impl<T: Zeroable> Zeroable for Mat3<T> {}
unsafe impl<T: Pod> Pod for Mat3<T> {}

const _: () = assert!(std::mem::size_of::<Mat3<f32>>() == std::mem::size_of::<f32>() * 3 * 3);
const _: () = assert!(std::mem::size_of::<Mat3<f64>>() == std::mem::size_of::<f64>() * 3 * 3);

impl<T> Mat3<T> {
    /// Create a matrix from its rows
    #[inline]
    pub const fn new(row0: Vec3<T>, row1: Vec3<T>, row2: Vec3<T>) -> Self {
        Self {
            rows: [row0, row1, row2],
        }
    }

    /// Get a matrix row, `index` must be below 3
    #[inline]
    pub fn row(&self, index: usize) -> &Vec3<T> {
        debug_assert!(index < 3, "Mat3 row index out of range: {}", index);
        &self.rows[index]
    }

    #[inline]
    pub fn row_mut(&mut self, index: usize) -> &mut Vec3<T> {
        debug_assert!(index < 3, "Mat3 row index out of range: {}", index);
        &mut self.rows[index]
    }

    /// All three rows
    #[inline]
    pub fn rows(&self) -> &[Vec3<T>; 3] {
        &self.rows
    }
}

impl<T: Scalar> Mat3<T> {
    pub fn identity() -> Self {
        let (o, l) = (T::zero(), T::one());
        Self::new(Vec3::new(l, o, o), Vec3::new(o, l, o), Vec3::new(o, o, l))
    }

    /// Build a column vector from the `index`-th element of every row
    #[inline]
    pub fn col(&self, index: usize) -> Vec3<T> {
        debug_assert!(index < 3, "Mat3 column index out of range: {}", index);
        Vec3::new(self.rows[0][index], self.rows[1][index], self.rows[2][index])
    }

    /// Transpose in place
    pub fn transpose(&mut self) -> &mut Self {
        let [r0, r1, r2] = &mut self.rows;
        std::mem::swap(&mut r1.x, &mut r0.y);
        std::mem::swap(&mut r2.x, &mut r0.z);
        std::mem::swap(&mut r2.y, &mut r1.z);
        self
    }

    /// `self = self * other`, same as `*=`
    pub fn right_multiply(&mut self, other: &Self) -> &mut Self {
        *self = *self * *other;
        self
    }

    /// `self = other * self`
    pub fn left_multiply(&mut self, other: &Self) -> &mut Self {
        *self = *other * *self;
        self
    }

    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::identity();
        self
    }

    /// Right-multiply by `diag(x, y, 1)`.
    ///
    /// Only columns 0 and 1 change, the translation column is kept.
    pub fn scale(&mut self, x: T, y: T) -> &mut Self {
        for row in &mut self.rows {
            row.x *= x;
            row.y *= y;
        }
        self
    }

    /// Right-multiply by `diag(x, y, z)`
    pub fn scale_xyz(&mut self, x: T, y: T, z: T) -> &mut Self {
        self.scale(x, y);
        for row in &mut self.rows {
            row.z *= z;
        }
        self
    }

    /// Scale all three directions by `s`
    pub fn scale_uniform(&mut self, s: T) -> &mut Self {
        self.scale_xyz(s, s, s)
    }

    pub fn scale_vec2(&mut self, s: Vec2<T>) -> &mut Self {
        self.scale(s.x, s.y)
    }

    /// Right-multiply by the 2D translation matrix
    ///
    /// ```text
    ///               / 1 0 x \
    /// self = self * | 0 1 y |
    ///               \ 0 0 1 /
    /// ```
    ///
    /// The translation is expressed in the basis already accumulated in the
    /// matrix, so calling this before or after `scale` gives different
    /// results.
    pub fn translate(&mut self, x: T, y: T) -> &mut Self {
        for row in &mut self.rows {
            row.z += row.x * x + row.y * y;
        }
        self
    }

    pub fn translate_vec2(&mut self, t: Vec2<T>) -> &mut Self {
        self.translate(t.x, t.y)
    }

    /// Convert to a different element type with `as` semantics
    pub fn to<U>(&self) -> Mat3<U>
    where
        T: AsPrimitive<U>,
        U: Scalar,
    {
        Mat3 {
            rows: self.rows.map(|r| r.to()),
        }
    }
}

impl<T: Scalar + Float> Mat3<T> {
    /// Right-multiply by a 2D rotation of `angle` radians.
    ///
    /// Positive angles rotate counter-clockwise, from the X axis toward Y.
    /// Columns 0 and 1 are recomputed in place; the result matches an
    /// explicit multiply by `[[cos, -sin, 0], [sin, cos, 0], [0, 0, 1]]`.
    pub fn rotate(&mut self, angle: T) -> &mut Self {
        let (sin, cos) = angle.sin_cos();
        let neg_sin = -sin;
        for row in &mut self.rows {
            let (m0, m1) = (row.x, row.y);
            row.x = m0 * cos + m1 * sin;
            row.y = m0 * neg_sin + m1 * cos;
        }
        self
    }
}

impl<T: Pod> Mat3<T> {
    /// The nine elements in row-major order
    pub fn as_slice(&self) -> &[T] {
        bytemuck::cast_slice(&self.rows)
    }
}

impl<T> From<[[T; 3]; 3]> for Mat3<T> {
    fn from([r0, r1, r2]: [[T; 3]; 3]) -> Self {
        Self::new(r0.into(), r1.into(), r2.into())
    }
}

impl<T> Index<usize> for Mat3<T> {
    type Output = Vec3<T>;
    #[inline]
    fn index(&self, index: usize) -> &Vec3<T> {
        self.row(index)
    }
}

impl<T> IndexMut<usize> for Mat3<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Vec3<T> {
        self.row_mut(index)
    }
}

impl<T: Scalar> Mul for Mat3<T> {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        let (c0, c1, c2) = (other.col(0), other.col(1), other.col(2));
        Self {
            rows: self.rows.map(|r| Vec3::new(r.dot(c0), r.dot(c1), r.dot(c2))),
        }
    }
}

impl<T: Scalar> MulAssign for Mat3<T> {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

/// Transform a column vector: `M * v`
impl<T: Scalar> Mul<Vec3<T>> for Mat3<T> {
    type Output = Vec3<T>;
    fn mul(self, v: Vec3<T>) -> Vec3<T> {
        Vec3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }
}

/// Transform a 2D point, taken as `(x, y, 1)` so translation applies
impl<T: Scalar> Mul<Vec2<T>> for Mat3<T> {
    type Output = Vec2<T>;
    fn mul(self, v: Vec2<T>) -> Vec2<T> {
        let p = v.extend(T::one());
        Vec2::new(self.rows[0].dot(p), self.rows[1].dot(p))
    }
}

/// Multiply every element by a scalar
impl<T: Scalar> MulAssign<T> for Mat3<T> {
    fn mul_assign(&mut self, s: T) {
        for row in &mut self.rows {
            *row *= s;
        }
    }
}

impl<T: fmt::Display> fmt::Display for Mat3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r0, r1, r2] = &self.rows;
        write!(f, "\n\t/{} {} {}\\", r0.x, r0.y, r0.z)?;
        write!(f, "\n\t|{} {} {}|", r1.x, r1.y, r1.z)?;
        write!(f, "\n\t\\{} {} {}/", r2.x, r2.y, r2.z)
    }
}
