//! 4x4 matrix for 3D transforms and projections
//!
//! Row-major, four [`Vec4`] rows and no other fields. Vectors are columns
//! multiplied from the right, and every transform builder right-multiplies
//! (`self = self * T`), matching [`Mat3`](crate::Mat3).
//!
//! Quaternion conversion lives here in both directions
//! ([`Mat4::set_quaternion`] and [`Mat4::to_quaternion`]), so the
//! quaternion type stays free of any matrix dependency.

use std::fmt;
use std::ops::{Index, IndexMut, Mul, MulAssign};

use bytemuck::{Pod, Zeroable};
use num_traits::{AsPrimitive, Float};

use crate::scalar::two;
use crate::{Quaternion, Scalar, Vec2, Vec3, Vec4};

/// 4x4 matrix type (row-major)
///
/// `Default` gives the zero matrix; call [`Mat4::set_identity`] (or build
/// with [`Mat4::identity`]) before chaining transforms.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mat4<T> {
    rows: [Vec4<T>; 4],
}

// SAFETY: `repr(C)` wrapper around `[Vec4<T>; 4]`, which is itself padding-free.
unsafe impl<T: Zeroable> Zeroable for Mat4<T> {}
unsafe impl<T: Pod> Pod for Mat4<T> {}

const _: () = assert!(std::mem::size_of::<Mat4<f32>>() == std::mem::size_of::<f32>() * 4 * 4);
const _: () = assert!(std::mem::size_of::<Mat4<f64>>() == std::mem::size_of::<f64>() * 4 * 4);

impl<T> Mat4<T> {
    /// Create a matrix from its rows
    #[inline]
    pub const fn new(row0: Vec4<T>, row1: Vec4<T>, row2: Vec4<T>, row3: Vec4<T>) -> Self {
        Self {
            rows: [row0, row1, row2, row3],
        }
    }

    /// Get a matrix row, `index` must be below 4
    #[inline]
    pub fn row(&self, index: usize) -> &Vec4<T> {
        debug_assert!(index < 4, "Mat4 row index out of range: {}", index);
        &self.rows[index]
    }

    #[inline]
    pub fn row_mut(&mut self, index: usize) -> &mut Vec4<T> {
        debug_assert!(index < 4, "Mat4 row index out of range: {}", index);
        &mut self.rows[index]
    }

    #[inline]
    pub fn rows(&self) -> &[Vec4<T>; 4] {
        &self.rows
    }
}

impl<T: Scalar> Mat4<T> {
    pub fn identity() -> Self {
        let (o, l) = (T::zero(), T::one());
        Self::new(
            Vec4::new(l, o, o, o),
            Vec4::new(o, l, o, o),
            Vec4::new(o, o, l, o),
            Vec4::new(o, o, o, l),
        )
    }

    /// Build a column vector from the `index`-th element of every row
    #[inline]
    pub fn col(&self, index: usize) -> Vec4<T> {
        debug_assert!(index < 4, "Mat4 column index out of range: {}", index);
        Vec4::new(
            self.rows[0][index],
            self.rows[1][index],
            self.rows[2][index],
            self.rows[3][index],
        )
    }

    /// Transpose in place
    pub fn transpose(&mut self) -> &mut Self {
        let [r0, r1, r2, r3] = &mut self.rows;
        std::mem::swap(&mut r1.x, &mut r0.y);
        std::mem::swap(&mut r2.x, &mut r0.z);
        std::mem::swap(&mut r3.x, &mut r0.w);
        std::mem::swap(&mut r2.y, &mut r1.z);
        std::mem::swap(&mut r3.y, &mut r1.w);
        std::mem::swap(&mut r3.z, &mut r2.w);
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

    /// Right-multiply by `diag(x, y, 1, 1)`
    pub fn scale(&mut self, x: T, y: T) -> &mut Self {
        for row in &mut self.rows {
            row.x *= x;
            row.y *= y;
        }
        self
    }

    /// Right-multiply by `diag(x, y, z, 1)`, the translation column is kept
    pub fn scale_xyz(&mut self, x: T, y: T, z: T) -> &mut Self {
        self.scale(x, y);
        for row in &mut self.rows {
            row.z *= z;
        }
        self
    }

    /// Scale x, y and z by `s`
    pub fn scale_uniform(&mut self, s: T) -> &mut Self {
        self.scale_xyz(s, s, s)
    }

    pub fn scale_vec2(&mut self, s: Vec2<T>) -> &mut Self {
        self.scale(s.x, s.y)
    }

    pub fn scale_vec3(&mut self, s: Vec3<T>) -> &mut Self {
        self.scale_xyz(s.x, s.y, s.z)
    }

    /// Right-multiply by a translation in the XY plane.
    ///
    /// Only the x and y terms are added to the last column, any z offset
    /// already accumulated there is left as it is.
    pub fn translate(&mut self, x: T, y: T) -> &mut Self {
        for row in &mut self.rows {
            row.w += row.x * x + row.y * y;
        }
        self
    }

    /// Right-multiply by the translation matrix
    ///
    /// ```text
    ///               / 1 0 0 x \
    /// self = self * | 0 1 0 y |
    ///               | 0 0 1 z |
    ///               \ 0 0 0 1 /
    /// ```
    pub fn translate_xyz(&mut self, x: T, y: T, z: T) -> &mut Self {
        for row in &mut self.rows {
            row.w += row.x * x + row.y * y + row.z * z;
        }
        self
    }

    pub fn translate_vec2(&mut self, t: Vec2<T>) -> &mut Self {
        self.translate(t.x, t.y)
    }

    pub fn translate_vec3(&mut self, t: Vec3<T>) -> &mut Self {
        self.translate_xyz(t.x, t.y, t.z)
    }

    /// Overwrite with the rotation matrix of `q`.
    ///
    /// The upper-left 3x3 block is the expansion of `q * v * q⁻¹`; the last
    /// row and column are (0, 0, 0, 1). For a non-unit `q` the block is not
    /// orthonormal.
    pub fn set_quaternion(&mut self, q: &Quaternion<T>) -> &mut Self {
        let (o, l, t) = (T::zero(), T::one(), two::<T>());
        let Quaternion { x, y, z, w } = *q;

        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (xw, yw, zw) = (x * w, y * w, z * w);

        self.rows = [
            Vec4::new(l - t * (yy + zz), t * (xy - zw), t * (xz + yw), o),
            Vec4::new(t * (xy + zw), l - t * (xx + zz), t * (yz - xw), o),
            Vec4::new(t * (xz - yw), t * (yz + xw), l - t * (xx + yy), o),
            Vec4::new(o, o, o, l),
        ];
        self
    }

    /// Right-multiply by the rotation matrix of `q`
    pub fn rotate(&mut self, q: &Quaternion<T>) -> &mut Self {
        self.right_multiply(&Self::from(*q))
    }

    /// Multiply every element by a scalar
    pub fn scale_elements(&mut self, s: T) -> &mut Self {
        for row in &mut self.rows {
            *row *= s;
        }
        self
    }

    /// Convert to a different element type with `as` semantics
    pub fn to<U>(&self) -> Mat4<U>
    where
        T: AsPrimitive<U>,
        U: Scalar,
    {
        Mat4 {
            rows: self.rows.map(|r| r.to()),
        }
    }
}

impl<T: Scalar + Float> Mat4<T> {
    /// Right-multiply by a rotation about `v / |v|` by `|v|` radians
    pub fn rotate_vec3(&mut self, v: Vec3<T>) -> &mut Self {
        self.rotate(&Quaternion::from_rotation_vector(v))
    }

    /// Right-multiply by a rotation about the Z axis (X toward Y)
    pub fn rotate_z(&mut self, angle: T) -> &mut Self {
        self.rotate_vec3(Vec3::new(T::zero(), T::zero(), angle))
    }

    /// Overwrite with an off-axis perspective projection.
    ///
    /// Maps the frustum bounded by the given clipping planes to clip space
    /// (OpenGL convention, camera looking down -Z). `left != right`,
    /// `bottom != top` and `near != far` are preconditions; violating them
    /// yields non-finite entries.
    pub fn set_frustum(
        &mut self,
        left: T,
        right: T,
        bottom: T,
        top: T,
        near: T,
        far: T,
    ) -> &mut Self {
        if left == right || bottom == top || near == far {
            log::warn!(
                "degenerate frustum: left={} right={} bottom={} top={} near={} far={}",
                left,
                right,
                bottom,
                top,
                near,
                far
            );
        }

        let (o, l, t) = (T::zero(), T::one(), two::<T>());
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;

        self.rows = [
            Vec4::new(t * near / width, o, (right + left) / width, o),
            Vec4::new(o, t * near / height, (top + bottom) / height, o),
            Vec4::new(o, o, -(far + near) / depth, -t * far * near / depth),
            Vec4::new(o, o, -l, o),
        ];
        self
    }

    /// Overwrite with a symmetric perspective projection.
    ///
    /// `fov_y` is the full vertical field of view in radians, `aspect` is
    /// width over height.
    pub fn set_perspective(&mut self, fov_y: T, aspect: T, near: T, far: T) -> &mut Self {
        let top = near * (fov_y / two()).tan();
        let right = top * aspect;
        self.set_frustum(-right, right, -top, top, near, far)
    }

    /// Extract the rotation of the upper-left 3x3 block as a unit quaternion.
    ///
    /// The block is assumed to be a pure rotation. Returns `q` or `-q` for
    /// a matrix built by [`Mat4::set_quaternion`] from a unit `q`.
    pub fn to_quaternion(&self) -> Quaternion<T> {
        let one = T::one();
        let four = two::<T>() + two::<T>();
        let [r0, r1, r2, _] = &self.rows;
        let (m00, m11, m22) = (r0.x, r1.y, r2.z);
        let trace = m00 + m11 + m22;

        let q = if trace > T::zero() {
            let s = (trace + one).sqrt() * two();
            Quaternion::new((r2.y - r1.z) / s, (r0.z - r2.x) / s, (r1.x - r0.y) / s, s / four)
        } else if m00 > m11 && m00 > m22 {
            let s = (one + m00 - m11 - m22).sqrt() * two();
            Quaternion::new(s / four, (r0.y + r1.x) / s, (r0.z + r2.x) / s, (r2.y - r1.z) / s)
        } else if m11 > m22 {
            let s = (one + m11 - m00 - m22).sqrt() * two();
            Quaternion::new((r0.y + r1.x) / s, s / four, (r1.z + r2.y) / s, (r0.z - r2.x) / s)
        } else {
            let s = (one + m22 - m00 - m11).sqrt() * two();
            Quaternion::new((r0.z + r2.x) / s, (r1.z + r2.y) / s, s / four, (r1.x - r0.y) / s)
        };
        q.normalized()
    }
}

impl<T: Pod> Mat4<T> {
    /// The sixteen elements in row-major order
    pub fn as_slice(&self) -> &[T] {
        bytemuck::cast_slice(&self.rows)
    }
}

impl<T: Scalar> From<Quaternion<T>> for Mat4<T> {
    fn from(q: Quaternion<T>) -> Self {
        let mut m = Self::identity();
        m.set_quaternion(&q);
        m
    }
}

impl<T> From<[[T; 4]; 4]> for Mat4<T> {
    fn from([r0, r1, r2, r3]: [[T; 4]; 4]) -> Self {
        Self::new(r0.into(), r1.into(), r2.into(), r3.into())
    }
}

impl<T> Index<usize> for Mat4<T> {
    type Output = Vec4<T>;
    #[inline]
    fn index(&self, index: usize) -> &Vec4<T> {
        self.row(index)
    }
}

impl<T> IndexMut<usize> for Mat4<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Vec4<T> {
        self.row_mut(index)
    }
}

impl<T: Scalar> Mul for Mat4<T> {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        let cols = [other.col(0), other.col(1), other.col(2), other.col(3)];
        Self {
            rows: self
                .rows
                .map(|r| Vec4::new(r.dot(cols[0]), r.dot(cols[1]), r.dot(cols[2]), r.dot(cols[3]))),
        }
    }
}

impl<T: Scalar> MulAssign for Mat4<T> {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl<T: Scalar> MulAssign<T> for Mat4<T> {
    fn mul_assign(&mut self, s: T) {
        self.scale_elements(s);
    }
}

impl<T: Scalar> Mul<Vec4<T>> for Mat4<T> {
    type Output = Vec4<T>;
    fn mul(self, v: Vec4<T>) -> Vec4<T> {
        let [r0, r1, r2, r3] = self.rows;
        Vec4::new(r0.dot(v), r1.dot(v), r2.dot(v), r3.dot(v))
    }
}

/// Transform a 3D point, taken as `(x, y, z, 1)`; no perspective divide
impl<T: Scalar> Mul<Vec3<T>> for Mat4<T> {
    type Output = Vec3<T>;
    fn mul(self, v: Vec3<T>) -> Vec3<T> {
        let p = v.extend(T::one());
        Vec3::new(self.rows[0].dot(p), self.rows[1].dot(p), self.rows[2].dot(p))
    }
}

/// Transform a 2D point, taken as `(x, y, 0, 1)`
impl<T: Scalar> Mul<Vec2<T>> for Mat4<T> {
    type Output = Vec2<T>;
    fn mul(self, v: Vec2<T>) -> Vec2<T> {
        let p = v.extend(T::zero()).extend(T::one());
        Vec2::new(self.rows[0].dot(p), self.rows[1].dot(p))
    }
}

impl<T: fmt::Display> fmt::Display for Mat4<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r0, r1, r2, r3] = &self.rows;
        write!(f, "\n\t/{} {} {} {}\\", r0.x, r0.y, r0.z, r0.w)?;
        write!(f, "\n\t|{} {} {} {}|", r1.x, r1.y, r1.z, r1.w)?;
        write!(f, "\n\t|{} {} {} {}|", r2.x, r2.y, r2.z, r2.w)?;
        write!(f, "\n\t\\{} {} {} {}/", r3.x, r3.y, r3.z, r3.w)
    }
}
