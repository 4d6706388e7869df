//! Element type abstraction shared by vectors, matrices and quaternions

use std::fmt;

use num_traits::{Num, NumAssign};

/// Scalar element type.
///
/// Anything `Copy` with the four arithmetic operators (plus their assigning
/// forms), `0`, `1`, equality and a `Display` rendering qualifies, so both
/// integer and floating point types can be used. Operations that need
/// trigonometry or square roots additionally require [`num_traits::Float`].
pub trait Scalar: Copy + PartialEq + fmt::Debug + fmt::Display + Num + NumAssign + 'static {}

impl<T> Scalar for T where
    T: Copy + PartialEq + fmt::Debug + fmt::Display + Num + NumAssign + 'static
{
}

/// `1 + 1`, for formulas that need a literal 2 in any scalar type
#[inline]
pub(crate) fn two<T: Scalar>() -> T {
    T::one() + T::one()
}
