//! Element types that tensors can hold and differentiate through.

/// A floating point element usable in a [crate::tensor::Tensor].
///
/// Implemented for [f32] and [f64].
pub trait Dtype:
    'static
    + Copy
    + Default
    + std::fmt::Debug
    + std::fmt::Display
    + PartialOrd
    + Send
    + Sync
    + num_traits::Float
    + std::ops::AddAssign
    + std::ops::SubAssign
    + std::ops::MulAssign
    + std::iter::Sum
{
    /// Converts from `f64`, rounding to the nearest representable value.
    fn from_f64_lossy(x: f64) -> Self;
}

impl Dtype for f32 {
    fn from_f64_lossy(x: f64) -> Self {
        x as f32
    }
}

impl Dtype for f64 {
    fn from_f64_lossy(x: f64) -> Self {
        x
    }
}
