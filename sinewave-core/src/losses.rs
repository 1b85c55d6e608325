//! Standard loss functions such as [mse_loss].

use crate::{
    dtypes::Dtype,
    tensor::{Error, Tape, Tensor},
};

/// [Mean Squared Error](https://en.wikipedia.org/wiki/Mean_squared_error).
/// This computes `(pred - targ).square().mean()`.
///
/// See [Tensor::try_mean], [Tensor::try_square], and [Tensor::try_sub].
///
/// ```rust
/// # use sinewave_core::prelude::*;
/// let pred: Tensor<f32> = Tensor::from_vec(vec![1.0, 2.0], [2]);
/// let targ: Tensor<f32> = Tensor::from_vec(vec![0.0, 4.0], [2]);
/// assert_eq!(mse_loss(pred.leaky_trace(), targ).item(), Ok(2.5));
/// ```
pub fn try_mse_loss<E: Dtype, T: Tape<E>>(
    pred: Tensor<E, T>,
    targ: Tensor<E>,
) -> Result<Tensor<E, T>, Error> {
    pred.try_sub(targ)?.try_square()?.try_mean()
}

/// See [try_mse_loss].
pub fn mse_loss<E: Dtype, T: Tape<E>>(pred: Tensor<E, T>, targ: Tensor<E>) -> Tensor<E, T> {
    try_mse_loss(pred, targ).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn test_mse() {
        let x: Tensor<TestDtype> = Tensor::from_vec(
            vec![0.87248087, -0.24252531, -1.0060949, 1.155084, 1.5545048],
            [5],
        );
        let y: Tensor<TestDtype> = Tensor::from_vec(
            vec![-0.90954804, -1.0193185, -0.39221755, 2.2524886, 1.3035554],
            [5],
        );
        let loss = mse_loss(x.leaky_trace(), y);
        assert_close!(loss.item().unwrap(), 1.0846305, 1e-5);
        let g = loss.backward();
        assert_close!(
            g.get(&x).as_vec(),
            vec![0.71281156, 0.31071728, -0.24555094, -0.43896184, 0.10037976],
            1e-5
        );
    }

    #[test]
    fn test_mse_shape_mismatch() {
        let x: Tensor<TestDtype> = Tensor::zeros([2, 3]);
        let y: Tensor<TestDtype> = Tensor::zeros([3, 2]);
        assert!(matches!(
            try_mse_loss(x, y),
            Err(Error::ShapeMismatch { op: "sub", .. })
        ));
    }
}
