use super::utilities::{try_unary_op, UnaryDerivative};
use crate::{
    dtypes::Dtype,
    tensor::{Error, Tape, Tensor},
};

#[derive(Debug, Default, Copy, Clone)]
pub(super) struct SquareKernelOp;

impl<E: Dtype> UnaryDerivative<E> for SquareKernelOp {
    const DF_USES_FX: bool = false;
    #[inline(always)]
    fn f(&self, x: &E) -> E {
        *x * *x
    }
    #[inline(always)]
    fn df(&self, x: &E) -> E {
        *x + *x
    }
}

impl<E: Dtype, T: Tape<E>> Tensor<E, T> {
    /// `t^2`
    ///
    /// The derivative is `2 * t`.
    pub fn try_square(self) -> Result<Self, Error> {
        try_unary_op(SquareKernelOp, self)
    }

    /// See [Tensor::try_square].
    pub fn square(self) -> Self {
        self.try_square().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use crate::{tensor::*, tests::*};

    #[test]
    fn test_square() {
        let x: Tensor<TestDtype> = Tensor::from_vec(vec![-2.0, -1.0, 0.0, 1.0, 2.0], [5]);
        let r = x.leaky_trace().square();
        assert_close!(r.as_vec(), vec![4.0, 1.0, 0.0, 1.0, 4.0]);
        let g = r.mean().backward();
        assert_close!(g.get(&x).as_vec(), vec![-0.8, -0.4, 0.0, 0.4, 0.8]);
    }
}
