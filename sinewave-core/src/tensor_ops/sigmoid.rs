use super::utilities::{try_unary_op, UnaryDerivative};
use crate::{
    dtypes::Dtype,
    tensor::{Error, Tape, Tensor},
};

#[derive(Debug, Default, Copy, Clone)]
pub(super) struct SigmoidKernelOp;

impl<E: Dtype> UnaryDerivative<E> for SigmoidKernelOp {
    const DF_USES_FX: bool = true;
    #[inline(always)]
    fn f(&self, x: &E) -> E {
        E::one() / (E::one() + (-*x).exp())
    }
    #[inline(always)]
    fn df(&self, &fx: &E) -> E {
        fx * (E::one() - fx)
    }
}

impl<E: Dtype, T: Tape<E>> Tensor<E, T> {
    /// [Sigmoid](https://en.wikipedia.org/wiki/Sigmoid_function). `1 / (1 + exp(-t))`.
    ///
    /// The derivative is `sigmoid(t) * (1.0 - sigmoid(t))`.
    pub fn try_sigmoid(self) -> Result<Self, Error> {
        try_unary_op(SigmoidKernelOp, self)
    }

    /// See [Tensor::try_sigmoid].
    pub fn sigmoid(self) -> Self {
        self.try_sigmoid().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use crate::{tensor::*, tests::*};

    #[test]
    fn test_sigmoid() {
        let x: Tensor<TestDtype> = Tensor::from_vec(vec![-2.0, -1.0, 0.0, 1.0, 2.0], [5]);
        let r = x.leaky_trace().sigmoid();
        assert_close!(
            r.as_vec(),
            vec![0.11920292, 0.26894143, 0.5, 0.7310586, 0.880797]
        );
        let g = r.mean().backward();
        assert_close!(
            g.get(&x).as_vec(),
            vec![0.020998716, 0.039322387, 0.05, 0.039322387, 0.020998726]
        );
    }
}
