use super::utilities::{try_unary_op, UnaryDerivative};
use crate::{
    dtypes::Dtype,
    tensor::{Error, Tape, Tensor},
};

#[derive(Debug, Default, Copy, Clone)]
pub(super) struct TanhKernelOp;

impl<E: Dtype> UnaryDerivative<E> for TanhKernelOp {
    const DF_USES_FX: bool = true;
    #[inline(always)]
    fn f(&self, x: &E) -> E {
        x.tanh()
    }
    #[inline(always)]
    fn df(&self, &fx: &E) -> E {
        E::one() - fx * fx
    }
}

impl<E: Dtype, T: Tape<E>> Tensor<E, T> {
    /// [Hyperbolic Tangent (Tanh)](https://en.wikipedia.org/wiki/Hyperbolic_functions#Tanh).
    ///
    /// The derivative is `1.0 - square(tanh(t))`.
    pub fn try_tanh(self) -> Result<Self, Error> {
        try_unary_op(TanhKernelOp, self)
    }

    /// See [Tensor::try_tanh].
    pub fn tanh(self) -> Self {
        self.try_tanh().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use crate::{tensor::*, tests::*};

    #[test]
    fn test_tanh() {
        let x: Tensor<TestDtype> = Tensor::from_vec(vec![-2.0, -1.0, 0.0, 1.0, 2.0], [5]);
        let r = x.leaky_trace().tanh();
        assert_close!(
            r.as_vec(),
            vec![-0.9640276, -0.7615942, 0.0, 0.7615942, 0.9640276]
        );
        let g = r.mean().backward();
        assert_close!(
            g.get(&x).as_vec(),
            vec![0.014130165, 0.083994865, 0.2, 0.083994865, 0.014130165]
        );
    }
}
