use super::utilities::{try_binary_op, BinaryDerivative};
use crate::{
    dtypes::Dtype,
    tensor::{Error, Merge, Tape, Tensor},
};

#[derive(Debug, Default, Copy, Clone)]
pub(super) struct BinaryMulKernelOp;

impl<E: Dtype> BinaryDerivative<E> for BinaryMulKernelOp {
    const NAME: &'static str = "mul";
    #[inline(always)]
    fn f(&self, x: &E, y: &E) -> E {
        *x * *y
    }
    #[inline(always)]
    fn dfdx(&self, _: &E, y: &E) -> E {
        *y
    }
    #[inline(always)]
    fn dfdy(&self, x: &E, _: &E) -> E {
        *x
    }
}

impl<E: Dtype, LTape: Tape<E>> Tensor<E, LTape> {
    /// Element wise multiplication of two tensors with the same shape.
    pub fn try_mul<RTape>(self, rhs: Tensor<E, RTape>) -> Result<Self, Error>
    where
        LTape: Merge<RTape>,
    {
        try_binary_op(BinaryMulKernelOp, self, rhs)
    }
}

impl<E: Dtype, LTape: Tape<E> + Merge<RTape>, RTape> std::ops::Mul<Tensor<E, RTape>>
    for Tensor<E, LTape>
{
    type Output = Self;
    /// Calls [Tensor::try_mul] and panics on error.
    fn mul(self, rhs: Tensor<E, RTape>) -> Self::Output {
        self.try_mul(rhs).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use crate::{tensor::*, tests::*};

    #[test]
    fn test_mul() {
        let a: Tensor<TestDtype> = Tensor::from_vec(vec![1.0, 2.0, 3.0], [3]);
        let b: Tensor<TestDtype> = Tensor::from_vec(vec![-1.0, 0.5, 4.0], [3]);
        let r = a.leaky_trace() * b.leaky_trace();
        assert_close!(r.as_vec(), vec![-1.0, 1.0, 12.0]);
        let g = r.mean().backward();
        assert_close!(g.get(&a).as_vec(), vec![-1.0 / 3.0, 0.5 / 3.0, 4.0 / 3.0]);
        assert_close!(g.get(&b).as_vec(), vec![1.0 / 3.0, 2.0 / 3.0, 1.0]);
    }

    #[test]
    fn test_mul_same_tensor_twice() {
        let a: Tensor<TestDtype> = Tensor::from_vec(vec![1.0, -2.0], [2]);
        let r = a.leaky_trace() * a.clone();
        let g = r.mean().backward();
        // d/da mean(a * a) = a, accumulated once per operand
        assert_close!(g.get(&a).as_vec(), vec![1.0, -2.0]);
    }
}
