use super::utilities::{try_binary_op, BinaryDerivative};
use crate::{
    dtypes::Dtype,
    tensor::{Error, Merge, Tape, Tensor},
};

#[derive(Debug, Default, Copy, Clone)]
pub(super) struct BinarySubKernelOp;

impl<E: Dtype> BinaryDerivative<E> for BinarySubKernelOp {
    const NAME: &'static str = "sub";
    #[inline(always)]
    fn f(&self, x: &E, y: &E) -> E {
        *x - *y
    }
    #[inline(always)]
    fn dfdx(&self, _: &E, _: &E) -> E {
        E::one()
    }
    #[inline(always)]
    fn dfdy(&self, _: &E, _: &E) -> E {
        -E::one()
    }
}

impl<E: Dtype, LTape: Tape<E>> Tensor<E, LTape> {
    /// Element wise subtraction of two tensors with the same shape.
    pub fn try_sub<RTape>(self, rhs: Tensor<E, RTape>) -> Result<Self, Error>
    where
        LTape: Merge<RTape>,
    {
        try_binary_op(BinarySubKernelOp, self, rhs)
    }
}

impl<E: Dtype, LTape: Tape<E> + Merge<RTape>, RTape> std::ops::Sub<Tensor<E, RTape>>
    for Tensor<E, LTape>
{
    type Output = Self;
    /// Calls [Tensor::try_sub] and panics on error.
    fn sub(self, rhs: Tensor<E, RTape>) -> Self::Output {
        self.try_sub(rhs).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use crate::{tensor::*, tests::*};

    #[test]
    fn test_sub() {
        let a: Tensor<TestDtype> = Tensor::from_vec(vec![1.0, 2.0, 3.0], [3]);
        let b: Tensor<TestDtype> = Tensor::from_vec(vec![-1.0, 0.5, 4.0], [3]);
        let r = a.leaky_trace() - b.leaky_trace();
        assert_close!(r.as_vec(), vec![2.0, 1.5, -1.0]);
        let g = r.mean().backward();
        assert_close!(g.get(&a).as_vec(), vec![1.0 / 3.0; 3]);
        assert_close!(g.get(&b).as_vec(), vec![-1.0 / 3.0; 3]);
    }

    #[test]
    fn test_sub_untraced_rhs() {
        let a: Tensor<TestDtype> = Tensor::from_vec(vec![1.0, 2.0], [2]);
        let b: Tensor<TestDtype> = Tensor::from_vec(vec![3.0, 5.0], [2]);
        let g = (a.leaky_trace() - b).mean().backward();
        assert_close!(g.get(&a).as_vec(), vec![0.5, 0.5]);
    }
}
