use super::utilities::{try_binary_op, BinaryDerivative};
use crate::{
    dtypes::Dtype,
    tensor::{Error, Merge, Tape, Tensor},
};

#[derive(Debug, Default, Copy, Clone)]
pub(super) struct BinaryAddKernelOp;

impl<E: Dtype> BinaryDerivative<E> for BinaryAddKernelOp {
    const NAME: &'static str = "add";
    #[inline(always)]
    fn f(&self, x: &E, y: &E) -> E {
        *x + *y
    }
    #[inline(always)]
    fn dfdx(&self, _: &E, _: &E) -> E {
        E::one()
    }
    #[inline(always)]
    fn dfdy(&self, _: &E, _: &E) -> E {
        E::one()
    }
}

impl<E: Dtype, LTape: Tape<E>> Tensor<E, LTape> {
    /// Element wise addition of two tensors with the same shape.
    pub fn try_add<RTape>(self, rhs: Tensor<E, RTape>) -> Result<Self, Error>
    where
        LTape: Merge<RTape>,
    {
        try_binary_op(BinaryAddKernelOp, self, rhs)
    }
}

impl<E: Dtype, LTape: Tape<E> + Merge<RTape>, RTape> std::ops::Add<Tensor<E, RTape>>
    for Tensor<E, LTape>
{
    type Output = Self;
    /// Calls [Tensor::try_add] and panics on error.
    fn add(self, rhs: Tensor<E, RTape>) -> Self::Output {
        self.try_add(rhs).unwrap()
    }
}
