use rand::Rng;
use sinewave_core::prelude::*;

use super::init::lecun_normal;

/// A linear transformation of the form `x @ weight + bias`, where `weight`
/// is a `(inp, out)` matrix, `x` is a `(batch, inp)` matrix, and `bias` is a
/// vector.
///
/// ```rust
/// # use sinewave::prelude::*;
/// # use rand::{rngs::StdRng, SeedableRng};
/// let model: Linear<f32> = Linear::init(5, 2, &mut StdRng::seed_from_u64(0)).unwrap();
/// let y = model.forward(Tensor::zeros([10, 5]));
/// assert_eq!(y.shape(), &Shape::from([10, 2]));
/// ```
#[derive(Debug, Clone)]
pub struct Linear<E> {
    pub weight: Tensor<E>,
    pub bias: Tensor<E>,
}

impl<E: Dtype> Linear<E> {
    /// LeCun-normal weight and a zero bias.
    pub fn init<R: Rng + ?Sized>(inp: usize, out: usize, rng: &mut R) -> Result<Self, Error> {
        Ok(Self {
            weight: lecun_normal([inp, out], rng)?,
            bias: Tensor::zeros([out]),
        })
    }

    pub fn inp(&self) -> usize {
        self.weight.shape().dim(0)
    }

    pub fn out(&self) -> usize {
        self.weight.shape().dim(1)
    }
}

impl<E: Dtype> UpdateParams<E> for Linear<E> {
    fn try_update_params<M, Optim: Optimizer<M, E>>(
        &mut self,
        optimizer: &mut Optim,
        gradients: &Gradients<E>,
        missing_tensors: &mut Vec<UniqueId>,
    ) -> Result<(), Error> {
        self.weight
            .try_update_params(optimizer, gradients, missing_tensors)?;
        self.bias
            .try_update_params(optimizer, gradients, missing_tensors)
    }
}

impl<E> NumParams for Linear<E> {
    fn num_params(&self) -> usize {
        self.weight.num_params() + self.bias.num_params()
    }
}

impl<E: Dtype, T: Tape<E>> Module<Tensor<E, T>> for Linear<E> {
    type Output = Tensor<E, T>;
    fn try_forward(&self, x: Tensor<E, T>) -> Result<Self::Output, Error> {
        x.try_matmul(self.weight.retaped::<T>())?
            .try_bias_add(self.bias.retaped::<T>())
    }
}
