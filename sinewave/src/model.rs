use sinewave_core::prelude::*;

use crate::{
    nn::{Linear, Lstm},
    prng::PrngKey,
};

/// The sequence model: an [Lstm] scanned over time, then a one-unit
/// [Linear] head applied to every step's hidden state.
///
/// Maps `(batch, time, features)` to `(batch, time, 1)`.
#[derive(Debug, Clone)]
pub struct SineLstm<E> {
    pub lstm: Lstm<E>,
    pub head: Linear<E>,
}

impl<E: Dtype> SineLstm<E> {
    /// Builds parameters for inputs shaped like `sample`, whose last axis is
    /// the feature width.
    pub fn init(key: PrngKey, sample: &Tensor<E>, hidden: usize) -> Result<Self, Error> {
        let shape = sample.shape();
        if shape.rank() != 3 {
            return Err(Error::RankMismatch {
                op: "init",
                expected: 3,
                found: shape.rank(),
            });
        }
        let mut rng = key.rng();
        let lstm = Lstm::init(shape.dim(2), hidden, &mut rng)?;
        let head = Linear::init(hidden, 1, &mut rng)?;
        Ok(Self { lstm, head })
    }
}

impl<E: Dtype> UpdateParams<E> for SineLstm<E> {
    fn try_update_params<M, Optim: Optimizer<M, E>>(
        &mut self,
        optimizer: &mut Optim,
        gradients: &Gradients<E>,
        missing_tensors: &mut Vec<UniqueId>,
    ) -> Result<(), Error> {
        self.lstm
            .try_update_params(optimizer, gradients, missing_tensors)?;
        self.head
            .try_update_params(optimizer, gradients, missing_tensors)
    }
}

impl<E> NumParams for SineLstm<E> {
    fn num_params(&self) -> usize {
        self.lstm.num_params() + self.head.num_params()
    }
}

impl<E: Dtype, T: Tape<E>> Module<Tensor<E, T>> for SineLstm<E> {
    type Output = Tensor<E, T>;

    fn try_forward(&self, x: Tensor<E, T>) -> Result<Self::Output, Error> {
        let (batch, time) = self.lstm.check_input(x.shape())?;
        let hidden = self.lstm.hidden();
        let h = self.lstm.try_forward(x)?.try_reshape([batch * time, hidden])?;
        self.head
            .try_forward(h)?
            .try_reshape([batch, time, self.head.out()])
    }
}
