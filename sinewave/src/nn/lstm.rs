use rand::Rng;
use sinewave_core::prelude::*;

use super::init::{lecun_normal, orthogonal};

/// A single LSTM cell scanned over the time axis of a `(batch, time,
/// features)` input.
///
/// Gate weights are fused along the last axis in the order input, forget,
/// candidate, output:
/// - `w_ih` is `(features, 4 * hidden)`
/// - `w_hh` is `(hidden, 4 * hidden)`
/// - `bias` is `(4 * hidden,)`
///
/// The carry `(h, c)` starts at zero for every sequence. The output is the
/// hidden state of every step, `(batch, time, hidden)`.
#[derive(Debug, Clone)]
pub struct Lstm<E> {
    pub w_ih: Tensor<E>,
    pub w_hh: Tensor<E>,
    pub bias: Tensor<E>,
}

impl<E: Dtype> Lstm<E> {
    /// LeCun-normal input kernel, an orthogonal recurrent kernel per gate,
    /// and zero biases.
    pub fn init<R: Rng + ?Sized>(
        features: usize,
        hidden: usize,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let w_ih = lecun_normal([features, 4 * hidden], rng)?;

        let mut w_hh = vec![E::zero(); hidden * 4 * hidden];
        for gate in 0..4 {
            let block = orthogonal(hidden, rng);
            for (r, row) in block.chunks_exact(hidden.max(1)).enumerate() {
                let start = r * 4 * hidden + gate * hidden;
                for (w, v) in w_hh[start..start + hidden].iter_mut().zip(row) {
                    *w = E::from_f64_lossy(*v);
                }
            }
        }

        Ok(Self {
            w_ih,
            w_hh: Tensor::try_from_vec(w_hh, [hidden, 4 * hidden])?,
            bias: Tensor::zeros([4 * hidden]),
        })
    }

    pub fn features(&self) -> usize {
        self.w_ih.shape().dim(0)
    }

    pub fn hidden(&self) -> usize {
        self.w_hh.shape().dim(0)
    }

    /// Checks that `shape` is `(batch, time, features)` with at least one
    /// time step, returning `(batch, time)`.
    pub(crate) fn check_input(&self, shape: &Shape) -> Result<(usize, usize), Error> {
        if shape.rank() != 3 {
            return Err(Error::RankMismatch {
                op: "lstm",
                expected: 3,
                found: shape.rank(),
            });
        }
        let (batch, time, features) = (shape.dim(0), shape.dim(1), shape.dim(2));
        if features != self.features() {
            return Err(Error::ShapeMismatch {
                op: "lstm",
                expected: Shape::from([batch, time, self.features()]),
                found: shape.clone(),
            });
        }
        if time == 0 {
            return Err(Error::Empty { op: "lstm" });
        }
        Ok((batch, time))
    }
}

impl<E: Dtype> UpdateParams<E> for Lstm<E> {
    fn try_update_params<M, Optim: Optimizer<M, E>>(
        &mut self,
        optimizer: &mut Optim,
        gradients: &Gradients<E>,
        missing_tensors: &mut Vec<UniqueId>,
    ) -> Result<(), Error> {
        self.w_ih
            .try_update_params(optimizer, gradients, missing_tensors)?;
        self.w_hh
            .try_update_params(optimizer, gradients, missing_tensors)?;
        self.bias
            .try_update_params(optimizer, gradients, missing_tensors)
    }
}

impl<E> NumParams for Lstm<E> {
    fn num_params(&self) -> usize {
        self.w_ih.num_params() + self.w_hh.num_params() + self.bias.num_params()
    }
}

impl<E: Dtype, T: Tape<E>> Module<Tensor<E, T>> for Lstm<E> {
    type Output = Tensor<E, T>;

    fn try_forward(&self, x: Tensor<E, T>) -> Result<Self::Output, Error> {
        let (batch, time) = self.check_input(x.shape())?;
        let hidden = self.hidden();

        // The input's tape rides on the initial hidden state. Every other
        // traced value starts from an empty tape and is merged back in.
        let (x, tape) = x.split_tape();
        let mut h: Tensor<E, T> = Tensor::zeros([batch, hidden]).put_tape(tape);
        let mut c: Tensor<E, T> = Tensor::zeros([batch, hidden]).put_tape(T::default());

        let mut outputs = Vec::with_capacity(time);
        for t in 0..time {
            let x_t = x.retaped::<T>().try_select(1, t)?;
            let z = x_t
                .try_matmul(self.w_ih.retaped::<T>())?
                .try_add(h.try_matmul(self.w_hh.retaped::<T>())?)?
                .try_bias_add(self.bias.retaped::<T>())?;

            let i = z.with_empty_tape().try_slice_last(0..hidden)?.try_sigmoid()?;
            let f = z
                .with_empty_tape()
                .try_slice_last(hidden..2 * hidden)?
                .try_sigmoid()?;
            let g = z
                .with_empty_tape()
                .try_slice_last(2 * hidden..3 * hidden)?
                .try_tanh()?;
            let o = z.try_slice_last(3 * hidden..4 * hidden)?.try_sigmoid()?;

            let c_t = f.try_mul(c)?.try_add(i.try_mul(g)?)?;
            c = c_t.with_empty_tape();
            let h_t = o.try_mul(c_t.try_tanh()?)?;
            h = h_t.with_empty_tape();
            outputs.push(h_t);
        }
        outputs.try_stack_along(1)
    }
}
