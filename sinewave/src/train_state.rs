use sinewave_core::prelude::*;

use crate::{config::TrainConfig, data::generate_batch, model::SineLstm, prng::PrngKey};

/// Model parameters together with the optimizer that updates them.
///
/// Stepping consumes the state and returns the next one. Cloning is cheap
/// and clones never observe each other's updates.
#[derive(Debug, Clone)]
pub struct TrainState {
    /// Number of optimizer steps applied so far.
    pub step: usize,
    pub params: SineLstm<f32>,
    pub opt: Adam<SineLstm<f32>, f32>,
}

impl TrainState {
    pub fn create(params: SineLstm<f32>, cfg: AdamConfig) -> Self {
        let opt = Adam::new(&params, cfg);
        Self {
            step: 0,
            params,
            opt,
        }
    }

    /// Builds the initial state for `cfg`. The parameter shapes come from a
    /// batch drawn with `key`, and the parameters themselves from `key` too.
    pub fn init(key: PrngKey, cfg: &TrainConfig) -> Result<Self, Error> {
        let sample = generate_batch(key, &cfg.batch)?;
        let params = SineLstm::init(key, &sample.x, cfg.hidden)?;
        Ok(Self::create(params, cfg.adam))
    }

    /// Runs the model on `x`.
    pub fn apply<T: Tape<f32>>(&self, x: Tensor<f32, T>) -> Result<Tensor<f32, T>, Error> {
        self.params.try_forward(x)
    }

    /// One optimizer step using `gradients`.
    pub fn apply_gradients(mut self, gradients: &Gradients<f32>) -> Result<Self, Error> {
        self.opt.update(&mut self.params, gradients)?;
        self.step += 1;
        Ok(self)
    }
}
