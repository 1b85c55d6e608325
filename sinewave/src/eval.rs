use sinewave_core::prelude::*;

use crate::{config::BatchConfig, data::generate_batch, prng::PrngKey, train_state::TrainState};

/// The model's output on one held-out sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub xs: Vec<f32>,
    pub labels: Vec<f32>,
    pub predictions: Vec<f32>,
    /// Mean squared error of `predictions` against `labels`.
    pub loss: f32,
}

impl Evaluation {
    pub fn label_points(&self) -> Vec<(f64, f64)> {
        points(&self.xs, &self.labels)
    }

    pub fn prediction_points(&self) -> Vec<(f64, f64)> {
        points(&self.xs, &self.predictions)
    }
}

fn points(xs: &[f32], ys: &[f32]) -> Vec<(f64, f64)> {
    xs.iter()
        .zip(ys)
        .map(|(x, y)| (*x as f64, *y as f64))
        .collect()
}

/// Draws one batch with `key` and runs the model on its first sequence.
pub fn evaluate(state: &TrainState, key: PrngKey, cfg: &BatchConfig) -> Result<Evaluation, Error> {
    let batch = generate_batch(key, cfg)?.first()?;
    let predictions = state.apply(batch.x.clone())?;
    let loss = try_mse_loss(predictions.clone(), batch.y.clone())?.item()?;
    Ok(Evaluation {
        xs: batch.x.as_vec(),
        labels: batch.y.as_vec(),
        predictions: predictions.as_vec(),
        loss,
    })
}
