//! The update step and the training loop.

use sinewave_core::prelude::*;
use tracing::debug;

use crate::{
    config::BatchConfig,
    data::{generate_batch, Batch},
    prng::PrngKey,
    train_state::TrainState,
};

/// A progress report, emitted every `report_every` epochs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub epoch: usize,
    /// Mean loss over the most recent `report_every` epochs, this one
    /// included. Shorter at the start of training.
    pub avg_loss: f32,
}

/// One optimizer step on `batch` with a mean squared error loss. Returns the
/// next state and the loss before the step.
///
/// Pure: the result only depends on `state` and `batch`.
pub fn update(state: TrainState, batch: &Batch) -> Result<(TrainState, f32), Error> {
    let predictions = state.apply(batch.x.leaky_trace())?;
    let loss = try_mse_loss(predictions, batch.y.clone())?;
    let loss_value = loss.item()?;
    if !loss_value.is_finite() {
        return Err(Error::NonFiniteLoss);
    }
    let gradients = loss.try_backward()?;
    let state = state.apply_gradients(&gradients)?;
    Ok((state, loss_value))
}

/// Runs `epochs` update steps, each on a fresh batch.
///
/// Every epoch splits `key` and draws its batch from the second half, which
/// also becomes the key of the next epoch. Every `report_every` epochs
/// (starting at epoch 0) the mean loss of the most recent window is printed
/// to stdout as `<epoch> <average_loss>` and recorded. A `report_every` of
/// zero disables reports.
///
/// The first error aborts the loop.
pub fn train(
    mut state: TrainState,
    mut key: PrngKey,
    cfg: &BatchConfig,
    epochs: usize,
    report_every: usize,
) -> Result<(TrainState, Vec<Progress>), Error> {
    let mut losses = Vec::with_capacity(epochs);
    let mut reports = Vec::new();
    for epoch in 0..epochs {
        (_, key) = key.split();
        let batch = generate_batch(key, cfg)?;
        let (next, loss) = update(state, &batch)?;
        state = next;
        losses.push(loss);

        if report_every > 0 && epoch % report_every == 0 {
            let window = &losses[losses.len().saturating_sub(report_every)..];
            let avg_loss = window.iter().sum::<f32>() / window.len() as f32;
            println!("{epoch} {avg_loss}");
            debug!(epoch, avg_loss, last_loss = loss, window = window.len(), "progress");
            reports.push(Progress { epoch, avg_loss });
        }
    }
    Ok((state, reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainConfig;

    fn small() -> TrainConfig {
        TrainConfig {
            batch: BatchConfig {
                batch_size: 8,
                time_window: 10,
                ..Default::default()
            },
            hidden: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_update_is_pure() {
        let cfg = small();
        let state = TrainState::init(PrngKey::new(0), &cfg).unwrap();
        let batch = generate_batch(PrngKey::new(1), &cfg.batch).unwrap();

        let (a, loss_a) = update(state.clone(), &batch).unwrap();
        let (b, loss_b) = update(state.clone(), &batch).unwrap();
        assert_eq!(loss_a, loss_b);
        assert_eq!(a.step, 1);
        assert_eq!(a.params.lstm.w_hh.as_vec(), b.params.lstm.w_hh.as_vec());
        assert_eq!(a.params.head.bias.as_vec(), b.params.head.bias.as_vec());

        // the input state is untouched
        assert_eq!(state.step, 0);
        assert_ne!(a.params.lstm.w_ih.as_vec(), state.params.lstm.w_ih.as_vec());
    }

    #[test]
    fn test_update_reports_loss_before_step() {
        let cfg = small();
        let state = TrainState::init(PrngKey::new(0), &cfg).unwrap();
        let batch = generate_batch(PrngKey::new(1), &cfg.batch).unwrap();
        let expected = mse_loss(state.apply(batch.x.clone()).unwrap(), batch.y.clone())
            .item()
            .unwrap();
        let (_, loss) = update(state, &batch).unwrap();
        assert_eq!(loss, expected);
    }

    #[test]
    fn test_non_finite_loss() {
        let cfg = small();
        let mut state = TrainState::init(PrngKey::new(0), &cfg).unwrap();
        state.params.head.bias = Tensor::from_vec(vec![f32::NAN], [1]);
        let batch = generate_batch(PrngKey::new(1), &cfg.batch).unwrap();
        assert_eq!(update(state, &batch).unwrap_err(), Error::NonFiniteLoss);
    }

    #[test]
    fn test_report_schedule() {
        let cfg = small();
        let state = TrainState::init(PrngKey::new(0), &cfg).unwrap();
        let (state, reports) = train(state, PrngKey::new(0), &cfg.batch, 7, 3).unwrap();
        assert_eq!(state.step, 7);
        let epochs: Vec<usize> = reports.iter().map(|p| p.epoch).collect();
        assert_eq!(epochs, vec![0, 3, 6]);
        assert!(reports.iter().all(|p| p.avg_loss.is_finite()));

        let (_, none) = train(state, PrngKey::new(0), &cfg.batch, 2, 0).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_report_averages_recent_window() {
        let cfg = small();
        let init = TrainState::init(PrngKey::new(0), &cfg).unwrap();
        let key = PrngKey::new(9);

        // replay the loop by hand
        let mut losses = Vec::new();
        let mut state = init.clone();
        let mut k = key;
        for _ in 0..5 {
            (_, k) = k.split();
            let (next, loss) = update(state, &generate_batch(k, &cfg.batch).unwrap()).unwrap();
            state = next;
            losses.push(loss);
        }

        let (_, reports) = train(init, key, &cfg.batch, 5, 2).unwrap();
        assert_eq!(reports[0].avg_loss, losses[0]);
        assert_eq!(reports[1].avg_loss, (losses[1] + losses[2]) / 2.0);
        assert_eq!(reports[2].avg_loss, (losses[3] + losses[4]) / 2.0);
    }
}
