//! Synthetic sine-wave batches.

use rand_distr::{Distribution, Uniform};
use sinewave_core::{shapes::Shape, tensor::Error, tensor::Tensor};

use crate::{config::BatchConfig, prng::PrngKey};

/// Paired inputs and targets, both of shape `(batch, time_window, 1)`.
#[derive(Debug, Clone)]
pub struct Batch {
    pub x: Tensor<f32>,
    pub y: Tensor<f32>,
}

impl Batch {
    /// The first sequence as a batch of one, shape `(1, time_window, 1)`.
    pub fn first(&self) -> Result<Batch, Error> {
        let dims = self.x.shape().dims();
        if dims.len() != 3 {
            return Err(Error::RankMismatch {
                op: "first",
                expected: 3,
                found: dims.len(),
            });
        }
        let shape = Shape::from([1, dims[1], dims[2]]);
        let n = shape.num_elements();
        if dims[0] == 0 {
            return Err(Error::Empty { op: "first" });
        }
        Ok(Batch {
            x: Tensor::try_from_vec(self.x.data()[..n].to_vec(), shape.clone())?,
            y: Tensor::try_from_vec(self.y.data()[..n].to_vec(), shape)?,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.x.shape().dim(0)
    }
}

/// `num` evenly spaced points from `start` to `stop`, both included.
pub fn linspace(start: f64, stop: f64, num: usize) -> impl Iterator<Item = f64> {
    let step = if num > 1 {
        (stop - start) / (num - 1) as f64
    } else {
        0.0
    };
    (0..num).map(move |i| {
        if num > 1 && i == num - 1 {
            stop
        } else {
            start + step * i as f64
        }
    })
}

/// Draws one batch.
///
/// Every sequence starts at its own integer phase `k` with
/// `0 <= k < cfg.x_range` and covers `[k, k + x_range]` with
/// `cfg.time_window` evenly spaced points. Targets are the sine of the stored
/// inputs, so `y[i] == x[i].sin()` holds exactly.
///
/// Fails with [Error::Empty] if the batch size or time window is zero.
pub fn generate_batch(key: PrngKey, cfg: &BatchConfig) -> Result<Batch, Error> {
    if cfg.batch_size == 0 || cfg.time_window == 0 {
        return Err(Error::Empty {
            op: "generate_batch",
        });
    }
    let num_phases = (cfg.x_range.ceil() as i64).max(1);
    let phases = Uniform::new(0, num_phases);
    let mut rng = key.rng();

    let shape = Shape::from([cfg.batch_size, cfg.time_window, 1]);
    let mut x = Vec::with_capacity(shape.num_elements());
    for _ in 0..cfg.batch_size {
        let phase = phases.sample(&mut rng) as f64;
        x.extend(linspace(phase, phase + cfg.x_range, cfg.time_window).map(|v| v as f32));
    }
    let y = x.iter().map(|v| v.sin()).collect();

    Ok(Batch {
        x: Tensor::try_from_vec(x, shape.clone())?,
        y: Tensor::try_from_vec(y, shape)?,
    })
}
