//! Run constants. There are no flags or config files; [TrainConfig::default]
//! is the program's configuration.

use sinewave_core::optim::AdamConfig;

/// Shape and value range of generated batches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchConfig {
    /// Width of the x interval covered by one sequence. Defaults to `2π`.
    pub x_range: f64,

    /// Sequences per batch. Defaults to `64`.
    pub batch_size: usize,

    /// Points per sequence. Defaults to `20`.
    pub time_window: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            x_range: 2.0 * std::f64::consts::PI,
            batch_size: 64,
            time_window: 20,
        }
    }
}

/// Everything a training run needs.
#[derive(Debug, Clone, Copy)]
pub struct TrainConfig {
    /// Seed of the root [crate::prng::PrngKey]. Defaults to `0`.
    pub seed: u64,

    pub batch: BatchConfig,

    /// Number of update steps. Defaults to `10_000`.
    pub epochs: usize,

    /// Hidden width of the LSTM cell. Defaults to `128`.
    pub hidden: usize,

    /// Optimizer settings. Defaults to Adam with a learning rate of `1e-3`.
    pub adam: AdamConfig,

    /// Epochs between progress reports. Defaults to `1000`.
    pub report_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            batch: Default::default(),
            epochs: 10_000,
            hidden: 128,
            adam: AdamConfig {
                lr: 1e-3,
                ..Default::default()
            },
            report_every: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.seed, 0);
        assert_eq!(cfg.batch.batch_size, 64);
        assert_eq!(cfg.batch.time_window, 20);
        assert_eq!(cfg.batch.x_range, 2.0 * std::f64::consts::PI);
        assert_eq!(cfg.epochs, 10_000);
        assert_eq!(cfg.hidden, 128);
        assert_eq!(cfg.adam.lr, 1e-3);
        assert_eq!(cfg.adam.betas, [0.9, 0.999]);
        assert_eq!(cfg.report_every, 1000);
    }
}
