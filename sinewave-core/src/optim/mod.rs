//! Optimizers that update a module's parameters from its [Gradients].
//!
//! Construct an optimizer from the module it will update, then call
//! [Optimizer::update] after every backward pass:
//!
//! ```rust
//! # use sinewave_core::prelude::*;
//! let mut w: Tensor<f32> = Tensor::ones([3]);
//! let mut opt = Adam::new(&w, AdamConfig::default());
//!
//! let loss = w.leaky_trace().square().mean();
//! let grads = loss.backward();
//! opt.update(&mut w, &grads).unwrap();
//! assert!(w.data().iter().all(|x| *x < 1.0));
//! ```
//!
//! [Gradients]: crate::tensor::Gradients
//! [Optimizer::update]: crate::nn_traits::Optimizer::update

mod adam;

pub use adam::{Adam, AdamConfig};

/// L2 and decoupled regularization methods
#[derive(Debug, Clone, Copy)]
pub enum WeightDecay {
    /// Weight decay applied to the gradients before any momentum updates. Equivalent to L2 regularization.
    L2(f64),

    /// Weight decay applied after any momentum updates, without modifying the gradients.
    /// See [Decoupled Weight Decay Regularization](https://arxiv.org/abs/1711.05101)
    Decoupled(f64),
}
