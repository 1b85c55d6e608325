//! The [Tensor] struct, [Gradients] container and tape types.
//!
//! # Creating tensors
//!
//! All data lives on the heap in a reference counted [Vec], so cloning a
//! tensor is cheap and never copies data. Tensors can be created with:
//! - [Tensor::try_from_vec] / [Tensor::from_vec] for explicit values
//! - [Tensor::zeros], [Tensor::ones] and [Tensor::full]
//! - [Tensor::try_sample] to draw every element from a distribution
//!
//! # Tracing gradients
//!
//! Use [Tensor::leaky_trace] to start recording
//! operations. The resulting tensor carries an [OwnedTape]; calling
//! [Tensor::backward] on a single-element result replays the tape in
//! reverse and returns the [Gradients] of every tensor involved.
//!
//! ```rust
//! # use sinewave_core::prelude::*;
//! let w: Tensor<f32> = Tensor::from_vec(vec![1.0, -1.0], [2]);
//! let x: Tensor<f32> = Tensor::from_vec(vec![3.0, 4.0], [2]);
//! let loss = (w.leaky_trace() * x.clone()).mean();
//! let grads = loss.backward();
//! assert_eq!(grads.get(&w).as_vec(), vec![1.5, 2.0]);
//! ```

mod error;
mod ghost;
mod gradients;
mod tensor_impl;
mod unique_id;

pub use error::Error;
pub use ghost::{GhostTensor, Tensorlike};
pub use gradients::{Gradients, Merge, NoneTape, OwnedTape, Tape};
pub use tensor_impl::Tensor;
pub use unique_id::UniqueId;

pub(crate) use unique_id::unique_id;
