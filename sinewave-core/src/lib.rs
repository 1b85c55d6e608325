//! # sinewave-core
//!
//! A small reverse-mode tensor engine: heap allocated tensors with runtime
//! shapes, gradient tapes, the handful of operations a recurrent network
//! needs, and an Adam optimizer.
//!
//! # Tensors & tapes
//!
//! *See [tensor] for more information.*
//!
//! A [`tensor::Tensor`] is an nd-array plus a *tape* type parameter. The tape
//! decides whether operations on the tensor are recorded for backprop:
//! 1. [`tensor::NoneTape`] - nothing is recorded (the default)
//! 2. [`tensor::OwnedTape`] - every operation pushes a backward closure
//!
//! ```rust
//! # use sinewave_core::prelude::*;
//! let x: Tensor<f32> = Tensor::from_vec(vec![1.0, 2.0, 3.0], [3]);
//! let loss = x.leaky_trace().square().mean();
//! let grads = loss.backward();
//! assert_eq!(grads.get(&x).as_vec(), vec![2.0 / 3.0, 4.0 / 3.0, 2.0]);
//! ```
//!
//! Operations take their inputs by value so that tapes can be moved from
//! input to output. When a traced tensor is needed twice, use
//! [`tensor::Tensor::with_empty_tape`] for one of the uses; the two tapes are
//! merged again when the branches meet.
//!
//! # Modules & optimizers
//!
//! *See [nn_traits] and [optim].*
//!
//! Parameters are plain [`tensor::Tensor`]s without a tape. In a forward pass
//! they are [retaped](tensor::Tensor::retaped) onto the input's tape type so
//! their gradients end up in the [`tensor::Gradients`] returned by
//! `backward()`. Optimizers then walk a module's parameters through
//! [`nn_traits::UpdateParams`].

pub mod dtypes;
pub mod losses;
pub mod nn_traits;
pub mod optim;
pub mod shapes;
pub mod tensor;
pub mod tensor_ops;

/// Contains subset of all public exports.
pub mod prelude {
    pub use crate::dtypes::Dtype;
    pub use crate::losses::*;
    pub use crate::nn_traits::*;
    pub use crate::optim::*;
    pub use crate::shapes::*;
    pub use crate::tensor::*;
    pub use crate::tensor_ops::*;
}
