//! Operations on tensors like [Tensor::try_matmul], [Tensor::try_sigmoid],
//! [Tensor::try_mean], etc.
//!
//! Every operation has a fallible `try_*` method and a panicking
//! counterpart without the prefix. Operations consume their inputs and move
//! the (merged) tapes into the output:
//!
//! ```rust
//! # use sinewave_core::prelude::*;
//! let a: Tensor<f32> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], [2, 2]);
//! let b: Tensor<f32> = Tensor::ones([2, 1]);
//! let c = a.leaky_trace().matmul(b.clone());
//! assert_eq!(c.as_vec(), vec![3.0, 7.0]);
//! ```
//!
//! Element wise operations (`+`, `-`, `*`) need operands of the same shape;
//! there is no implicit broadcasting. Row-wise broadcasting of a bias is
//! available through [Tensor::try_bias_add].
//!
//! [Tensor::try_matmul]: crate::tensor::Tensor::try_matmul
//! [Tensor::try_sigmoid]: crate::tensor::Tensor::try_sigmoid
//! [Tensor::try_mean]: crate::tensor::Tensor::try_mean
//! [Tensor::try_bias_add]: crate::tensor::Tensor::try_bias_add

mod add;
mod bias_add;
mod matmul;
mod mean;
mod mul;
mod reshape;
mod select;
mod sigmoid;
mod slice;
mod square;
mod stack;
mod sub;
mod tanh;
mod utilities;

pub use stack::TryStack;
pub use utilities::{BinaryDerivative, UnaryDerivative};
