//! Trains a single-cell LSTM followed by a one-unit dense layer to follow a
//! sine wave that starts at a random integer phase.
//!
//! The pipeline is a straight line:
//! 1. [data::generate_batch] draws `(batch, time_window, 1)` inputs and their sines
//! 2. [train_state::TrainState::init] builds the parameters and the Adam state
//! 3. [train::train] runs [train::update] once per epoch and reports progress
//! 4. [eval::evaluate] scores the first element of a fresh batch
//! 5. [plot::show] draws label and prediction in the terminal
//!
//! All randomness flows through an explicit [prng::PrngKey], so a run is
//! fully determined by its seed.
//!
//! ```rust
//! # use sinewave::prelude::*;
//! let cfg = BatchConfig {
//!     batch_size: 4,
//!     time_window: 5,
//!     ..Default::default()
//! };
//! let batch = generate_batch(PrngKey::new(0), &cfg).unwrap();
//! assert_eq!(batch.x.shape(), &Shape::from([4, 5, 1]));
//! ```

pub mod config;
pub mod data;
pub mod eval;
pub mod model;
pub mod nn;
pub mod plot;
pub mod prng;
pub mod train;
pub mod train_state;

pub mod prelude {
    pub use crate::config::{BatchConfig, TrainConfig};
    pub use crate::data::{generate_batch, Batch};
    pub use crate::eval::{evaluate, Evaluation};
    pub use crate::model::SineLstm;
    pub use crate::nn::{Linear, Lstm};
    pub use crate::prng::PrngKey;
    pub use crate::train::{train, update, Progress};
    pub use crate::train_state::TrainState;
    pub use sinewave_core::prelude::*;
}
