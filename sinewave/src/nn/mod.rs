//! Layers of the sequence model. Each layer owns its parameters as plain
//! tensors and retapes them onto the input's tape in `try_forward`.

mod init;
mod linear;
mod lstm;

pub use init::{lecun_normal, orthogonal};
pub use linear::Linear;
pub use lstm::Lstm;
