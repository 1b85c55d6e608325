use super::UniqueId;
use crate::shapes::Shape;

/// Represents the different errors that can occur from creating tensors,
/// running tensor operations, or updating parameters.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The operands of `op` did not have the shapes it needs.
    ShapeMismatch {
        op: &'static str,
        expected: Shape,
        found: Shape,
    },
    /// `op` needs a tensor of a different rank.
    RankMismatch {
        op: &'static str,
        expected: usize,
        found: usize,
    },
    /// An axis or index was outside of the tensor.
    IndexOutOfBounds {
        op: &'static str,
        index: usize,
        len: usize,
    },
    /// `op` needs at least one element or input.
    Empty { op: &'static str },
    /// Not enough elements were provided when creating a tensor.
    WrongNumElements { expected: usize, found: usize },
    /// Some tensors were unused by an optimizer in a graph.
    UnusedTensors(Vec<UniqueId>),
    /// A loss came out as NaN or infinite.
    NonFiniteLoss,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShapeMismatch {
                op,
                expected,
                found,
            } => write!(f, "{op}: expected shape {expected}, found {found}"),
            Self::RankMismatch {
                op,
                expected,
                found,
            } => write!(f, "{op}: expected rank {expected}, found rank {found}"),
            Self::IndexOutOfBounds { op, index, len } => {
                write!(f, "{op}: index {index} is out of bounds for length {len}")
            }
            Self::Empty { op } => write!(f, "{op}: input is empty"),
            Self::WrongNumElements { expected, found } => {
                write!(f, "expected {expected} elements, found {found}")
            }
            Self::UnusedTensors(unused) => write!(f, "Unused tensors: {unused:?}"),
            Self::NonFiniteLoss => write!(f, "loss is not finite"),
        }
    }
}

impl std::error::Error for Error {}
