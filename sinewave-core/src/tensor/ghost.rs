use super::{Tensor, UniqueId};
use crate::shapes::Shape;

/// Holds all the information a [Tensor] does, except without
/// holding a reference to the data storage.
///
/// Backward operations capture these for tensors whose values they don't
/// need, so the data can be dropped as soon as the forward pass is done
/// with it.
#[derive(Clone, Debug)]
pub struct GhostTensor {
    pub(crate) id: UniqueId,
    pub(crate) shape: Shape,
}

impl<E, T> Tensor<E, T> {
    /// Creates a ghost tensor that doesn't hold a reference
    /// to the tensor's data.
    pub fn ghost(&self) -> GhostTensor {
        GhostTensor {
            id: self.id,
            shape: self.shape.clone(),
        }
    }
}

/// Anything gradients can be allocated for.
pub trait Tensorlike {
    fn id(&self) -> UniqueId;
    fn shape(&self) -> &Shape;
    fn num_elements(&self) -> usize {
        self.shape().num_elements()
    }
}

impl Tensorlike for GhostTensor {
    fn id(&self) -> UniqueId {
        self.id
    }
    fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl<E, T> Tensorlike for Tensor<E, T> {
    fn id(&self) -> UniqueId {
        self.id
    }
    fn shape(&self) -> &Shape {
        &self.shape
    }
}
