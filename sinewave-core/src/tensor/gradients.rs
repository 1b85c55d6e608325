//! Implementations of [OwnedTape], [NoneTape], and generic Nd array containers via [Gradients].
#![allow(clippy::type_complexity)]

use std::collections::BTreeMap;

use super::{unique_id, Error, Tensor, Tensorlike, UniqueId};
use crate::dtypes::Dtype;

/// A generic container for keeping gradients of tensors keyed by the
/// tensor's [UniqueId].
///
/// You can:
/// 1. Insert array values into it
/// 2. Access references to arrays
/// 3. Access mutable references to arrays
///
/// Optimizers reuse this container for their per-parameter state (e.g.
/// moment estimates), which is why it is [Clone].
#[derive(Clone, Debug)]
pub struct Gradients<E> {
    gradient_by_id: BTreeMap<UniqueId, Vec<E>>,
}

impl<E> Gradients<E> {
    /// Creates an empty [Gradients] object. Nothing is ever dropped from it,
    /// so gradients of temporary tensors are kept as well.
    pub fn leaky() -> Self {
        Self {
            gradient_by_id: Default::default(),
        }
    }

    /// Number of tensors that have a gradient.
    pub fn len(&self) -> usize {
        self.gradient_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradient_by_id.is_empty()
    }
}

impl<E: Dtype> Gradients<E> {
    /// Retrieves mutable gradient for `t`, allocating one if it isn't present.
    pub fn get_or_alloc_mut(&mut self, t: &impl Tensorlike) -> &mut Vec<E> {
        self.alloc_for(t);
        self.get_mut(t)
    }

    /// Inserts a zeroed gradient for `t` if there isn't one yet.
    pub fn alloc_for(&mut self, t: &impl Tensorlike) {
        self.gradient_by_id
            .entry(t.id())
            .or_insert_with(|| vec![E::zero(); t.num_elements()]);
    }

    /// Returns a reference to the underlying gradient if found.
    pub fn get_ref_checked(&self, t: &impl Tensorlike) -> Option<&Vec<E>> {
        self.gradient_by_id.get(&t.id())
    }

    /// Returns a mutable reference to the data associated with `t`.
    ///
    /// **Panics** if data associated with `t` is not found. This indicates an unrecoverable bug.
    pub fn get_mut(&mut self, t: &impl Tensorlike) -> &mut Vec<E> {
        self.gradient_by_id.get_mut(&t.id()).unwrap()
    }

    /// Returns an immutable reference to the data associated with `t`.
    ///
    /// **Panics** if data associated with `t` is not found. This indicates an unrecoverable bug.
    pub fn get_ref(&self, t: &impl Tensorlike) -> &Vec<E> {
        self.gradient_by_id.get(&t.id()).unwrap()
    }

    /// Clones the gradient and transforms it into a tensor.
    ///
    /// # Panics
    /// If no data is associated with `t` yet, this will panic due to an unwrap()
    /// on a .get() to the underlying map.
    pub fn get<T>(&self, t: &Tensor<E, T>) -> Tensor<E> {
        let buf = self.gradient_by_id.get(&t.id).unwrap().clone();
        Tensor {
            id: unique_id(),
            data: std::sync::Arc::new(buf),
            shape: t.shape.clone(),
            tape: Default::default(),
        }
    }

    /// Runs `f` with the gradient of `out` borrowed immutably while the rest of
    /// the container stays mutable. This is how backward operations read the
    /// gradient of their output and accumulate into their inputs.
    ///
    /// `out` must not be one of the tensors `f` accumulates into.
    pub(crate) fn with_grad_out<F>(&mut self, out: &impl Tensorlike, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self, &[E]) -> Result<(), Error>,
    {
        self.alloc_for(out);
        let grad_out = std::mem::take(self.get_mut(out));
        let result = f(self, &grad_out);
        *self.get_mut(out) = grad_out;
        result
    }
}

/// Contains a [Gradients] and list of backward operations.
pub struct OwnedTape<E> {
    /// A list of (Time, BackwardOp) pairs. The Time is used to ensure operations
    /// from merged tapes are executed in the correct order.
    pub(crate) operations: Vec<(UniqueId, BackwardOp<E>)>,
    pub(crate) gradients: Gradients<E>,
}

impl<E> Default for OwnedTape<E> {
    fn default() -> Self {
        Self {
            operations: Default::default(),
            gradients: Gradients::leaky(),
        }
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for OwnedTape<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedTape")
            .field("num_operations", &self.operations.len())
            .field("gradients", &self.gradients)
            .finish()
    }
}

impl<E> OwnedTape<E> {
    /// Compute the [Gradients]! This just runs all the operations on a new [Gradients] struct.
    pub(crate) fn execute(mut self) -> Result<Gradients<E>, Error> {
        // Operations must run in reverse creation order. Merged tapes
        // interleave, so sort by the time each op was recorded.
        self.operations.sort_by_key(|(k, _)| *k);
        self.operations.dedup_by_key(|(k, _)| *k);
        for (_, operation) in self.operations.drain(..).rev() {
            (operation)(&mut self.gradients)?;
        }
        Ok(self.gradients)
    }
}

type BackwardOp<E> = Box<dyn FnOnce(&mut Gradients<E>) -> Result<(), Error>>;

/// Contains nothing. When [Tape::add_backward_op] is called, this struct does nothing.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoneTape;

/// Something that can track backward operations.
pub trait Tape<E>: Default + Merge<Self> + Merge<NoneTape> {
    fn add_backward_op<F>(&mut self, operation: F)
    where
        F: 'static + FnOnce(&mut Gradients<E>) -> Result<(), Error>;
}

impl<E> Tape<E> for OwnedTape<E> {
    fn add_backward_op<F>(&mut self, operation: F)
    where
        F: 'static + FnOnce(&mut Gradients<E>) -> Result<(), Error>,
    {
        self.operations.push((unique_id(), Box::new(operation)));
    }
}

impl<E> Tape<E> for NoneTape {
    fn add_backward_op<F>(&mut self, _: F)
    where
        F: 'static + FnOnce(&mut Gradients<E>) -> Result<(), Error>,
    {
    }
}

/// Combine two things
pub trait Merge<T: ?Sized> {
    /// Merges `T` into `self`
    fn merge(self, other: T) -> Self;
}

impl Merge<NoneTape> for NoneTape {
    fn merge(self, _: NoneTape) -> Self {
        self
    }
}

impl<E> Merge<NoneTape> for OwnedTape<E> {
    fn merge(self, _: NoneTape) -> Self {
        self
    }
}

impl<E> Merge<OwnedTape<E>> for OwnedTape<E> {
    fn merge(mut self, mut other: Self) -> Self {
        self.gradients
            .gradient_by_id
            .append(&mut other.gradients.gradient_by_id);
        self.operations.append(&mut other.operations);
        self
    }
}
