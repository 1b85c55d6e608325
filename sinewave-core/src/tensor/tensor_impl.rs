use std::sync::Arc;

use rand::Rng;
use rand_distr::Distribution;

use super::{unique_id, Error, Gradients, NoneTape, OwnedTape, Tape, UniqueId};
use crate::{dtypes::Dtype, shapes::Shape};

/// The single tensor struct that stores nd arrays and tapes.
///
/// Generics:
/// 1. `E` - the element type, see [Dtype]
/// 2. `T` - the tape, [NoneTape] or [OwnedTape]
///
/// The data is stored contiguously in row-major order behind an [Arc]; two
/// tensors that share an [UniqueId] also share their gradient.
#[derive(Debug, Clone)]
pub struct Tensor<E, T = NoneTape> {
    pub(crate) id: UniqueId,
    pub(crate) data: Arc<Vec<E>>,
    pub(crate) shape: Shape,
    pub(crate) tape: T,
}

impl<E, T> Tensor<E, T> {
    pub fn id(&self) -> UniqueId {
        self.id
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The underlying row-major data.
    pub fn data(&self) -> &[E] {
        &self.data
    }

    /// Removes whatever tape the tensor has and returns itself without a tape.
    pub fn split_tape(self) -> (Tensor<E, NoneTape>, T) {
        (
            Tensor {
                id: self.id,
                data: self.data,
                shape: self.shape,
                tape: NoneTape,
            },
            self.tape,
        )
    }

    /// Clones self and inserts a new empty tape into the clone.
    pub fn with_empty_tape(&self) -> Self
    where
        T: Default,
    {
        Self {
            id: self.id,
            data: self.data.clone(),
            shape: self.shape.clone(),
            tape: Default::default(),
        }
    }

    /// Clones the tensor and puts a fresh tape of type `U` on the clone. This
    /// is how parameters join a traced forward pass.
    pub fn retaped<U: Default>(&self) -> Tensor<E, U> {
        Tensor {
            id: self.id,
            data: self.data.clone(),
            shape: self.shape.clone(),
            tape: Default::default(),
        }
    }
}

impl<E: Clone, T> Tensor<E, T> {
    /// Copies the data out into a [Vec].
    pub fn as_vec(&self) -> Vec<E> {
        self.data.as_ref().clone()
    }
}

impl<E: Dtype, T> Tensor<E, T> {
    /// The value of a tensor holding exactly one element.
    pub fn item(&self) -> Result<E, Error> {
        match self.data.as_slice() {
            [x] => Ok(*x),
            other => Err(Error::WrongNumElements {
                expected: 1,
                found: other.len(),
            }),
        }
    }
}

impl<E: Clone> Tensor<E, NoneTape> {
    /// Put a tape of type `T` into the tensor
    pub fn put_tape<T>(self, tape: T) -> Tensor<E, T> {
        Tensor {
            id: self.id,
            data: self.data,
            shape: self.shape,
            tape,
        }
    }

    /// Clones self and puts an empty [OwnedTape] into it.
    /// The resulting gradients are leaked: nothing is ever dropped from them.
    pub fn leaky_trace(&self) -> Tensor<E, OwnedTape<E>> {
        self.clone().put_tape(Default::default())
    }
}

impl<E: Dtype> Tensor<E, NoneTape> {
    /// Builds a tensor from row-major `data`. Fails if the number of elements
    /// doesn't match `shape`.
    pub fn try_from_vec(data: Vec<E>, shape: impl Into<Shape>) -> Result<Self, Error> {
        let shape = shape.into();
        if data.len() != shape.num_elements() {
            return Err(Error::WrongNumElements {
                expected: shape.num_elements(),
                found: data.len(),
            });
        }
        Ok(Self::from_parts(data, shape))
    }

    /// See [Tensor::try_from_vec].
    pub fn from_vec(data: Vec<E>, shape: impl Into<Shape>) -> Self {
        Self::try_from_vec(data, shape).unwrap()
    }

    /// Creates a tensor filled with `value`.
    pub fn full(shape: impl Into<Shape>, value: E) -> Self {
        let shape = shape.into();
        Self::from_parts(vec![value; shape.num_elements()], shape)
    }

    pub fn zeros(shape: impl Into<Shape>) -> Self {
        Self::full(shape, E::zero())
    }

    pub fn ones(shape: impl Into<Shape>) -> Self {
        Self::full(shape, E::one())
    }

    /// Creates a tensor whose elements are drawn independently from
    /// `distr`. Sampling happens in `f64` and is then rounded to `E`.
    pub fn try_sample<D, R>(shape: impl Into<Shape>, distr: D, rng: &mut R) -> Result<Self, Error>
    where
        D: Distribution<f64>,
        R: Rng + ?Sized,
    {
        let shape = shape.into();
        let data = distr
            .sample_iter(rng)
            .take(shape.num_elements())
            .map(E::from_f64_lossy)
            .collect();
        Self::try_from_vec(data, shape)
    }

    /// A new tensor with a fresh id. Callers guarantee `data` matches `shape`.
    pub(crate) fn from_parts(data: Vec<E>, shape: Shape) -> Self {
        debug_assert_eq!(data.len(), shape.num_elements());
        Self {
            id: unique_id(),
            data: Arc::new(data),
            shape,
            tape: NoneTape,
        }
    }
}

impl<E: Dtype> Tensor<E, OwnedTape<E>> {
    /// Runs backprop on every operation recorded in this tensor's tape.
    ///
    /// Only valid on tensors holding a single element, e.g. a loss.
    pub fn try_backward(self) -> Result<Gradients<E>, Error> {
        let num_elements = self.shape.num_elements();
        if num_elements != 1 {
            return Err(Error::WrongNumElements {
                expected: 1,
                found: num_elements,
            });
        }
        let (t, mut tape) = self.split_tape();
        let t = t.ghost();
        tape.add_backward_op(move |grads| {
            grads.get_or_alloc_mut(&t).fill(E::one());
            Ok(())
        });
        tape.execute()
    }

    /// See [Tensor::try_backward].
    pub fn backward(self) -> Gradients<E> {
        self.try_backward().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_from_vec_checks_num_elements() {
        let err = Tensor::<f32>::try_from_vec(vec![1.0, 2.0, 3.0], [2, 2]).unwrap_err();
        assert_eq!(
            err,
            Error::WrongNumElements {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let a: Tensor<f32> = Tensor::zeros([3]);
        let b: Tensor<f32> = Tensor::zeros([3]);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
        assert_eq!(a.leaky_trace().id(), a.id());
        assert_eq!(a.retaped::<OwnedTape<f32>>().id(), a.id());
    }

    #[test]
    fn test_leaky_trace_shares_storage() {
        let a: Tensor<f64> = Tensor::from_vec(vec![1.0, 2.0], [2]);
        let b = a.leaky_trace();
        assert!(Arc::ptr_eq(&a.data, &b.data));
        assert_eq!(b.shape(), a.shape());
        assert_eq!(b.tape.operations.len(), 0);
    }

    #[test]
    fn test_split_and_put_tape() {
        let a: Tensor<f32> = Tensor::ones([2]);
        let (b, tape) = a.leaky_trace().split_tape();
        assert_eq!(tape.operations.len(), 0);
        let c = b.put_tape(tape);
        assert_eq!(c.data(), &[1.0, 1.0]);
    }

    #[test]
    fn test_sample_is_deterministic() {
        let distr = rand_distr::Uniform::new(-1.0, 1.0);
        let a: Tensor<f32> =
            Tensor::try_sample([4, 5], distr, &mut StdRng::seed_from_u64(0)).unwrap();
        let b: Tensor<f32> =
            Tensor::try_sample([4, 5], distr, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(a.as_vec(), b.as_vec());
        assert!(a.data().iter().all(|x| (-1.0..1.0).contains(x)));
    }

    #[test]
    fn test_item() {
        let a: Tensor<f32> = Tensor::full(Shape::scalar(), 2.5);
        assert_eq!(a.item(), Ok(2.5));
        let b: Tensor<f32> = Tensor::zeros([2]);
        assert!(b.item().is_err());
    }

    #[test]
    fn test_backward_requires_one_element() {
        let a: Tensor<f32> = Tensor::zeros([2]);
        assert!(a.leaky_trace().try_backward().is_err());
    }

    #[test]
    fn test_backward_of_leaf_is_one() {
        let a: Tensor<f32> = Tensor::full([1], 3.0);
        let grads = a.leaky_trace().backward();
        assert_eq!(grads.get(&a).as_vec(), vec![1.0]);
    }
}
