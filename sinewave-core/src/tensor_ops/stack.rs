use crate::{
    dtypes::Dtype,
    shapes::Shape,
    tensor::{Error, GhostTensor, Tape, Tensor},
};

/// Stack an array or vec of tensors together along a new dimension.
pub trait TryStack<E>: Sized {
    type Output;

    /// Stack an array or vec of tensors together along a new dimension
    /// inserted at `axis`.
    ///
    /// ```rust
    /// # use sinewave_core::prelude::*;
    /// let a: Tensor<f32> = Tensor::from_vec(vec![1.0, 2.0], [2]);
    /// let b: Tensor<f32> = Tensor::from_vec(vec![3.0, 4.0], [2]);
    /// let c = vec![a.clone(), b.clone()].stack_along(0);
    /// assert_eq!(c.shape(), &Shape::from([2, 2]));
    /// assert_eq!(c.as_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    /// let d = vec![a, b].stack_along(1);
    /// assert_eq!(d.as_vec(), vec![1.0, 3.0, 2.0, 4.0]);
    /// ```
    fn stack_along(self, axis: usize) -> Self::Output {
        self.try_stack_along(axis).unwrap()
    }

    /// Fallible version of [TryStack::stack_along]
    fn try_stack_along(self, axis: usize) -> Result<Self::Output, Error>;
}

impl<E: Dtype, T: Tape<E>> TryStack<E> for Vec<Tensor<E, T>> {
    type Output = Tensor<E, T>;

    fn try_stack_along(self, axis: usize) -> Result<Self::Output, Error> {
        let first_shape = match self.first() {
            Some(t) => t.shape.clone(),
            None => return Err(Error::Empty { op: "stack" }),
        };
        if axis > first_shape.rank() {
            return Err(Error::IndexOutOfBounds {
                op: "stack",
                index: axis,
                len: first_shape.rank() + 1,
            });
        }
        for t in self.iter().skip(1) {
            if t.shape != first_shape {
                return Err(Error::ShapeMismatch {
                    op: "stack",
                    expected: first_shape,
                    found: t.shape.clone(),
                });
            }
        }

        let count = self.len();
        let outer: usize = first_shape.dims()[..axis].iter().product();
        let inner: usize = first_shape.dims()[axis..].iter().product();
        let mut dims = first_shape.dims().to_vec();
        dims.insert(axis, count);

        let mut tape = T::default();
        let mut items: Vec<Tensor<E>> = Vec::with_capacity(count);
        for t in self {
            let (t, t_tape) = t.split_tape();
            tape = tape.merge(t_tape);
            items.push(t);
        }

        let mut data = Vec::with_capacity(outer * count * inner);
        for o in 0..outer {
            for item in items.iter() {
                data.extend_from_slice(&item.data[o * inner..(o + 1) * inner]);
            }
        }
        let out = Tensor::from_parts(data, Shape::from(dims));
        let ghosts: Vec<GhostTensor> = items.iter().map(|t| t.ghost()).collect();
        drop(items);
        let out_ghost = out.ghost();

        tape.add_backward_op(move |grads| {
            for g in ghosts.iter() {
                grads.alloc_for(g);
            }
            grads.with_grad_out(&out_ghost, |grads, grad_out| {
                for o in 0..outer {
                    for (i, g) in ghosts.iter().enumerate() {
                        let src = (o * count + i) * inner;
                        let grad_item = &mut grads.get_mut(g)[o * inner..(o + 1) * inner];
                        for (gi, go) in grad_item.iter_mut().zip(&grad_out[src..src + inner]) {
                            *gi += *go;
                        }
                    }
                }
                Ok(())
            })
        });
        Ok(out.put_tape(tape))
    }
}
