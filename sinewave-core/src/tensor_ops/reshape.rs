use crate::{
    dtypes::Dtype,
    shapes::Shape,
    tensor::{unique_id, Error, NoneTape, Tape, Tensor},
};

impl<E: Dtype, T: Tape<E>> Tensor<E, T> {
    /// Changes the shape of the tensor without moving any data. The number of
    /// elements must stay the same.
    ///
    /// ```rust
    /// # use sinewave_core::prelude::*;
    /// let t: Tensor<f32> = Tensor::zeros([2, 3, 4]);
    /// assert_eq!(t.reshape([6, 4]).shape(), &Shape::from([6, 4]));
    /// ```
    pub fn try_reshape(self, shape: impl Into<Shape>) -> Result<Self, Error> {
        let shape = shape.into();
        if shape.num_elements() != self.shape.num_elements() {
            return Err(Error::ShapeMismatch {
                op: "reshape",
                expected: self.shape,
                found: shape,
            });
        }
        let (inp, mut tape) = self.split_tape();
        let out = Tensor {
            id: unique_id(),
            data: inp.data.clone(),
            shape,
            tape: NoneTape,
        };
        let inp = inp.ghost();
        let out_ghost = out.ghost();
        tape.add_backward_op(move |grads| {
            grads.alloc_for(&inp);
            grads.with_grad_out(&out_ghost, |grads, grad_out| {
                for (gi, go) in grads.get_mut(&inp).iter_mut().zip(grad_out) {
                    *gi += *go;
                }
                Ok(())
            })
        });
        Ok(out.put_tape(tape))
    }

    /// See [Tensor::try_reshape].
    pub fn reshape(self, shape: impl Into<Shape>) -> Self {
        self.try_reshape(shape).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn test_reshape_shares_data() {
        let a: Tensor<TestDtype> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]);
        let b = a.clone().reshape([3, 2]);
        assert_eq!(b.shape(), &Shape::from([3, 2]));
        assert_eq!(b.as_vec(), a.as_vec());
        assert_ne!(b.id(), a.id());
    }

    #[test]
    fn test_reshape_backward() {
        let a: Tensor<TestDtype> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], [2, 2]);
        let g = a.leaky_trace().reshape([4]).square().mean().backward();
        assert_close!(g.get(&a).as_vec(), vec![0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_reshape_wrong_num_elements() {
        let a: Tensor<TestDtype> = Tensor::zeros([2, 3]);
        assert_eq!(
            a.try_reshape([4, 2]).unwrap_err(),
            Error::ShapeMismatch {
                op: "reshape",
                expected: Shape::from([2, 3]),
                found: Shape::from([4, 2]),
            }
        );
    }
}
