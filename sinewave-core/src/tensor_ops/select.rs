use crate::{
    dtypes::Dtype,
    tensor::{Error, Tape, Tensor},
};

impl<E: Dtype, T: Tape<E>> Tensor<E, T> {
    /// Picks `index` along `axis`, removing that axis from the shape.
    ///
    /// ```rust
    /// # use sinewave_core::prelude::*;
    /// let t: Tensor<f32> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]);
    /// assert_eq!(t.clone().select(1, 2).as_vec(), vec![3.0, 6.0]);
    /// assert_eq!(t.select(0, 1).as_vec(), vec![4.0, 5.0, 6.0]);
    /// ```
    pub fn try_select(self, axis: usize, index: usize) -> Result<Self, Error> {
        if axis >= self.shape.rank() {
            return Err(Error::IndexOutOfBounds {
                op: "select",
                index: axis,
                len: self.shape.rank(),
            });
        }
        let (outer, len, inner) = self.shape.split_at_axis(axis);
        if index >= len {
            return Err(Error::IndexOutOfBounds {
                op: "select",
                index,
                len,
            });
        }

        let mut dims = self.shape.dims().to_vec();
        dims.remove(axis);

        let (inp, mut tape) = self.split_tape();
        let mut data = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            let start = (o * len + index) * inner;
            data.extend_from_slice(&inp.data[start..start + inner]);
        }
        let out = Tensor::from_parts(data, dims.into());
        let inp = inp.ghost();
        let out_ghost = out.ghost();

        tape.add_backward_op(move |grads| {
            grads.alloc_for(&inp);
            grads.with_grad_out(&out_ghost, |grads, grad_out| {
                let grad_inp = grads.get_mut(&inp);
                for (o, go) in grad_out.chunks_exact(inner.max(1)).enumerate() {
                    let start = (o * len + index) * inner;
                    for (gi, g) in grad_inp[start..start + inner].iter_mut().zip(go) {
                        *gi += *g;
                    }
                }
                Ok(())
            })
        });
        Ok(out.put_tape(tape))
    }

    /// See [Tensor::try_select].
    pub fn select(self, axis: usize, index: usize) -> Self {
        self.try_select(axis, index).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use crate::{shapes::Shape, tensor::*, tests::*};

    #[test]
    fn test_select_middle_axis() {
        let t: Tensor<TestDtype> = Tensor::from_vec((0..12).map(|i| i as TestDtype).collect(), [2, 3, 2]);
        let r = t.leaky_trace().select(1, 1);
        assert_eq!(r.shape(), &Shape::from([2, 2]));
        assert_eq!(r.as_vec(), vec![2.0, 3.0, 8.0, 9.0]);

        let g = r.mean().backward();
        assert_close!(
            g.get(&t).as_vec(),
            vec![0.0, 0.0, 0.25, 0.25, 0.0, 0.0, 0.0, 0.0, 0.25, 0.25, 0.0, 0.0]
        );
    }

    #[test]
    fn test_select_out_of_bounds() {
        let t: Tensor<TestDtype> = Tensor::zeros([2, 3]);
        assert_eq!(
            t.clone().try_select(1, 3).unwrap_err(),
            Error::IndexOutOfBounds {
                op: "select",
                index: 3,
                len: 3
            }
        );
        assert!(t.try_select(2, 0).is_err());
    }
}
