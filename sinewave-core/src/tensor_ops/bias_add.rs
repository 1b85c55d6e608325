use crate::{
    dtypes::Dtype,
    shapes::Shape,
    tensor::{Error, Merge, Tape, Tensor},
};

impl<E: Dtype, LTape: Tape<E>> Tensor<E, LTape> {
    /// Adds a `(n,)` bias to every row of a `(..., n)` tensor.
    ///
    /// ```rust
    /// # use sinewave_core::prelude::*;
    /// let x: Tensor<f32> = Tensor::zeros([2, 3]);
    /// let b: Tensor<f32> = Tensor::from_vec(vec![1.0, 2.0, 3.0], [3]);
    /// assert_eq!(x.bias_add(b).as_vec(), vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
    /// ```
    pub fn try_bias_add<RTape>(self, bias: Tensor<E, RTape>) -> Result<Self, Error>
    where
        LTape: Merge<RTape>,
    {
        let n = match self.shape.dims().last() {
            Some(&n) => n,
            None => {
                return Err(Error::RankMismatch {
                    op: "bias_add",
                    expected: 1,
                    found: 0,
                })
            }
        };
        if bias.shape.dims() != [n] {
            return Err(Error::ShapeMismatch {
                op: "bias_add",
                expected: Shape::from([n]),
                found: bias.shape,
            });
        }

        let (inp, ltape) = self.split_tape();
        let (bias, rtape) = bias.split_tape();
        let mut tape = ltape.merge(rtape);

        let data = inp
            .data
            .iter()
            .zip(bias.data.iter().cycle())
            .map(|(x, b)| *x + *b)
            .collect();
        let out = Tensor::from_parts(data, inp.shape.clone());
        let inp = inp.ghost();
        let bias = bias.ghost();
        let out_ghost = out.ghost();

        tape.add_backward_op(move |grads| {
            grads.alloc_for(&inp);
            grads.alloc_for(&bias);
            grads.with_grad_out(&out_ghost, |grads, grad_out| {
                for (gi, go) in grads.get_mut(&inp).iter_mut().zip(grad_out) {
                    *gi += *go;
                }
                let grad_bias = grads.get_mut(&bias);
                for row in grad_out.chunks_exact(n.max(1)) {
                    for (gb, go) in grad_bias.iter_mut().zip(row) {
                        *gb += *go;
                    }
                }
                Ok(())
            })
        });
        Ok(out.put_tape(tape))
    }

    /// See [Tensor::try_bias_add].
    pub fn bias_add<RTape>(self, bias: Tensor<E, RTape>) -> Self
    where
        LTape: Merge<RTape>,
    {
        self.try_bias_add(bias).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn test_bias_add_broadcasts_rows() {
        let x: Tensor<TestDtype> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [3, 2]);
        let b: Tensor<TestDtype> = Tensor::from_vec(vec![0.5, -1.0], [2]);
        let r = x.leaky_trace().bias_add(b.leaky_trace());
        assert_close!(r.as_vec(), vec![1.5, 1.0, 3.5, 3.0, 5.5, 5.0]);

        let g = r.square().mean().backward();
        assert_close!(
            g.get(&x).as_vec(),
            vec![0.5, 1.0 / 3.0, 7.0 / 6.0, 1.0, 11.0 / 6.0, 5.0 / 3.0]
        );
        assert_close!(g.get(&b).as_vec(), vec![3.5, 3.0]);
    }

    #[test]
    fn test_bias_add_wrong_len() {
        let x: Tensor<TestDtype> = Tensor::zeros([3, 2]);
        let b: Tensor<TestDtype> = Tensor::zeros([3]);
        assert_eq!(
            x.try_bias_add(b).unwrap_err(),
            Error::ShapeMismatch {
                op: "bias_add",
                expected: Shape::from([2]),
                found: Shape::from([3]),
            }
        );
    }
}
