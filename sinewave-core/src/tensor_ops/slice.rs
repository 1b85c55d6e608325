use std::ops::Range;

use crate::{
    dtypes::Dtype,
    shapes::Shape,
    tensor::{Error, Tape, Tensor},
};

impl<E: Dtype, T: Tape<E>> Tensor<E, T> {
    /// Keeps only the columns in `range` of the last axis.
    ///
    /// ```rust
    /// # use sinewave_core::prelude::*;
    /// let t: Tensor<f32> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]);
    /// assert_eq!(t.slice_last(1..3).as_vec(), vec![2.0, 3.0, 5.0, 6.0]);
    /// ```
    pub fn try_slice_last(self, range: Range<usize>) -> Result<Self, Error> {
        let rank = self.shape.rank();
        if rank == 0 {
            return Err(Error::RankMismatch {
                op: "slice_last",
                expected: 1,
                found: 0,
            });
        }
        let n = self.shape.dim(rank - 1);
        if range.start > range.end || range.end > n {
            return Err(Error::IndexOutOfBounds {
                op: "slice_last",
                index: range.end.max(range.start),
                len: n,
            });
        }
        let width = range.end - range.start;
        let mut dims = self.shape.dims().to_vec();
        dims[rank - 1] = width;
        let shape = Shape::from(dims);

        let (inp, mut tape) = self.split_tape();
        let rows = if n == 0 { 0 } else { inp.data.len() / n };
        let mut data = Vec::with_capacity(rows * width);
        for row in inp.data.chunks_exact(n.max(1)).take(rows) {
            data.extend_from_slice(&row[range.clone()]);
        }
        let out = Tensor::from_parts(data, shape);
        let inp = inp.ghost();
        let out_ghost = out.ghost();

        tape.add_backward_op(move |grads| {
            grads.alloc_for(&inp);
            grads.with_grad_out(&out_ghost, |grads, grad_out| {
                let grad_inp = grads.get_mut(&inp);
                for (r, go) in grad_out.chunks_exact(width.max(1)).enumerate().take(rows) {
                    let start = r * n + range.start;
                    for (gi, g) in grad_inp[start..start + width].iter_mut().zip(go) {
                        *gi += *g;
                    }
                }
                Ok(())
            })
        });
        Ok(out.put_tape(tape))
    }

    /// See [Tensor::try_slice_last].
    pub fn slice_last(self, range: Range<usize>) -> Self {
        self.try_slice_last(range).unwrap()
    }
}
