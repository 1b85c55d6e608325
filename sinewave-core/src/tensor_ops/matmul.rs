#![allow(clippy::needless_return)]

use crate::{
    dtypes::Dtype,
    shapes::Shape,
    tensor::{Error, Merge, Tape, Tensor},
};

#[allow(unused)]
#[allow(clippy::too_many_arguments)]
fn naive_gemm<E: Dtype>(
    (m, k, n): (usize, usize, usize),
    accum: bool,
    a: &[E],
    a_strides: [usize; 2],
    b: &[E],
    b_strides: [usize; 2],
    c: &mut [E],
    c_strides: [usize; 2],
) {
    for i_m in 0..m {
        for i_n in 0..n {
            let c_i = c_strides[0] * i_m + c_strides[1] * i_n;
            if !accum {
                c[c_i] = E::zero();
            }
            for i_k in 0..k {
                let a_v = a[a_strides[0] * i_m + a_strides[1] * i_k];
                let b_v = b[b_strides[0] * i_k + b_strides[1] * i_n];
                c[c_i] += a_v * b_v;
            }
        }
    }
}

/// `c = a @ b`, or `c += a @ b` when `accum` is set. Strides are in elements,
/// `[row stride, column stride]`, so transposes are just swapped strides.
#[allow(clippy::too_many_arguments)]
fn matmul<E: Dtype>(
    (m, k, n): (usize, usize, usize),
    accum: bool,
    a: &[E],
    a_strides: [usize; 2],
    b: &[E],
    b_strides: [usize; 2],
    c: &mut [E],
    c_strides: [usize; 2],
) {
    #[cfg(not(feature = "cpu"))]
    naive_gemm((m, k, n), accum, a, a_strides, b, b_strides, c, c_strides);

    #[cfg(feature = "cpu")]
    {
        if m == 0 || n == 0 {
            return;
        }
        if k == 0 {
            if !accum {
                c.iter_mut().for_each(|x| *x = E::zero());
            }
            return;
        }
        debug_assert!(a.len() >= a_strides[0] * (m - 1) + a_strides[1] * (k - 1) + 1);
        debug_assert!(b.len() >= b_strides[0] * (k - 1) + b_strides[1] * (n - 1) + 1);
        debug_assert!(c.len() >= c_strides[0] * (m - 1) + c_strides[1] * (n - 1) + 1);
        // SAFETY: the asserts above hold for every caller in this module, the
        // three slices never alias, and gemm supports f32 and f64.
        unsafe {
            gemm::gemm(
                m,
                n,
                k,
                c.as_mut_ptr(),
                c_strides[1] as isize,
                c_strides[0] as isize,
                accum,
                a.as_ptr(),
                a_strides[1] as isize,
                a_strides[0] as isize,
                b.as_ptr(),
                b_strides[1] as isize,
                b_strides[0] as isize,
                if accum { E::one() } else { E::zero() },
                E::one(),
                false,
                false,
                false,
                gemm::Parallelism::None,
            )
        }
    }
}

impl<E: Dtype, LTape: Tape<E>> Tensor<E, LTape> {
    /// Matrix multiplication of a `(m, k)` tensor with a `(k, n)` tensor,
    /// producing `(m, n)`.
    ///
    /// ```rust
    /// # use sinewave_core::prelude::*;
    /// let a: Tensor<f32> = Tensor::zeros([3, 2]);
    /// let b: Tensor<f32> = Tensor::zeros([2, 4]);
    /// assert_eq!(a.matmul(b).shape(), &Shape::from([3, 4]));
    /// ```
    pub fn try_matmul<RTape>(self, rhs: Tensor<E, RTape>) -> Result<Self, Error>
    where
        LTape: Merge<RTape>,
    {
        for t in [&self.shape, &rhs.shape] {
            if t.rank() != 2 {
                return Err(Error::RankMismatch {
                    op: "matmul",
                    expected: 2,
                    found: t.rank(),
                });
            }
        }
        let (m, k) = (self.shape.dim(0), self.shape.dim(1));
        let n = rhs.shape.dim(1);
        if rhs.shape.dim(0) != k {
            return Err(Error::ShapeMismatch {
                op: "matmul",
                expected: Shape::from([k, n]),
                found: rhs.shape,
            });
        }

        let (lhs, ltape) = self.split_tape();
        let (rhs, rtape) = rhs.split_tape();
        let mut tape = ltape.merge(rtape);

        let mut data = vec![E::zero(); m * n];
        matmul((m, k, n), false, &lhs.data, [k, 1], &rhs.data, [n, 1], &mut data, [n, 1]);
        let out = Tensor::from_parts(data, Shape::from([m, n]));
        let out_ghost = out.ghost();

        tape.add_backward_op(move |grads| {
            grads.alloc_for(&lhs);
            grads.alloc_for(&rhs);
            grads.with_grad_out(&out_ghost, |grads, grad_out| {
                // grad_lhs += grad_out @ rhs^T
                matmul(
                    (m, n, k),
                    true,
                    grad_out,
                    [n, 1],
                    &rhs.data,
                    [1, n],
                    grads.get_mut(&lhs),
                    [k, 1],
                );
                // grad_rhs += lhs^T @ grad_out
                matmul(
                    (k, m, n),
                    true,
                    &lhs.data,
                    [1, k],
                    grad_out,
                    [n, 1],
                    grads.get_mut(&rhs),
                    [n, 1],
                );
                Ok(())
            })
        });
        Ok(out.put_tape(tape))
    }

    /// See [Tensor::try_matmul].
    pub fn matmul<RTape>(self, rhs: Tensor<E, RTape>) -> Self
    where
        LTape: Merge<RTape>,
    {
        self.try_matmul(rhs).unwrap()
    }
}
