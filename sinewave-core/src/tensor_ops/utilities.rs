use crate::{
    dtypes::Dtype,
    tensor::{Error, Merge, Tape, Tensor},
};

/// An elementwise function and its derivative.
pub trait UnaryDerivative<E> {
    /// Whether [UnaryDerivative::df] is computed from `f(x)` rather than `x`.
    /// Activations like sigmoid and tanh are cheaper that way.
    const DF_USES_FX: bool;
    fn f(&self, x: &E) -> E;
    fn df(&self, x: &E) -> E;
}

/// An elementwise function of two same-shaped operands and its partial
/// derivatives.
pub trait BinaryDerivative<E> {
    const NAME: &'static str;
    fn f(&self, x: &E, y: &E) -> E;
    fn dfdx(&self, x: &E, y: &E) -> E;
    fn dfdy(&self, x: &E, y: &E) -> E;
}

pub(crate) fn try_unary_op<Op, E, T>(op: Op, inp: Tensor<E, T>) -> Result<Tensor<E, T>, Error>
where
    Op: 'static + UnaryDerivative<E>,
    E: Dtype,
    T: Tape<E>,
{
    let (inp, mut tape) = inp.split_tape();
    let out = Tensor::from_parts(
        inp.data.iter().map(|x| op.f(x)).collect(),
        inp.shape.clone(),
    );
    let inp_ghost = inp.ghost();
    let out_ghost = out.ghost();
    let saved = if Op::DF_USES_FX {
        out.data.clone()
    } else {
        inp.data.clone()
    };
    tape.add_backward_op(move |grads| {
        grads.alloc_for(&inp_ghost);
        grads.with_grad_out(&out_ghost, |grads, grad_out| {
            let grad_inp = grads.get_mut(&inp_ghost);
            for ((gi, x), go) in grad_inp.iter_mut().zip(saved.iter()).zip(grad_out) {
                *gi += op.df(x) * *go;
            }
            Ok(())
        })
    });
    Ok(out.put_tape(tape))
}

pub(crate) fn try_binary_op<Op, E, RhsTape, LhsTape>(
    op: Op,
    lhs: Tensor<E, LhsTape>,
    rhs: Tensor<E, RhsTape>,
) -> Result<Tensor<E, LhsTape>, Error>
where
    Op: 'static + BinaryDerivative<E>,
    E: Dtype,
    LhsTape: Tape<E> + Merge<RhsTape>,
{
    if lhs.shape != rhs.shape {
        return Err(Error::ShapeMismatch {
            op: Op::NAME,
            expected: lhs.shape,
            found: rhs.shape,
        });
    }
    let (lhs, ltape) = lhs.split_tape();
    let (rhs, rtape) = rhs.split_tape();
    let mut tape = ltape.merge(rtape);
    let out = Tensor::from_parts(
        lhs.data
            .iter()
            .zip(rhs.data.iter())
            .map(|(x, y)| op.f(x, y))
            .collect(),
        lhs.shape.clone(),
    );
    let out_ghost = out.ghost();
    tape.add_backward_op(move |grads| {
        grads.alloc_for(&lhs);
        grads.alloc_for(&rhs);
        grads.with_grad_out(&out_ghost, |grads, grad_out| {
            let grad_lhs = grads.get_mut(&lhs);
            for (i, gl) in grad_lhs.iter_mut().enumerate() {
                *gl += op.dfdx(&lhs.data[i], &rhs.data[i]) * grad_out[i];
            }
            let grad_rhs = grads.get_mut(&rhs);
            for (i, gr) in grad_rhs.iter_mut().enumerate() {
                *gr += op.dfdy(&lhs.data[i], &rhs.data[i]) * grad_out[i];
            }
            Ok(())
        })
    });
    Ok(out.put_tape(tape))
}
