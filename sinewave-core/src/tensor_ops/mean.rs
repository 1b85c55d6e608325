use crate::{
    dtypes::Dtype,
    shapes::Shape,
    tensor::{Error, Tape, Tensor},
};

impl<E: Dtype, T: Tape<E>> Tensor<E, T> {
    /// Average of all elements, as a scalar tensor.
    ///
    /// Fails on tensors without elements.
    pub fn try_mean(self) -> Result<Self, Error> {
        let num_elements = self.shape.num_elements();
        if num_elements == 0 {
            return Err(Error::Empty { op: "mean" });
        }
        let n = E::from_f64_lossy(num_elements as f64);
        let (inp, mut tape) = self.split_tape();
        let sum: E = inp.data.iter().copied().sum();
        let out = Tensor::from_parts(vec![sum / n], Shape::scalar());
        let inp = inp.ghost();
        let out_ghost = out.ghost();
        tape.add_backward_op(move |grads| {
            grads.alloc_for(&inp);
            grads.with_grad_out(&out_ghost, |grads, grad_out| {
                let g = grad_out[0] / n;
                grads.get_mut(&inp).iter_mut().for_each(|gi| *gi += g);
                Ok(())
            })
        });
        Ok(out.put_tape(tape))
    }

    /// See [Tensor::try_mean].
    pub fn mean(self) -> Self {
        self.try_mean().unwrap()
    }
}
