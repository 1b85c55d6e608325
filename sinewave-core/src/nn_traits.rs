//! Traits that connect modules, their parameters, and optimizers.

use crate::{
    dtypes::Dtype,
    tensor::{Error, Gradients, Tensor, UniqueId},
};

/// Immutable forward of `X` that produces [Module::Output].
/// See [Module::try_forward] for the fallible version.
pub trait Module<X> {
    /// The type that this unit produces given `X`.
    type Output;

    fn try_forward(&self, x: X) -> Result<Self::Output, Error>;

    /// Panicking version of [Module::try_forward].
    fn forward(&self, x: X) -> Self::Output {
        self.try_forward(x).unwrap()
    }
}

/// An optimizer updates every parameter of a module `M` given its
/// [Gradients].
pub trait Optimizer<M, E: Dtype>: Sized {
    /// Updates a single parameter. Parameters without a gradient are pushed
    /// onto `missing_tensors` instead.
    fn update_tensor(
        &mut self,
        t: &mut Tensor<E>,
        gradients: &Gradients<E>,
        missing_tensors: &mut Vec<UniqueId>,
    ) -> Result<(), Error>;

    /// Updates all of `module`'s parameters using `gradients`.
    ///
    /// Returns [Error::UnusedTensors] if any parameter did not receive a
    /// gradient; the parameters that did are still updated.
    fn update(&mut self, module: &mut M, gradients: &Gradients<E>) -> Result<(), Error>
    where
        M: UpdateParams<E>,
    {
        let mut missing_tensors = Vec::new();
        module.try_update_params(self, gradients, &mut missing_tensors)?;
        if missing_tensors.is_empty() {
            Ok(())
        } else {
            Err(Error::UnusedTensors(missing_tensors))
        }
    }
}

/// Something that can have all of its parameters updated by an [Optimizer].
pub trait UpdateParams<E: Dtype> {
    fn try_update_params<M, Optim: Optimizer<M, E>>(
        &mut self,
        optimizer: &mut Optim,
        gradients: &Gradients<E>,
        missing_tensors: &mut Vec<UniqueId>,
    ) -> Result<(), Error>;
}

impl<E: Dtype> UpdateParams<E> for Tensor<E> {
    fn try_update_params<M, Optim: Optimizer<M, E>>(
        &mut self,
        optimizer: &mut Optim,
        gradients: &Gradients<E>,
        missing_tensors: &mut Vec<UniqueId>,
    ) -> Result<(), Error> {
        optimizer.update_tensor(self, gradients, missing_tensors)
    }
}

/// Total number of scalar parameters.
pub trait NumParams {
    fn num_params(&self) -> usize;
}

impl<E, T> NumParams for Tensor<E, T> {
    fn num_params(&self) -> usize {
        self.shape().num_elements()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sgd(f32);

    impl<M> Optimizer<M, f32> for Sgd {
        fn update_tensor(
            &mut self,
            t: &mut Tensor<f32>,
            gradients: &Gradients<f32>,
            missing_tensors: &mut Vec<UniqueId>,
        ) -> Result<(), Error> {
            match gradients.get_ref_checked(t) {
                None => missing_tensors.push(t.id()),
                Some(g) => {
                    let data = std::sync::Arc::<Vec<f32>>::make_mut(&mut t.data);
                    for (p, g) in data.iter_mut().zip(g) {
                        *p -= self.0 * g;
                    }
                }
            }
            Ok(())
        }
    }

    struct Pair {
        a: Tensor<f32>,
        b: Tensor<f32>,
    }

    impl UpdateParams<f32> for Pair {
        fn try_update_params<M, Optim: Optimizer<M, f32>>(
            &mut self,
            optimizer: &mut Optim,
            gradients: &Gradients<f32>,
            missing_tensors: &mut Vec<UniqueId>,
        ) -> Result<(), Error> {
            self.a.try_update_params(optimizer, gradients, missing_tensors)?;
            self.b.try_update_params(optimizer, gradients, missing_tensors)
        }
    }

    #[test]
    fn test_unused_tensors_are_reported() {
        let mut pair = Pair {
            a: Tensor::ones([2]),
            b: Tensor::ones([3]),
        };
        let grads = pair.a.leaky_trace().square().mean().backward();
        let err = Sgd(1.0).update(&mut pair, &grads).unwrap_err();
        assert_eq!(err, Error::UnusedTensors(vec![pair.b.id()]));
        assert_eq!(pair.a.as_vec(), vec![0.0, 0.0]);
        assert_eq!(pair.b.as_vec(), vec![1.0; 3]);
        assert_eq!(pair.a.num_params() + pair.b.num_params(), 5);
    }
}
