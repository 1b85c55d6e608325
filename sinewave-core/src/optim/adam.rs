use std::{marker::PhantomData, sync::Arc};

use super::WeightDecay;
use crate::{
    dtypes::Dtype,
    nn_traits::{Optimizer, UpdateParams},
    tensor::{Error, Gradients, Tensor, UniqueId},
};

/// Configuration of hyperparameters for [Adam].
///
/// Changing all default parameters:
/// ```rust
/// # use sinewave_core::prelude::*;
/// AdamConfig {
///     lr: 1e-2,
///     betas: [0.1, 0.2],
///     eps: 1e-6,
///     weight_decay: Some(WeightDecay::L2(1e-1)),
/// };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdamConfig {
    /// Learning rate. Defaults to `1e-3`.
    pub lr: f64,

    /// Betas from Adam paper. Defaults to `[0.9, 0.999]`.
    pub betas: [f64; 2],

    /// Epsilon for numerical stability. Defaults to `1e-8`.
    pub eps: f64,

    /// Optional weight decay. Defaults to `None`.
    pub weight_decay: Option<WeightDecay>,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            lr: 1e-3,
            betas: [0.9, 0.999],
            eps: 1e-8,
            weight_decay: None,
        }
    }
}

impl AdamConfig {
    /// One Adam step for `t`-th update of a single parameter buffer.
    fn update_kernel<E: Dtype>(
        &self,
        t: i32,
        param: &mut [E],
        moment1: &mut [E],
        moment2: &mut [E],
        grad: &[E],
    ) {
        let betas = self.betas.map(E::from_f64_lossy);
        let eps = E::from_f64_lossy(self.eps);
        let lr = E::from_f64_lossy(self.lr);

        for ((p, mut g), (m, v)) in param
            .iter_mut()
            .zip(grad.iter().cloned())
            .zip(moment1.iter_mut().zip(moment2.iter_mut()))
        {
            if let Some(WeightDecay::L2(wd)) = self.weight_decay {
                g += E::from_f64_lossy(wd) * *p;
            }

            *m = *m * betas[0] + g * (E::one() - betas[0]);
            *v = *v * betas[1] + g.powi(2) * (E::one() - betas[1]);
            let m_hat = *m * (E::one() - betas[0].powi(t)).recip();
            let v_hat = *v * (E::one() - betas[1].powi(t)).recip();
            g = lr * m_hat / (v_hat.sqrt() + eps);

            if let Some(WeightDecay::Decoupled(wd)) = self.weight_decay {
                g += E::from_f64_lossy(wd * self.lr) * *p;
            }

            *p -= g;
        }
    }
}

/// An implementation of the Adam optimizer from
/// [Adam: A Method for Stochastic Optimization](https://arxiv.org/abs/1412.6980)
///
/// # Example Usage
/// ```rust
/// # use sinewave_core::prelude::*;
/// # let model: Tensor<f32> = Tensor::zeros(Shape::scalar());
/// let mut opt: Adam<Tensor<f32>, f32> = Adam::new(&model, AdamConfig {
///     lr: 1e-2,
///     betas: [0.5, 0.25],
///     eps: 1e-6,
///     weight_decay: Some(WeightDecay::Decoupled(1e-2)),
/// });
/// ```
///
/// Moment estimates are keyed by parameter id, so the optimizer must keep
/// updating the same module it was built for.
#[derive(Debug, Clone)]
pub struct Adam<M, E> {
    /// Hyperparameter configuration
    pub cfg: AdamConfig,

    t: i32,
    moment1: Gradients<E>,
    moment2: Gradients<E>,

    marker: PhantomData<fn(&M)>,
}

impl<M, E> Adam<M, E> {
    /// Constructs using hyperparameters from `cfg`.
    pub fn new(_model: &M, cfg: AdamConfig) -> Self {
        Self {
            cfg,
            t: 0,
            moment1: Gradients::leaky(),
            moment2: Gradients::leaky(),
            marker: PhantomData,
        }
    }

    /// Number of updates applied so far.
    pub fn t(&self) -> i32 {
        self.t
    }
}

impl<M, E: Dtype> Optimizer<M, E> for Adam<M, E> {
    fn update_tensor(
        &mut self,
        t: &mut Tensor<E>,
        gradients: &Gradients<E>,
        missing_params: &mut Vec<UniqueId>,
    ) -> Result<(), Error> {
        match gradients.get_ref_checked(t) {
            None => missing_params.push(t.id()),
            Some(g) => {
                let m_t = self.moment1.get_or_alloc_mut(t);
                let v_t = self.moment2.get_or_alloc_mut(t);
                let param = Arc::<Vec<E>>::make_mut(&mut t.data);
                self.cfg.update_kernel(self.t, param.as_mut_slice(), m_t, v_t, g);
            }
        }
        Ok(())
    }

    fn update(&mut self, module: &mut M, gradients: &Gradients<E>) -> Result<(), Error>
    where
        M: UpdateParams<E>,
    {
        self.t = self.t.saturating_add(1);

        // NOTE: the rest of this is identical to default implementation of update.
        let mut missing_tensors = Vec::new();
        module.try_update_params(self, gradients, &mut missing_tensors)?;
        if missing_tensors.is_empty() {
            Ok(())
        } else {
            Err(Error::UnusedTensors(missing_tensors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn test_default_adam_params() {
        let mut t: Tensor<TestDtype> = Tensor::ones([5]);
        let mut opt = Adam::new(&t, Default::default());
        let rate: Tensor<TestDtype> = Tensor::from_vec(vec![1e-6, 1e-5, 1e-4, 1e-3, 1e-2], [5]);
        let expected = [
            [0.99999994, 0.999996, 0.9997143, 0.9990244, 0.99900025],
            [0.9999999, 0.999992, 0.99942863, 0.99804884, 0.9980005],
            [0.9999998, 0.999988, 0.999143, 0.9970733, 0.9970008],
            [0.99999976, 0.999984, 0.9988574, 0.99609786, 0.9960012],
            [0.9999997, 0.99998003, 0.9985718, 0.9951225, 0.9950017],
            [0.99999964, 0.99997604, 0.99828625, 0.99414724, 0.9940022],
            [0.9999996, 0.99997205, 0.99800074, 0.9931721, 0.9930029],
            [0.9999995, 0.99996805, 0.9977153, 0.9921971, 0.9920037],
            [0.99999946, 0.99996406, 0.99742985, 0.99122226, 0.99100465],
            [0.9999994, 0.99996006, 0.99714446, 0.99024755, 0.99000573],
        ];

        for e in expected.iter() {
            let gradients = (t.leaky_trace() * rate.clone()).square().mean().backward();
            opt.update(&mut t, &gradients).expect("");
            assert_close!(t.as_vec(), e.to_vec());
        }
        assert_eq!(opt.t(), 10);
    }

    #[test]
    fn test_adam_decoupled_decay_first_step() {
        let mut t: Tensor<TestDtype> = Tensor::from_vec(vec![-0.5, -0.25, 0.1, 0.6, 1.0], [5]);
        let mut opt = Adam::new(
            &t,
            AdamConfig {
                weight_decay: Some(WeightDecay::Decoupled(1.0)),
                ..Default::default()
            },
        );
        let gradients = t.leaky_trace().square().mean().backward();
        opt.update(&mut t, &gradients).expect("");
        assert_close!(t.as_vec(), vec![-0.4985, -0.24875, 0.0989, 0.5984, 0.998]);
    }

    #[test]
    fn test_clones_do_not_share_updates() {
        let mut t: Tensor<TestDtype> = Tensor::ones([3]);
        let before = t.clone();
        let mut opt = Adam::new(&t, Default::default());
        let gradients = t.leaky_trace().square().mean().backward();
        opt.update(&mut t, &gradients).expect("");
        assert_eq!(before.as_vec(), vec![1.0; 3]);
        assert_eq!(before.id(), t.id());
        assert_ne!(t.as_vec(), before.as_vec());
    }

    #[test]
    fn test_update_is_in_place_when_unshared() {
        let mut t: Tensor<TestDtype> = Tensor::from_vec(vec![1.0, -2.0], [2]);
        let ptr = Arc::as_ptr(&t.data);
        let mut opt = Adam::new(&t, Default::default());
        let gradients = t.leaky_trace().square().mean().backward();
        opt.update(&mut t, &gradients).expect("");
        assert_eq!(Arc::as_ptr(&t.data), ptr);
        assert_close!(t.as_vec(), vec![0.999, -1.999]);
        assert_eq!(opt.t(), 1);
    }

    #[test]
    fn test_unused_tensors() {
        let mut t: Tensor<TestDtype> = Tensor::ones([5]);
        let mut opt = Adam::new(&t, Default::default());
        let err = opt.update(&mut t, &Gradients::leaky()).unwrap_err();
        assert_eq!(err, Error::UnusedTensors(vec![t.id()]));
    }
}
