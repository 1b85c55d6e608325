//! Parameter initializers.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use sinewave_core::{dtypes::Dtype, shapes::Shape, tensor::Error, tensor::Tensor};

/// Standard deviation of a unit normal truncated to `[-2, 2]`.
const TRUNCATED_STDDEV: f64 = 0.879_625_661_034_239_8;

/// A unit normal truncated to `[-2, 2]` and rescaled to unit variance.
struct TruncatedNormal;

impl Distribution<f64> for TruncatedNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        loop {
            let x: f64 = StandardNormal.sample(rng);
            if x.abs() <= 2.0 {
                return x / TRUNCATED_STDDEV;
            }
        }
    }
}

/// LeCun normal initialization: a truncated normal with variance
/// `1 / fan_in`, where `fan_in` is the first dimension of `shape`.
pub fn lecun_normal<E: Dtype, R: Rng + ?Sized>(
    shape: impl Into<Shape>,
    rng: &mut R,
) -> Result<Tensor<E>, Error> {
    let shape = shape.into();
    let fan_in = match shape.dims().first() {
        Some(&n) if n > 0 => n,
        _ => return Err(Error::Empty { op: "lecun_normal" }),
    };
    let scale = 1.0 / (fan_in as f64).sqrt();
    let data = TruncatedNormal
        .sample_iter(rng)
        .take(shape.num_elements())
        .map(|x| E::from_f64_lossy(x * scale))
        .collect();
    Tensor::try_from_vec(data, shape)
}

/// A random `(n, n)` orthogonal matrix, row-major.
///
/// Orthonormalizes the columns of a gaussian matrix with modified
/// Gram-Schmidt, which is a QR decomposition with a positive diagonal in `R`.
pub fn orthogonal<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    let mut cols: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..n).map(|_| StandardNormal.sample(rng)).collect())
        .collect();
    for j in 0..n {
        let (done, rest) = cols.split_at_mut(j);
        let col = &mut rest[0];
        for q in done.iter() {
            let proj: f64 = q.iter().zip(col.iter()).map(|(a, b)| a * b).sum();
            col.iter_mut().zip(q).for_each(|(c, q)| *c -= proj * q);
        }
        let norm = col.iter().map(|c| c * c).sum::<f64>().sqrt();
        col.iter_mut().for_each(|c| *c /= norm);
    }
    let mut out = vec![0.0; n * n];
    for (j, col) in cols.iter().enumerate() {
        for (i, v) in col.iter().enumerate() {
            out[i * n + j] = *v;
        }
    }
    out
}
