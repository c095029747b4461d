//! Random array creation, mostly for tests and gradient checks.

use ndarray::{ArrayD, IxDyn};
use rand::Rng;
use rand_distr::StandardNormal;

/// Creates an array of the given shape with values drawn uniformly from `[0, 1)`.
pub fn rand_uniform<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> ArrayD<f64> {
    ArrayD::from_shape_simple_fn(IxDyn(shape), || rng.gen::<f64>())
}

/// Creates an array of the given shape with values drawn from the standard normal
/// distribution.
pub fn randn<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> ArrayD<f64> {
    ArrayD::from_shape_simple_fn(IxDyn(shape), || rng.sample::<f64, _>(StandardNormal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rand_uniform_shape_and_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = rand_uniform(&[2, 3], &mut rng);
        assert_eq!(a.shape(), &[2, 3]);
        assert!(a.iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_randn_is_seeded() {
        let a = randn(&[4], &mut StdRng::seed_from_u64(7));
        let b = randn(&[4], &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_scalar_shape() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(rand_uniform(&[], &mut rng).ndim(), 0);
    }
}
