//! Dirichlet noise for root exploration during self-play.
//!
//! Dirichlet is sampled using Gamma distributions: X_i ~ Gamma(alpha_i, 1),
//! then normalised: Y_i = X_i / sum(X_i).

use crate::game::state::COLS;
use crate::{Connect4Error, Result};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Gamma};

/// Draws one sample from Dirichlet(alpha).
///
/// Every alpha must be finite and positive. If every Gamma draw underflows to
/// zero (possible for very small alphas) the uniform distribution is returned.
pub fn generate_dirichlet(alpha: &[f64; COLS], rng: &mut StdRng) -> Result<[f32; COLS]> {
    let mut draws = [0.0f64; COLS];
    for (draw, &a) in draws.iter_mut().zip(alpha.iter()) {
        if !(a.is_finite() && a > 0.0) {
            return Err(Connect4Error::InvalidDirichlet(format!(
                "concentration {} must be finite and > 0",
                a
            )));
        }
        let gamma = Gamma::new(a, 1.0)
            .map_err(|e| Connect4Error::InvalidDirichlet(e.to_string()))?;
        *draw = gamma.sample(rng);
    }

    let total: f64 = draws.iter().sum();
    let mut sample = [1.0 / COLS as f32; COLS];
    if total > 0.0 && total.is_finite() {
        for (out, draw) in sample.iter_mut().zip(draws.iter()) {
            *out = (draw / total) as f32;
        }
    }
    Ok(sample)
}

/// Symmetric Dirichlet(alpha, ..., alpha).
pub fn dirichlet_noise(alpha: f64, rng: &mut StdRng) -> Result<[f32; COLS]> {
    generate_dirichlet(&[alpha; COLS], rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::SeedableRng;

    #[test]
    fn test_sample_is_a_distribution() {
        let mut rng = StdRng::seed_from_u64(2025);
        for alpha in [0.03, 0.3, 1.0, 10.0] {
            let sample = dirichlet_noise(alpha, &mut rng).unwrap();
            assert!(sample.iter().all(|&x| x >= 0.0 && x.is_finite()));
            assert!((sample.iter().sum::<f32>() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_large_alpha_is_near_uniform() {
        let mut rng = StdRng::seed_from_u64(11);
        let sample = dirichlet_noise(10_000.0, &mut rng).unwrap();
        for x in sample {
            assert!((x - 1.0 / COLS as f32).abs() < 0.02);
        }
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let a = dirichlet_noise(0.5, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = dirichlet_noise(0.5, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_non_positive_alpha() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut alpha = [1.0; COLS];
        alpha[2] = 0.0;
        assert_matches!(
            generate_dirichlet(&alpha, &mut rng),
            Err(Connect4Error::InvalidDirichlet(_))
        );
        alpha[2] = f64::NAN;
        assert_matches!(
            generate_dirichlet(&alpha, &mut rng),
            Err(Connect4Error::InvalidDirichlet(_))
        );
    }
}
