//! Diagonal Gaussian utilities for continuous action policies.
//!
//! The policy network emits a mean and a log standard deviation per action
//! dimension. Sampling uses the reparameterized form `mean + std * noise`;
//! log probabilities and entropy are analytic. Actions handed to the
//! environment are clamped to the configured bounds, while log probabilities
//! are always evaluated on the unclamped Gaussian so the importance ratio
//! stays consistent between collection and optimization.

use burn::tensor::backend::Backend;
use burn::tensor::{Distribution, Tensor};

// Clamp range for log_std, keeps exp() and division well-conditioned.
const LOG_STD_MIN: f32 = -20.0;
const LOG_STD_MAX: f32 = 2.0;

/// Sample from a diagonal Gaussian.
///
/// # Arguments
/// * `mean` - Gaussian mean: `[batch, action_dim]`
/// * `log_std` - log standard deviation: `[batch, action_dim]`
///
/// # Returns
/// `(samples, log_probs)` where samples are `[batch, action_dim]` and
/// log probs are `[batch]`, summed over action dimensions.
pub fn sample_gaussian<B: Backend>(
    mean: Tensor<B, 2>,
    log_std: Tensor<B, 2>,
) -> (Tensor<B, 2>, Tensor<B, 1>) {
    let device = mean.device();
    let dims = mean.dims();
    let batch_size = dims[0];
    let action_dim = dims[1];

    let log_std = log_std.clamp(LOG_STD_MIN, LOG_STD_MAX);
    let std = log_std.clone().exp();

    let noise: Tensor<B, 2> =
        Tensor::random([batch_size, action_dim], Distribution::Normal(0.0, 1.0), &device);

    // Reparameterization: sample = mean + std * noise
    let samples = mean + std * noise.clone();

    // log N(x; μ, σ) = -0.5 * ((x - μ)/σ)² - log σ - 0.5 * log(2π),
    // and (x - μ)/σ is exactly the sampled noise.
    let log_2pi = (2.0 * std::f32::consts::PI).ln();
    let log_prob_per_dim: Tensor<B, 2> =
        -0.5 * noise.powf_scalar(2.0) - log_std - 0.5 * log_2pi;

    let log_probs: Tensor<B, 1> = log_prob_per_dim.sum_dim(1).flatten(0, 1);

    (samples, log_probs)
}

/// Log probability of given actions under a diagonal Gaussian.
///
/// # Arguments
/// * `actions` - actions to evaluate: `[batch, action_dim]`
/// * `mean` - Gaussian mean: `[batch, action_dim]`
/// * `log_std` - log standard deviation: `[batch, action_dim]`
///
/// # Returns
/// Log probabilities `[batch]`, summed over action dimensions.
pub fn log_prob_gaussian<B: Backend>(
    actions: Tensor<B, 2>,
    mean: Tensor<B, 2>,
    log_std: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let log_std = log_std.clamp(LOG_STD_MIN, LOG_STD_MAX);
    let std = log_std.clone().exp();

    let normalized = (actions - mean) / std;
    let log_2pi = (2.0 * std::f32::consts::PI).ln();
    let log_prob_per_dim: Tensor<B, 2> =
        -0.5 * normalized.powf_scalar(2.0) - log_std - 0.5 * log_2pi;

    log_prob_per_dim.sum_dim(1).flatten(0, 1)
}

/// Analytic entropy of a diagonal Gaussian.
///
/// `H = 0.5 * D * (1 + log(2π)) + Σ log σ` for action dimension `D`.
///
/// # Returns
/// Per-sample entropy `[batch]`.
pub fn entropy_gaussian<B: Backend>(log_std: Tensor<B, 2>) -> Tensor<B, 1> {
    let action_dim = log_std.dims()[1] as f32;

    let log_2pi = (2.0 * std::f32::consts::PI).ln();
    let constant = 0.5 * action_dim * (1.0 + log_2pi);

    let sum_log_std: Tensor<B, 1> = log_std.clamp(LOG_STD_MIN, LOG_STD_MAX).sum_dim(1).flatten(0, 1);

    sum_log_std.add_scalar(constant)
}

/// Clamp actions to per-dimension bounds `[low, high]`.
///
/// # Arguments
/// * `actions` - sampled actions: `[batch, action_dim]`
/// * `low` / `high` - bounds, one entry per action dimension
pub fn clamp_action<B: Backend>(
    actions: Tensor<B, 2>,
    low: &[f32],
    high: &[f32],
) -> Tensor<B, 2> {
    let device = actions.device();
    let [batch_size, action_dim] = actions.dims();

    assert_eq!(low.len(), action_dim);
    assert_eq!(high.len(), action_dim);

    let low_tensor: Tensor<B, 2> = Tensor::<B, 1>::from_floats(low, &device)
        .unsqueeze::<2>()
        .expand([batch_size, action_dim]);
    let high_tensor: Tensor<B, 2> = Tensor::<B, 1>::from_floats(high, &device)
        .unsqueeze::<2>()
        .expand([batch_size, action_dim]);

    actions.max_pair(low_tensor).min_pair(high_tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_sample_gaussian_shapes() {
        let device = Default::default();
        let mean: Tensor<TestBackend, 2> = Tensor::zeros([32, 4], &device);
        let log_std: Tensor<TestBackend, 2> = Tensor::zeros([32, 4], &device);

        let (samples, log_probs) = sample_gaussian(mean, log_std);

        assert_eq!(samples.dims(), [32, 4]);
        assert_eq!(log_probs.dims(), [32]);

        let lp_data = log_probs.into_data();
        for &lp in lp_data.as_slice::<f32>().unwrap() {
            assert!(lp.is_finite(), "Log prob should be finite");
        }
    }

    #[test]
    fn test_log_prob_matches_sample() {
        let device = Default::default();
        let mean: Tensor<TestBackend, 2> = Tensor::zeros([8, 2], &device);
        let log_std: Tensor<TestBackend, 2> = Tensor::zeros([8, 2], &device);

        let (samples, sampled_log_probs) = sample_gaussian(mean.clone(), log_std.clone());
        let computed_log_probs = log_prob_gaussian(samples, mean, log_std);

        let sampled = sampled_log_probs.into_data();
        let computed = computed_log_probs.into_data();
        for (s, c) in sampled
            .as_slice::<f32>()
            .unwrap()
            .iter()
            .zip(computed.as_slice::<f32>().unwrap())
        {
            assert!((s - c).abs() < 1e-4, "log probs should match: {} vs {}", s, c);
        }
    }

    #[test]
    fn test_entropy_gaussian_unit_std() {
        let device = Default::default();
        let log_std: Tensor<TestBackend, 2> = Tensor::zeros([4, 2], &device);

        let entropy = entropy_gaussian(log_std);
        assert_eq!(entropy.dims(), [4]);

        // std = 1, 2 dims: H = 2 * 0.5 * (1 + log(2π)) ≈ 2.838
        let e_data = entropy.into_data();
        for &e in e_data.as_slice::<f32>().unwrap() {
            assert!((e - 2.838).abs() < 0.01, "Entropy should be ~2.838, got {}", e);
        }
    }

    #[test]
    fn test_entropy_increases_with_std() {
        let device = Default::default();
        let narrow: Tensor<TestBackend, 2> = Tensor::full([1, 1], -1.0, &device);
        let wide: Tensor<TestBackend, 2> = Tensor::full([1, 1], 1.0, &device);

        let narrow_e = entropy_gaussian(narrow).into_data().as_slice::<f32>().unwrap()[0];
        let wide_e = entropy_gaussian(wide).into_data().as_slice::<f32>().unwrap()[0];
        assert!(wide_e > narrow_e);
    }

    #[test]
    fn test_clamp_action() {
        let device = Default::default();
        let actions: Tensor<TestBackend, 2> =
            Tensor::from_floats([[3.0, -3.0], [0.5, -0.5]], &device);
        let clamped = clamp_action(actions, &[-2.0, -2.0], &[2.0, 2.0]);

        let data = clamped.into_data();
        let slice = data.as_slice::<f32>().unwrap();
        assert_eq!(slice, &[2.0, -2.0, 0.5, -0.5]);
    }
}
