//! PPO loss functions.
//!
//! Tensor versions drive gradient computation; scalar versions exist for
//! algorithm logic and tests that reason about the objective directly.
//!
//! # Numerical Stability
//!
//! The importance ratio is computed as exp(log_ratio) with the log ratio
//! clamped to [-20, 20]. exp(20) ≈ 485 million, far beyond any meaningful
//! ratio, so the clamp only suppresses overflow.

use burn::tensor::{backend::AutodiffBackend, Tensor};

/// Maximum log ratio before exp() to prevent overflow.
const MAX_LOG_RATIO: f32 = 20.0;

/// PPO clipped surrogate loss (tensor computation for gradients).
///
/// L^CLIP(θ) = -E[min(r_t(θ) * A_t, clip(r_t(θ), 1-ε, 1+ε) * A_t)]
///
/// where r_t(θ) = π_θ(a_t|s_t) / π_θ_old(a_t|s_t). The sign is already
/// flipped for minimization.
///
/// # Arguments
///
/// * `log_probs` - current policy log probs: `[batch]`
/// * `old_log_probs` - old policy log probs (detached): `[batch]`
/// * `advantages` - normalized GAE advantages (detached): `[batch]`
/// * `clip_epsilon` - clipping range ε
pub fn ppo_clip_loss<B: AutodiffBackend>(
    log_probs: Tensor<B, 1>,
    old_log_probs: Tensor<B, 1>,
    advantages: Tensor<B, 1>,
    clip_epsilon: f32,
) -> Tensor<B, 1> {
    let log_ratio = log_probs - old_log_probs;
    let clamped_log_ratio = log_ratio.clamp(-MAX_LOG_RATIO, MAX_LOG_RATIO);
    let ratio = clamped_log_ratio.exp();

    let clipped_ratio = ratio.clone().clamp(1.0 - clip_epsilon, 1.0 + clip_epsilon);

    let surr1 = ratio * advantages.clone();
    let surr2 = clipped_ratio * advantages;

    // Pessimistic bound, negated for minimization.
    -surr1.min_pair(surr2).mean()
}

/// PPO clipped surrogate loss (scalar computation).
///
/// Mirrors [`ppo_clip_loss`] on plain slices.
pub fn ppo_clip_loss_scalar(
    log_probs: &[f32],
    old_log_probs: &[f32],
    advantages: &[f32],
    clip_epsilon: f32,
) -> f32 {
    let n = log_probs.len();
    assert_eq!(old_log_probs.len(), n);
    assert_eq!(advantages.len(), n);

    if n == 0 {
        return 0.0;
    }

    let mut total = 0.0f32;
    for i in 0..n {
        let log_ratio = log_probs[i] - old_log_probs[i];
        let clamped = if log_ratio.is_finite() {
            log_ratio.clamp(-MAX_LOG_RATIO, MAX_LOG_RATIO)
        } else {
            0.0
        };
        let ratio = clamped.exp();
        let clipped_ratio = ratio.clamp(1.0 - clip_epsilon, 1.0 + clip_epsilon);

        total += (ratio * advantages[i]).min(clipped_ratio * advantages[i]);
    }

    -total / n as f32
}

/// Critic loss: mean squared error between predictions and value targets.
///
/// The caller scales by the value-function coefficient (0.5 in the standard
/// `0.5 * mean((return - value)²)` formulation).
pub fn value_loss<B: AutodiffBackend>(
    values: Tensor<B, 1>,
    returns: Tensor<B, 1>,
) -> Tensor<B, 1> {
    (returns - values).powf_scalar(2.0).mean()
}

/// Critic loss (scalar computation).
pub fn value_loss_scalar(values: &[f32], returns: &[f32]) -> f32 {
    let n = values.len();
    assert_eq!(returns.len(), n);

    if n == 0 {
        return 0.0;
    }

    values
        .iter()
        .zip(returns.iter())
        .map(|(v, r)| (r - v).powi(2))
        .sum::<f32>()
        / n as f32
}
