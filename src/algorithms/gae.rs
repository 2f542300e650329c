//! Generalized Advantage Estimation.
//!
//! GAE is a family of policy gradient estimators parameterized by λ:
//! - λ = 0: one-step TD (low variance, high bias)
//! - λ = 1: Monte Carlo (high variance, low bias)
//! - λ ∈ (0, 1): interpolation
//!
//! ## Formula
//!
//! A_t = Σ_{l=0}^{∞} (γλ)^l δ_{t+l}
//! where δ_t = r_t + γ V(s_{t+1}) - V(s_t)
//!
//! ## References
//!
//! - Schulman et al., "High-Dimensional Continuous Control Using
//!   Generalized Advantage Estimation" (2016)

/// Compute GAE advantages and returns for one rollout.
///
/// The recursion runs in reverse over freshly allocated output arrays; the
/// input arrays are never mutated. Episode boundaries inside the rollout are
/// handled by the `(1 - done)` mask, which zeroes the bootstrap contribution
/// across resets without restarting the estimator.
///
/// # Arguments
///
/// * `rewards` - rewards received `[T]`
/// * `values` - value estimates including the trailing bootstrap `[T + 1]`
/// * `dones` - episode termination flags `[T]`
/// * `gamma` - discount factor
/// * `lam` - GAE trace-decay parameter
///
/// # Returns
///
/// `(advantages, returns)` - both `[T]`, aligned with the transitions.
pub fn compute_gae(
    rewards: &[f32],
    values: &[f32],
    dones: &[bool],
    gamma: f32,
    lam: f32,
) -> (Vec<f32>, Vec<f32>) {
    let n = rewards.len();
    assert_eq!(values.len(), n + 1, "values must carry one bootstrap entry");
    assert_eq!(dones.len(), n);

    let mut advantages = vec![0.0f32; n];
    let mut returns = vec![0.0f32; n];

    let mut gae = 0.0f32;

    for t in (0..n).rev() {
        let not_done = if dones[t] { 0.0 } else { 1.0 };

        // TD residual: δ_t = r_t + γ * V(s_{t+1}) - V(s_t)
        let delta = rewards[t] + gamma * values[t + 1] * not_done - values[t];

        // GAE: A_t = δ_t + γλ * A_{t+1}
        gae = delta + gamma * lam * not_done * gae;

        advantages[t] = gae;
        returns[t] = gae + values[t];
    }

    (advantages, returns)
}

/// Normalize advantages to zero mean and unit variance, in place.
///
/// Uses population statistics of the whole rollout with an ε floor on the
/// standard deviation, so a zero-variance rollout maps to zeros instead of
/// NaN. Normalization happens exactly once per rollout, before minibatching
/// begins, never per minibatch.
pub fn normalize_advantages(advantages: &mut [f32]) {
    if advantages.is_empty() {
        return;
    }

    let n = advantages.len() as f32;
    let mean = advantages.iter().sum::<f32>() / n;
    let variance = advantages.iter().map(|a| (a - mean).powi(2)).sum::<f32>() / n;
    let std = variance.sqrt();

    for a in advantages.iter_mut() {
        *a = (*a - mean) / (std + 1e-8);
    }
}
