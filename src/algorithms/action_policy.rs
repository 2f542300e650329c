//! Action policy abstractions for discrete and continuous action spaces.
//!
//! The policy network emits distribution parameters; which distribution those
//! parameters describe is selected by configuration through this capability
//! interface, not by inheritance:
//!
//! - [`ActionValue`]: scalar action representation for environment stepping
//!   and buffer storage
//! - [`PolicyOutput`]: a distribution that can `sample`, `log_prob`, and
//!   `entropy`
//! - [`ActionPolicy`]: the configured pairing of action type and output type
//!
//! Implementations: [`DiscretePolicy`] (categorical over N actions) and
//! [`ContinuousPolicy`] (diagonal Gaussian over a bounded action vector).

use burn::tensor::backend::Backend;
use burn::tensor::{activation::softmax, Int, Tensor};
use std::fmt::Debug;

use super::continuous_policy::{
    clamp_action, entropy_gaussian, log_prob_gaussian, sample_gaussian,
};

/// Scalar action value for environment interaction.
///
/// Actions are stored in buffers and handed to environments as plain floats;
/// this trait converts between the typed and flat representations.
pub trait ActionValue: Clone + Send + Sync + Debug + 'static {
    /// Number of floats needed to represent this action.
    fn size(&self) -> usize;

    /// Convert to a float vector for storage and environment stepping.
    fn as_floats(&self) -> Vec<f32>;

    /// Reconstruct from a raw float slice.
    fn from_floats(data: &[f32]) -> Self;
}

/// Discrete action value (single index).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscreteAction(pub u32);

impl ActionValue for DiscreteAction {
    fn size(&self) -> usize {
        1
    }

    fn as_floats(&self) -> Vec<f32> {
        vec![self.0 as f32]
    }

    fn from_floats(data: &[f32]) -> Self {
        Self(data[0] as u32)
    }
}

impl From<u32> for DiscreteAction {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

/// Continuous action value (vector of floats).
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousAction(pub Vec<f32>);

impl ActionValue for ContinuousAction {
    fn size(&self) -> usize {
        self.0.len()
    }

    fn as_floats(&self) -> Vec<f32> {
        self.0.clone()
    }

    fn from_floats(data: &[f32]) -> Self {
        Self(data.to_vec())
    }
}

impl From<Vec<f32>> for ContinuousAction {
    fn from(val: Vec<f32>) -> Self {
        Self(val)
    }
}

/// Action distribution produced by a policy forward pass.
///
/// Provides both rollout-collection operations ([`sample`](Self::sample),
/// detached) and training operations ([`log_prob`](Self::log_prob),
/// [`entropy`](Self::entropy), with gradient flow).
pub trait PolicyOutput<B: Backend>: Clone + Send + 'static {
    /// The action value type produced by sampling this distribution.
    type Action: ActionValue;

    /// Sample one action per batch row, returning `(actions, log_probs)`.
    fn sample(&self, device: &B::Device) -> (Vec<Self::Action>, Vec<f32>);

    /// Log probability of the given actions under this distribution.
    fn log_prob(&self, actions: &[Self::Action], device: &B::Device) -> Tensor<B, 1>;

    /// Per-sample entropy of this distribution.
    fn entropy(&self) -> Tensor<B, 1>;
}

// ============================================================================
// Discrete (categorical) output
// ============================================================================

/// Categorical distribution parameterized by unnormalized logits.
#[derive(Clone)]
pub struct DiscretePolicyOutput<B: Backend> {
    /// Unnormalized log probabilities: `[batch, n_actions]`.
    pub logits: Tensor<B, 2>,
}

impl<B: Backend> DiscretePolicyOutput<B> {
    /// Create from a logits tensor.
    pub fn new(logits: Tensor<B, 2>) -> Self {
        Self { logits }
    }

    /// Softmax probabilities.
    pub fn probs(&self) -> Tensor<B, 2> {
        softmax(self.logits.clone(), 1)
    }

    /// Number of actions.
    pub fn n_actions(&self) -> usize {
        self.logits.dims()[1]
    }

    /// Batch size.
    pub fn batch_size(&self) -> usize {
        self.logits.dims()[0]
    }
}

impl<B: Backend> PolicyOutput<B> for DiscretePolicyOutput<B> {
    type Action = DiscreteAction;

    fn sample(&self, _device: &B::Device) -> (Vec<Self::Action>, Vec<f32>) {
        let probs = self.probs();
        let probs_data = probs.to_data();
        let probs_slice: &[f32] = probs_data.as_slice().expect("Failed to get probs slice");

        let batch_size = self.batch_size();
        let n_actions = self.n_actions();

        let mut actions = Vec::with_capacity(batch_size);
        let mut log_probs = Vec::with_capacity(batch_size);

        for i in 0..batch_size {
            // Inverse-CDF sampling over the categorical; the last-action
            // branch absorbs probabilities that sum slightly below 1.0.
            let rand_val = fastrand::f32();
            let mut cumsum = 0.0;
            let mut selected = (n_actions - 1) as u32;

            for a in 0..n_actions {
                cumsum += probs_slice[i * n_actions + a];
                if rand_val < cumsum || a == n_actions - 1 {
                    selected = a as u32;
                    break;
                }
            }

            let prob = probs_slice[i * n_actions + selected as usize];
            actions.push(DiscreteAction(selected));
            log_probs.push((prob + 1e-8).ln());
        }

        (actions, log_probs)
    }

    fn log_prob(&self, actions: &[Self::Action], device: &B::Device) -> Tensor<B, 1> {
        let batch_size = actions.len();
        let probs = self.probs();

        let action_indices: Vec<i32> = actions.iter().map(|a| a.0 as i32).collect();
        let actions_tensor: Tensor<B, 1, Int> =
            Tensor::from_ints(action_indices.as_slice(), device);
        let actions_2d: Tensor<B, 2, Int> = actions_tensor.reshape([batch_size, 1]);

        let selected_probs = probs.gather(1, actions_2d);
        let selected_probs_1d: Tensor<B, 1> = selected_probs.flatten(0, 1);

        (selected_probs_1d + 1e-8).log()
    }

    fn entropy(&self) -> Tensor<B, 1> {
        let probs = self.probs();
        let log_probs = (probs.clone() + 1e-8).log();
        let neg_entropy: Tensor<B, 2> = (probs * log_probs).sum_dim(1);
        -neg_entropy.flatten(0, 1)
    }
}

// ============================================================================
// Continuous (diagonal Gaussian) output
// ============================================================================

/// Diagonal Gaussian distribution over a bounded action vector.
///
/// Sampled actions are clamped to the configured bounds before being handed
/// to the environment; log probabilities are computed on the unclamped
/// Gaussian.
#[derive(Clone)]
pub struct GaussianPolicyOutput<B: Backend> {
    /// Mean of the Gaussian: `[batch, action_dim]`.
    pub mean: Tensor<B, 2>,
    /// Log standard deviation: `[batch, action_dim]`.
    pub log_std: Tensor<B, 2>,
    /// Action bounds `(low, high)` per dimension.
    pub bounds: (Vec<f32>, Vec<f32>),
}

impl<B: Backend> GaussianPolicyOutput<B> {
    /// Create from mean and log-std tensors.
    pub fn new(mean: Tensor<B, 2>, log_std: Tensor<B, 2>, bounds: (Vec<f32>, Vec<f32>)) -> Self {
        Self {
            mean,
            log_std,
            bounds,
        }
    }

    /// Action dimension.
    pub fn action_dim(&self) -> usize {
        self.mean.dims()[1]
    }

    /// Batch size.
    pub fn batch_size(&self) -> usize {
        self.mean.dims()[0]
    }
}

impl<B: Backend> PolicyOutput<B> for GaussianPolicyOutput<B> {
    type Action = ContinuousAction;

    fn sample(&self, _device: &B::Device) -> (Vec<Self::Action>, Vec<f32>) {
        let (samples, log_probs_tensor) =
            sample_gaussian(self.mean.clone(), self.log_std.clone());
        let clamped = clamp_action(samples, &self.bounds.0, &self.bounds.1);

        let clamped_data = clamped.to_data();
        let clamped_slice: &[f32] = clamped_data.as_slice().expect("Failed to get action slice");

        let log_probs_data = log_probs_tensor.to_data();
        let log_probs_slice: &[f32] = log_probs_data
            .as_slice()
            .expect("Failed to get log_probs slice");

        let batch_size = self.batch_size();
        let action_dim = self.action_dim();

        let mut actions = Vec::with_capacity(batch_size);
        let mut log_probs = Vec::with_capacity(batch_size);

        for i in 0..batch_size {
            let action_vec: Vec<f32> = (0..action_dim)
                .map(|j| clamped_slice[i * action_dim + j])
                .collect();
            actions.push(ContinuousAction(action_vec));
            log_probs.push(log_probs_slice[i]);
        }

        (actions, log_probs)
    }

    fn log_prob(&self, actions: &[Self::Action], device: &B::Device) -> Tensor<B, 1> {
        let batch_size = actions.len();
        let action_dim = self.action_dim();

        let mut action_floats = Vec::with_capacity(batch_size * action_dim);
        for action in actions {
            action_floats.extend_from_slice(&action.0);
        }

        let action_tensor: Tensor<B, 2> =
            Tensor::<B, 1>::from_floats(action_floats.as_slice(), device)
                .reshape([batch_size, action_dim]);

        log_prob_gaussian(action_tensor, self.mean.clone(), self.log_std.clone())
    }

    fn entropy(&self) -> Tensor<B, 1> {
        entropy_gaussian(self.log_std.clone())
    }
}

// ============================================================================
// ActionPolicy - configured pairing of action and output types
// ============================================================================

/// Main action policy trait combining action type and distribution family.
pub trait ActionPolicy<B: Backend>: Clone + Send + Sync + 'static {
    /// The action value type for environment interaction.
    type Action: ActionValue;

    /// The distribution type emitted by the policy network.
    type Output: PolicyOutput<B, Action = Self::Action>;

    /// Number of action dimensions (1 for discrete).
    fn action_dim(&self) -> usize;

    /// Create a policy output from network tensors.
    ///
    /// For discrete policies `head` is the logits and `extra` is ignored;
    /// for continuous policies `head` is the mean and `extra` the log-std.
    fn create_output(&self, head: Tensor<B, 2>, extra: Option<Tensor<B, 2>>) -> Self::Output;
}

/// Discrete action policy (categorical distribution).
#[derive(Debug, Clone)]
pub struct DiscretePolicy {
    /// Number of discrete actions.
    pub n_actions: usize,
}

impl DiscretePolicy {
    /// Create a new discrete policy.
    pub fn new(n_actions: usize) -> Self {
        Self { n_actions }
    }
}

impl<B: Backend> ActionPolicy<B> for DiscretePolicy {
    type Action = DiscreteAction;
    type Output = DiscretePolicyOutput<B>;

    fn action_dim(&self) -> usize {
        1
    }

    fn create_output(&self, logits: Tensor<B, 2>, _extra: Option<Tensor<B, 2>>) -> Self::Output {
        DiscretePolicyOutput::new(logits)
    }
}

/// Continuous action policy (diagonal Gaussian with bounds).
#[derive(Debug, Clone)]
pub struct ContinuousPolicy {
    /// Action dimension.
    pub action_dim: usize,
    /// Action bounds `(low, high)` per dimension.
    pub bounds: (Vec<f32>, Vec<f32>),
}

impl ContinuousPolicy {
    /// Create a new continuous policy with the given bounds.
    pub fn new(action_dim: usize, low: Vec<f32>, high: Vec<f32>) -> Self {
        assert_eq!(low.len(), action_dim);
        assert_eq!(high.len(), action_dim);
        Self {
            action_dim,
            bounds: (low, high),
        }
    }

    /// Symmetric bounds `[-bound, bound]` for every dimension.
    pub fn symmetric(action_dim: usize, bound: f32) -> Self {
        Self::new(action_dim, vec![-bound; action_dim], vec![bound; action_dim])
    }
}

impl<B: Backend> ActionPolicy<B> for ContinuousPolicy {
    type Action = ContinuousAction;
    type Output = GaussianPolicyOutput<B>;

    fn action_dim(&self) -> usize {
        self.action_dim
    }

    fn create_output(&self, mean: Tensor<B, 2>, log_std: Option<Tensor<B, 2>>) -> Self::Output {
        let log_std = log_std.expect("ContinuousPolicy requires log_std as extra tensor");
        GaussianPolicyOutput::new(mean, log_std, self.bounds.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray<f32>;

    #[test]
    fn test_discrete_action_roundtrip() {
        let action = DiscreteAction(5);
        assert_eq!(action.size(), 1);
        assert_eq!(action.as_floats(), vec![5.0]);
        assert_eq!(DiscreteAction::from_floats(&[5.0]), action);
    }

    #[test]
    fn test_continuous_action_roundtrip() {
        let action = ContinuousAction(vec![0.5, -0.3, 0.1]);
        assert_eq!(action.size(), 3);
        assert_eq!(ContinuousAction::from_floats(&[0.5, -0.3, 0.1]), action);
    }

    #[test]
    fn test_discrete_sample_in_range() {
        let device = Default::default();
        let logits: Tensor<B, 2> =
            Tensor::from_floats([[1.0, 2.0, 3.0], [3.0, 2.0, 1.0]], &device);
        let output = DiscretePolicyOutput::new(logits);

        let (actions, log_probs) = output.sample(&device);
        assert_eq!(actions.len(), 2);
        assert_eq!(log_probs.len(), 2);
        for action in &actions {
            assert!(action.0 < 3);
        }
    }

    #[test]
    fn test_discrete_entropy_ordering() {
        let device = Default::default();
        let uniform: Tensor<B, 2> = Tensor::from_floats([[1.0, 1.0, 1.0]], &device);
        let peaked: Tensor<B, 2> = Tensor::from_floats([[10.0, 0.0, 0.0]], &device);

        let entropy_uniform = DiscretePolicyOutput::new(uniform)
            .entropy()
            .into_data()
            .as_slice::<f32>()
            .unwrap()[0];
        let entropy_peaked = DiscretePolicyOutput::new(peaked)
            .entropy()
            .into_data()
            .as_slice::<f32>()
            .unwrap()[0];

        assert!(entropy_uniform > entropy_peaked);
    }

    #[test]
    fn test_gaussian_sample_respects_bounds() {
        let device = Default::default();
        let mean: Tensor<B, 2> = Tensor::zeros([16, 2], &device);
        let log_std: Tensor<B, 2> = Tensor::full([16, 2], 1.0, &device);
        let output =
            GaussianPolicyOutput::new(mean, log_std, (vec![-0.5, -0.5], vec![0.5, 0.5]));

        let (actions, log_probs) = output.sample(&device);
        assert_eq!(actions.len(), 16);
        assert_eq!(log_probs.len(), 16);
        for action in &actions {
            for &a in &action.0 {
                assert!((-0.5..=0.5).contains(&a), "action {} outside bounds", a);
            }
        }
    }

    #[test]
    fn test_gaussian_log_prob_peaks_at_mean() {
        let device = Default::default();
        let mean: Tensor<B, 2> = Tensor::zeros([1, 1], &device);
        let log_std: Tensor<B, 2> = Tensor::zeros([1, 1], &device);
        let output = GaussianPolicyOutput::new(mean, log_std, (vec![-2.0], vec![2.0]));

        let at_mean = output
            .log_prob(&[ContinuousAction(vec![0.0])], &device)
            .into_data()
            .as_slice::<f32>()
            .unwrap()[0];
        let off_mean = output
            .log_prob(&[ContinuousAction(vec![1.5])], &device)
            .into_data()
            .as_slice::<f32>()
            .unwrap()[0];

        assert!(at_mean > off_mean);
    }

    #[test]
    fn test_continuous_policy_create_output() {
        let device = Default::default();
        let policy = ContinuousPolicy::symmetric(3, 2.0);
        assert_eq!(policy.bounds.0, vec![-2.0, -2.0, -2.0]);

        let mean: Tensor<B, 2> = Tensor::zeros([4, 3], &device);
        let log_std: Tensor<B, 2> = Tensor::zeros([4, 3], &device);
        let output = <ContinuousPolicy as ActionPolicy<B>>::create_output(
            &policy,
            mean,
            Some(log_std),
        );
        assert_eq!(output.action_dim(), 3);
        assert_eq!(output.batch_size(), 4);
    }

    #[test]
    fn test_discrete_policy_dims() {
        let policy = DiscretePolicy::new(4);
        assert_eq!(<DiscretePolicy as ActionPolicy<B>>::action_dim(&policy), 1);
        assert_eq!(policy.n_actions, 4);
    }
}
