//! Minibatch sampling over a flattened rollout.
//!
//! Minibatches are drawn WITH replacement: each one is `mini_batch_size`
//! uniform random indices over the rollout, and one pass yields
//! `floor(rollout_size / mini_batch_size)` minibatches. An index may appear
//! in zero, one, or several minibatches within an epoch. This trades strict
//! coverage for simplicity, deliberately, instead of shuffle-and-partition.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use rand::{thread_rng, Rng};

use crate::algorithms::action_policy::ActionValue;
use crate::core::transition::Rollout;

/// Sampler configuration: the minibatch size.
#[derive(Debug, Clone, Copy)]
pub struct MinibatchSampler {
    mini_batch_size: usize,
}

impl MinibatchSampler {
    /// Create a sampler producing minibatches of `mini_batch_size`.
    pub fn new(mini_batch_size: usize) -> Self {
        assert!(mini_batch_size > 0, "mini_batch_size must be > 0");
        Self { mini_batch_size }
    }

    /// Number of minibatches one pass yields for a rollout of `rollout_size`.
    ///
    /// Floor division: a remainder smaller than the minibatch size is
    /// dropped, and a minibatch size larger than the rollout yields zero.
    pub fn batches_per_pass(&self, rollout_size: usize) -> usize {
        rollout_size / self.mini_batch_size
    }

    /// One lazy pass of minibatches over the rollout.
    ///
    /// Restartable: every call starts a fresh pass with fresh random draws.
    /// `returns` and `advantages` must be aligned with the rollout's
    /// transitions.
    pub fn minibatches<'a, A: ActionValue>(
        &self,
        rollout: &'a Rollout<A>,
        returns: &'a [f32],
        advantages: &'a [f32],
    ) -> impl Iterator<Item = Minibatch<A>> + 'a {
        let rollout_size = rollout.len();
        assert_eq!(returns.len(), rollout_size);
        assert_eq!(advantages.len(), rollout_size);

        let mini_batch_size = self.mini_batch_size;
        let n_batches = self.batches_per_pass(rollout_size);
        let mut rng = thread_rng();

        (0..n_batches).map(move |_| {
            let indices: Vec<usize> = (0..mini_batch_size)
                .map(|_| rng.gen_range(0..rollout_size))
                .collect();
            extract_minibatch(rollout, returns, advantages, &indices)
        })
    }
}

/// Gather one minibatch from the rollout at the given indices.
fn extract_minibatch<A: ActionValue>(
    rollout: &Rollout<A>,
    returns: &[f32],
    advantages: &[f32],
    indices: &[usize],
) -> Minibatch<A> {
    let obs_size = rollout.obs_size;
    let mut states = Vec::with_capacity(indices.len() * obs_size);
    let mut actions = Vec::with_capacity(indices.len());
    let mut batch_returns = Vec::with_capacity(indices.len());
    let mut batch_advantages = Vec::with_capacity(indices.len());

    for &idx in indices {
        states.extend_from_slice(rollout.state(idx));
        actions.push(rollout.actions[idx].clone());
        batch_returns.push(returns[idx]);
        batch_advantages.push(advantages[idx]);
    }

    Minibatch {
        states,
        actions,
        returns: batch_returns,
        advantages: batch_advantages,
        obs_size,
    }
}

/// One minibatch of aligned `(state, action, return, advantage)` tuples.
pub struct Minibatch<A: ActionValue> {
    /// Flattened states `[batch * obs_size]`.
    pub states: Vec<f32>,
    /// Actions `[batch]`.
    pub actions: Vec<A>,
    /// GAE value targets `[batch]`.
    pub returns: Vec<f32>,
    /// Normalized advantages `[batch]`.
    pub advantages: Vec<f32>,
    /// Observation size.
    pub obs_size: usize,
}

impl<A: ActionValue> Minibatch<A> {
    /// Number of samples in this minibatch.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if the minibatch is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// States as tensor `[batch, obs_size]`.
    pub fn states_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        Tensor::<B, 1>::from_floats(&self.states[..], device)
            .reshape([self.len(), self.obs_size])
    }

    /// Returns as tensor `[batch]`.
    pub fn returns_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1> {
        Tensor::<B, 1>::from_floats(&self.returns[..], device)
    }

    /// Advantages as tensor `[batch]`.
    pub fn advantages_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1> {
        Tensor::<B, 1>::from_floats(&self.advantages[..], device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::action_policy::ContinuousAction;

    fn rollout_of(n: usize) -> Rollout<ContinuousAction> {
        Rollout {
            states: (0..n * 2).map(|i| i as f32).collect(),
            actions: (0..n).map(|i| ContinuousAction(vec![i as f32])).collect(),
            rewards: vec![1.0; n],
            dones: vec![false; n],
            values: vec![0.0; n + 1],
            obs_size: 2,
        }
    }

    #[test]
    fn test_batches_per_pass_floor_division() {
        let sampler = MinibatchSampler::new(32);
        assert_eq!(sampler.batches_per_pass(100), 3);
        assert_eq!(sampler.batches_per_pass(64), 2);
        assert_eq!(sampler.batches_per_pass(31), 0);
    }

    #[test]
    fn test_full_size_batch_yields_exactly_one() {
        let rollout = rollout_of(16);
        let returns = vec![0.0; 16];
        let advantages = vec![0.0; 16];

        let sampler = MinibatchSampler::new(16);
        let batches: Vec<_> = sampler.minibatches(&rollout, &returns, &advantages).collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 16);
    }

    #[test]
    fn test_oversized_batch_yields_zero() {
        let rollout = rollout_of(8);
        let returns = vec![0.0; 8];
        let advantages = vec![0.0; 8];

        let sampler = MinibatchSampler::new(9);
        let batches: Vec<_> = sampler.minibatches(&rollout, &returns, &advantages).collect();
        assert!(batches.is_empty());
    }

    #[test]
    fn test_minibatch_fields_stay_aligned() {
        let n = 12;
        let rollout = rollout_of(n);
        // Make returns/advantages recognizably index-dependent.
        let returns: Vec<f32> = (0..n).map(|i| 100.0 + i as f32).collect();
        let advantages: Vec<f32> = (0..n).map(|i| -(i as f32)).collect();

        let sampler = MinibatchSampler::new(4);
        for batch in sampler.minibatches(&rollout, &returns, &advantages) {
            assert_eq!(batch.len(), 4);
            for k in 0..batch.len() {
                // Recover the sampled index from the action payload and
                // verify every column agrees with it.
                let idx = batch.actions[k].0[0] as usize;
                assert_eq!(batch.returns[k], 100.0 + idx as f32);
                assert_eq!(batch.advantages[k], -(idx as f32));
                assert_eq!(
                    &batch.states[k * 2..k * 2 + 2],
                    &[(idx * 2) as f32, (idx * 2 + 1) as f32]
                );
            }
        }
    }

    #[test]
    fn test_pass_is_restartable() {
        let rollout = rollout_of(10);
        let returns = vec![0.0; 10];
        let advantages = vec![0.0; 10];

        let sampler = MinibatchSampler::new(5);
        let first: Vec<_> = sampler.minibatches(&rollout, &returns, &advantages).collect();
        let second: Vec<_> = sampler.minibatches(&rollout, &returns, &advantages).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_tensor_helpers_shapes() {
        let rollout = rollout_of(6);
        let returns = vec![0.5; 6];
        let advantages = vec![0.1; 6];

        let sampler = MinibatchSampler::new(3);
        let batch = sampler
            .minibatches(&rollout, &returns, &advantages)
            .next()
            .unwrap();

        type B = burn::backend::NdArray<f32>;
        let device = Default::default();
        assert_eq!(batch.states_tensor::<B>(&device).dims(), [3, 2]);
        assert_eq!(batch.returns_tensor::<B>(&device).dims(), [3]);
        assert_eq!(batch.advantages_tensor::<B>(&device).dims(), [3]);
    }
}
