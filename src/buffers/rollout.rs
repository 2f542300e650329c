//! Rollout buffer for on-policy collection.
//!
//! Accumulates transitions during the collection phase, then seals them into
//! a [`Rollout`] once the horizon is reached and the bootstrap value is
//! known. Cleared after every training pass; rollouts may span multiple
//! episodes.

use crate::algorithms::action_policy::ActionValue;
use crate::core::transition::{Rollout, Transition};

/// Buffer holding one in-progress rollout.
pub struct RolloutBuffer<A: ActionValue> {
    states: Vec<f32>,
    actions: Vec<A>,
    rewards: Vec<f32>,
    dones: Vec<bool>,
    values: Vec<f32>,
    horizon: usize,
    obs_size: usize,
}

impl<A: ActionValue> RolloutBuffer<A> {
    /// Create a new buffer for rollouts of `horizon` steps.
    pub fn new(horizon: usize, obs_size: usize) -> Self {
        Self {
            states: Vec::with_capacity(horizon * obs_size),
            actions: Vec::with_capacity(horizon),
            rewards: Vec::with_capacity(horizon),
            dones: Vec::with_capacity(horizon),
            values: Vec::with_capacity(horizon + 1),
            horizon,
            obs_size,
        }
    }

    /// Append one transition.
    pub fn push(&mut self, transition: Transition<A>) {
        debug_assert_eq!(transition.state.len(), self.obs_size);
        debug_assert!(self.len() < self.horizon, "rollout already full");

        self.states.extend_from_slice(&transition.state);
        self.actions.push(transition.action);
        self.rewards.push(transition.reward);
        self.dones.push(transition.done);
        self.values.push(transition.value);
    }

    /// Number of transitions collected so far.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Check if no transitions have been collected.
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Check if the horizon has been reached.
    pub fn is_full(&self) -> bool {
        self.len() >= self.horizon
    }

    /// Whether the most recent transition ended its episode.
    ///
    /// Decides the bootstrap value at the horizon boundary: a terminal last
    /// step bootstraps with `0.0`.
    pub fn last_done(&self) -> bool {
        self.dones.last().copied().unwrap_or(false)
    }

    /// Seal the buffer into a [`Rollout`], appending the bootstrap value.
    ///
    /// The buffer is left empty and ready for the next rollout. The returned
    /// rollout upholds `values.len() == rewards.len() + 1`.
    pub fn complete(&mut self, bootstrap_value: f32) -> Rollout<A> {
        let mut values = std::mem::take(&mut self.values);
        values.push(bootstrap_value);

        let rollout = Rollout {
            states: std::mem::take(&mut self.states),
            actions: std::mem::take(&mut self.actions),
            rewards: std::mem::take(&mut self.rewards),
            dones: std::mem::take(&mut self.dones),
            values,
            obs_size: self.obs_size,
        };

        debug_assert_eq!(rollout.values.len(), rollout.rewards.len() + 1);
        rollout
    }
}
