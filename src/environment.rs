//! Environment contract consumed by the training loop.
//!
//! The simulator itself is an external collaborator; the trainer only needs
//! `reset` and `step`. Observations and actions are fixed-length numeric
//! vectors. The trainer validates that everything an environment returns is
//! finite and treats any violation as a fatal
//! [`TrainError::EnvironmentFailure`](crate::error::TrainError).

use std::collections::HashMap;

use crate::algorithms::action_policy::ActionValue;

/// Result of stepping the environment once.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Observation after the step.
    pub next_state: Vec<f32>,
    /// Reward received.
    pub reward: f32,
    /// Episode ended at this step.
    pub done: bool,
    /// Auxiliary diagnostics; ignored by the training loop.
    pub info: HashMap<String, f32>,
}

impl StepResult {
    /// Create a step result with no auxiliary info.
    pub fn new(next_state: Vec<f32>, reward: f32, done: bool) -> Self {
        Self {
            next_state,
            reward,
            done,
            info: HashMap::new(),
        }
    }
}

/// A single simulated environment.
pub trait Environment<A: ActionValue>: Send {
    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Reset to an initial state and return the first observation.
    fn reset(&mut self) -> Vec<f32>;

    /// Advance one step under the given action.
    fn step(&mut self, action: &A) -> StepResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::action_policy::ContinuousAction;

    /// Counts down to a terminal state; observation is the remaining count.
    struct CountdownEnv {
        remaining: u32,
        start: u32,
    }

    impl Environment<ContinuousAction> for CountdownEnv {
        fn obs_size(&self) -> usize {
            1
        }

        fn reset(&mut self) -> Vec<f32> {
            self.remaining = self.start;
            vec![self.remaining as f32]
        }

        fn step(&mut self, _action: &ContinuousAction) -> StepResult {
            self.remaining = self.remaining.saturating_sub(1);
            StepResult::new(vec![self.remaining as f32], 1.0, self.remaining == 0)
        }
    }

    #[test]
    fn test_environment_contract() {
        let mut env = CountdownEnv {
            remaining: 0,
            start: 2,
        };

        let state = env.reset();
        assert_eq!(state, vec![2.0]);

        let result = env.step(&ContinuousAction(vec![0.0]));
        assert_eq!(result.next_state, vec![1.0]);
        assert!(!result.done);

        let result = env.step(&ContinuousAction(vec![0.0]));
        assert!(result.done);
        assert!(result.info.is_empty());

        // Reset starts a fresh episode.
        assert_eq!(env.reset(), vec![2.0]);
    }
}
