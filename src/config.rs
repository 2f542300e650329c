//! Training configuration.
//!
//! [`TrainerConfig`] carries every knob the training loop recognizes, with
//! builder methods and validation. Invalid configurations are rejected by
//! [`TrainerConfig::validate`] before any environment interaction happens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// When the frozen old policy is refreshed from the optimized new policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolicySync {
    /// Synchronize once, before the first rollout, and never again.
    Once,
    /// Synchronize at the start of every outer iteration.
    #[default]
    EveryIteration,
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A count parameter must be positive.
    InvalidCount {
        field: &'static str,
        value: usize,
    },
    /// A parameter is outside its valid range.
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    /// `mini_batch_size` exceeds the horizon, so no full minibatch can ever
    /// be drawn.
    InvalidMinibatch {
        mini_batch_size: usize,
        horizon: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCount { field, value } => {
                write!(f, "{} must be > 0, got {}", field, value)
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(f, "{} must be in [{}, {}], got {}", field, min, max, value)
            }
            ConfigError::InvalidMinibatch {
                mini_batch_size,
                horizon,
            } => {
                write!(
                    f,
                    "mini_batch_size ({}) must not exceed horizon ({})",
                    mini_batch_size, horizon
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for the PPO training loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Environment steps collected per rollout.
    pub horizon: usize,
    /// Number of rollout/train cycles to run.
    pub max_iter: usize,
    /// Optimization passes over each rollout.
    pub epochs: usize,
    /// Samples per minibatch. Should divide `horizon` for full utilization;
    /// the sampler floor-divides and drops any remainder.
    pub mini_batch_size: usize,
    /// PPO clipping range ε.
    pub clip_epsilon: f32,
    /// Discount factor γ.
    pub gamma: f32,
    /// GAE trace-decay λ.
    pub gae_lambda: f32,
    /// Actor learning rate.
    pub actor_lr: f64,
    /// Critic learning rate.
    pub critic_lr: f64,
    /// Value-function loss coefficient.
    pub vf_coef: f32,
    /// Entropy bonus coefficient.
    pub entropy_coef: f32,
    /// Maximum gradient norm (`None` disables clipping).
    pub max_grad_norm: Option<f32>,
    /// Soft per-episode step cap. When set, an episode reaching the cap is
    /// treated as ended and the environment is reset, like a time-limit
    /// wrapper. `None` leaves episode length entirely to the environment.
    pub max_steps_per_episode: Option<usize>,
    /// When the old policy is refreshed from the new one.
    pub policy_sync: PolicySync,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            horizon: 2048,
            max_iter: 15_000,
            epochs: 10,
            mini_batch_size: 32,
            clip_epsilon: 0.3,
            gamma: 0.99,
            gae_lambda: 0.95,
            actor_lr: 4e-4,
            critic_lr: 4e-4,
            vf_coef: 0.5,
            entropy_coef: 0.01,
            max_grad_norm: Some(0.5),
            max_steps_per_episode: None,
            policy_sync: PolicySync::EveryIteration,
        }
    }
}

impl TrainerConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rollout horizon.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the number of training iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the number of optimization epochs per rollout.
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the minibatch size.
    pub fn with_mini_batch_size(mut self, size: usize) -> Self {
        self.mini_batch_size = size;
        self
    }

    /// Set the PPO clipping range.
    pub fn with_clip_epsilon(mut self, epsilon: f32) -> Self {
        self.clip_epsilon = epsilon;
        self
    }

    /// Set the discount factor.
    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the GAE trace-decay parameter.
    pub fn with_gae_lambda(mut self, lambda: f32) -> Self {
        self.gae_lambda = lambda;
        self
    }

    /// Set the actor learning rate.
    pub fn with_actor_lr(mut self, lr: f64) -> Self {
        self.actor_lr = lr;
        self
    }

    /// Set the critic learning rate.
    pub fn with_critic_lr(mut self, lr: f64) -> Self {
        self.critic_lr = lr;
        self
    }

    /// Set the value-function loss coefficient.
    pub fn with_vf_coef(mut self, coef: f32) -> Self {
        self.vf_coef = coef;
        self
    }

    /// Set the entropy bonus coefficient.
    pub fn with_entropy_coef(mut self, coef: f32) -> Self {
        self.entropy_coef = coef;
        self
    }

    /// Set the maximum gradient norm (`None` disables clipping).
    pub fn with_max_grad_norm(mut self, norm: Option<f32>) -> Self {
        self.max_grad_norm = norm;
        self
    }

    /// Set the per-episode step cap.
    pub fn with_max_steps_per_episode(mut self, cap: Option<usize>) -> Self {
        self.max_steps_per_episode = cap;
        self
    }

    /// Set the policy synchronization schedule.
    pub fn with_policy_sync(mut self, sync: PolicySync) -> Self {
        self.policy_sync = sync;
        self
    }

    /// Number of minibatch updates per epoch.
    pub fn updates_per_epoch(&self) -> usize {
        self.horizon / self.mini_batch_size
    }

    /// Validate all configuration parameters.
    ///
    /// # Validation Rules
    /// - `horizon`, `max_iter`, `epochs`, `mini_batch_size` must be > 0
    /// - `clip_epsilon` must be in (0, 1)
    /// - `gamma` and `gae_lambda` must be in [0, 1]
    /// - `mini_batch_size` must not exceed `horizon`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon == 0 {
            return Err(ConfigError::InvalidCount {
                field: "horizon",
                value: 0,
            });
        }
        if self.max_iter == 0 {
            return Err(ConfigError::InvalidCount {
                field: "max_iter",
                value: 0,
            });
        }
        if self.epochs == 0 {
            return Err(ConfigError::InvalidCount {
                field: "epochs",
                value: 0,
            });
        }
        if self.mini_batch_size == 0 {
            return Err(ConfigError::InvalidCount {
                field: "mini_batch_size",
                value: 0,
            });
        }

        if self.clip_epsilon <= 0.0 || self.clip_epsilon >= 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "clip_epsilon",
                value: self.clip_epsilon,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.gamma < 0.0 || self.gamma > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "gamma",
                value: self.gamma,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.gae_lambda < 0.0 || self.gae_lambda > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "gae_lambda",
                value: self.gae_lambda,
                min: 0.0,
                max: 1.0,
            });
        }

        if self.mini_batch_size > self.horizon {
            return Err(ConfigError::InvalidMinibatch {
                mini_batch_size: self.mini_batch_size,
                horizon: self.horizon,
            });
        }

        Ok(())
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}
