//! # ppo_control: PPO training core for continuous control
//!
//! A single-environment Proximal Policy Optimization trainer built on Burn.
//! The crate owns the training loop: fixed-horizon rollout collection,
//! Generalized Advantage Estimation, sampling-with-replacement minibatches,
//! the clipped surrogate objective, and old/new policy synchronization.
//! The environment and the policy/value networks stay behind traits.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     Trainer (outer loop)                  │
//! │                                                          │
//! │  COLLECTING ──────────────► RolloutBuffer                │
//! │   env.step under new policy  horizon transitions          │
//! │        │                        │ + bootstrap value       │
//! │        ▼                        ▼                         │
//! │  horizon boundary ────────► compute_gae / normalize       │
//! │                                 │                         │
//! │                                 ▼                         │
//! │  TRAINING: epochs × MinibatchSampler ─► clipped surrogate │
//! │   (old policy frozen, new policy stepped by Adam)         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ppo_control::{ContinuousPolicy, RuntimeConfig, Trainer, TrainerConfig};
//!
//! let config = TrainerConfig::new()
//!     .with_horizon(2048)
//!     .with_mini_batch_size(32)
//!     .with_clip_epsilon(0.3);
//!
//! let trainer: Trainer<B, ContinuousPolicy> =
//!     Trainer::new(config, RuntimeConfig::new().with_seed(42))?;
//! let (actor, critic) = trainer.run(actor, critic, env, |stats| logger.log(stats))?;
//! ```

pub mod algorithms;
pub mod buffers;
pub mod config;
pub mod core;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod trainer;

pub use crate::core::transition::{Rollout, Transition};

pub use algorithms::action_policy::{
    ActionPolicy, ActionValue, ContinuousAction, ContinuousPolicy, DiscreteAction,
    DiscretePolicy, DiscretePolicyOutput, GaussianPolicyOutput, PolicyOutput,
};
pub use algorithms::actor_critic::{ActorModel, CriticModel};
pub use algorithms::gae::{compute_gae, normalize_advantages};
pub use algorithms::policy_loss::{ppo_clip_loss, ppo_clip_loss_scalar, value_loss, value_loss_scalar};

pub use buffers::minibatch::{Minibatch, MinibatchSampler};
pub use buffers::rollout::RolloutBuffer;

pub use config::{ConfigError, PolicySync, TrainerConfig};
pub use environment::{Environment, StepResult};
pub use error::TrainError;
pub use runtime::RuntimeConfig;
pub use trainer::Trainer;

pub use metrics::logger::{ConsoleLogger, CsvLogger, MetricsLogger, MultiLogger, TrainingSnapshot};
pub use metrics::running_reward::RunningReward;
