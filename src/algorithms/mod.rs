//! Algorithm components of the PPO core.
//!
//! - `gae`: Generalized Advantage Estimation
//! - `policy_loss`: clipped surrogate and critic loss functions
//! - `action_policy`: action/distribution capability interface
//! - `continuous_policy`: diagonal Gaussian utilities
//! - `actor_critic`: model contracts for the policy pair

pub mod action_policy;
pub mod actor_critic;
pub mod continuous_policy;
pub mod gae;
pub mod policy_loss;

pub use action_policy::{
    ActionPolicy, ActionValue, ContinuousAction, ContinuousPolicy, DiscreteAction,
    DiscretePolicy, DiscretePolicyOutput, GaussianPolicyOutput, PolicyOutput,
};
pub use actor_critic::{ActorModel, CriticModel};
pub use continuous_policy::{
    clamp_action, entropy_gaussian, log_prob_gaussian, sample_gaussian,
};
pub use gae::{compute_gae, normalize_advantages};
pub use policy_loss::{ppo_clip_loss, ppo_clip_loss_scalar, value_loss, value_loss_scalar};
