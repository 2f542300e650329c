//! Rollout collection and minibatch sampling.

pub mod minibatch;
pub mod rollout;

pub use minibatch::{Minibatch, MinibatchSampler};
pub use rollout::RolloutBuffer;
