//! Core data types for the training loop.

pub mod transition;

pub use transition::{Rollout, Transition};
