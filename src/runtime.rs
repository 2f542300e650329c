//! Process-wide runtime configuration.
//!
//! Settings that would otherwise live in ambient global state (RNG seeding,
//! worker provisioning for the multi-worker rollout extension) are carried
//! in an explicit struct handed to the trainer at startup.

use serde::{Deserialize, Serialize};

/// Runtime settings applied once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Seed for the process RNG used by action sampling. `None` keeps the
    /// default entropy-based seeding. Minibatch index draws use the thread
    /// RNG and are not affected.
    pub seed: Option<u64>,
    /// Number of rollout workers. The sequential core supports exactly one;
    /// a multi-worker extension would fan rollout collection out over this
    /// many independent environment instances.
    pub rollout_workers: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            rollout_workers: 1,
        }
    }
}

impl RuntimeConfig {
    /// Create a runtime configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the rollout worker count.
    pub fn with_rollout_workers(mut self, workers: usize) -> Self {
        self.rollout_workers = workers;
        self
    }

    /// Apply the settings to the process.
    pub fn apply(&self) {
        if let Some(seed) = self.seed {
            fastrand::seed(seed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_runtime() {
        let runtime = RuntimeConfig::new();
        assert_eq!(runtime.seed, None);
        assert_eq!(runtime.rollout_workers, 1);
    }

    #[test]
    fn test_seed_makes_sampling_reproducible() {
        let runtime = RuntimeConfig::new().with_seed(7);

        runtime.apply();
        let first: Vec<f32> = (0..8).map(|_| fastrand::f32()).collect();

        runtime.apply();
        let second: Vec<f32> = (0..8).map(|_| fastrand::f32()).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_runtime_serde_roundtrip() {
        let runtime = RuntimeConfig::new().with_seed(42).with_rollout_workers(4);
        let json = serde_json::to_string(&runtime).unwrap();
        let restored: RuntimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed, Some(42));
        assert_eq!(restored.rollout_workers, 4);
    }
}
