//! Exponentially averaged episode reward.

/// Running average of completed-episode rewards.
///
/// The first completed episode seeds the average; afterwards each episode
/// blends in with weight `1 - decay`.
#[derive(Debug, Clone)]
pub struct RunningReward {
    value: Option<f32>,
    decay: f32,
}

impl RunningReward {
    /// Create with the conventional 0.99 decay.
    pub fn new() -> Self {
        Self::with_decay(0.99)
    }

    /// Create with a custom decay in [0, 1).
    pub fn with_decay(decay: f32) -> Self {
        Self { value: None, decay }
    }

    /// Fold in one completed episode's reward and return the new average.
    pub fn update(&mut self, episode_reward: f32) -> f32 {
        let next = match self.value {
            None => episode_reward,
            Some(current) => current * self.decay + episode_reward * (1.0 - self.decay),
        };
        self.value = Some(next);
        next
    }

    /// Current average, or 0.0 before any episode has completed.
    pub fn get(&self) -> f32 {
        self.value.unwrap_or(0.0)
    }
}

impl Default for RunningReward {
    fn default() -> Self {
        Self::new()
    }
}
