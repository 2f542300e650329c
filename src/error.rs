//! Error taxonomy for the training loop.
//!
//! Every failure is fatal and surfaces to the caller of the trainer; there
//! are no retries and no partial-failure recovery. Degenerate advantage
//! batches are not errors; the ε-floored normalization absorbs them.

use std::fmt;

use crate::config::ConfigError;

/// Fatal training error.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainError {
    /// The environment produced a non-finite observation or reward, or
    /// otherwise violated its contract. Not recoverable.
    EnvironmentFailure {
        /// Environment step count at which the failure surfaced.
        step: usize,
        /// What the environment returned.
        detail: String,
    },
    /// The configuration failed validation before training started.
    Config(ConfigError),
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::EnvironmentFailure { step, detail } => {
                write!(f, "environment failure at step {}: {}", step, detail)
            }
            TrainError::Config(err) => write!(f, "invalid configuration: {}", err),
        }
    }
}

impl std::error::Error for TrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrainError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for TrainError {
    fn from(err: ConfigError) -> Self {
        TrainError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_failure_display() {
        let err = TrainError::EnvironmentFailure {
            step: 42,
            detail: "reward is NaN".to_string(),
        };
        assert_eq!(err.to_string(), "environment failure at step 42: reward is NaN");
    }

    #[test]
    fn test_config_error_conversion() {
        let config_err = ConfigError::InvalidCount {
            field: "horizon",
            value: 0,
        };
        let err: TrainError = config_err.clone().into();
        assert_eq!(err, TrainError::Config(config_err));
        assert!(err.to_string().contains("horizon"));
    }
}
