//! Training loggers.
//!
//! The trainer emits a [`TrainingSnapshot`] per iteration through its
//! callback; the logger implementations here render those snapshots to the
//! console or to a CSV file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// Per-iteration training snapshot.
#[derive(Debug, Clone)]
pub struct TrainingSnapshot {
    /// Outer iteration index (completed rollouts).
    pub iteration: usize,
    /// Total environment steps so far.
    pub env_steps: usize,
    /// Completed episodes so far.
    pub episodes: usize,
    /// Exponentially averaged episode reward.
    pub running_reward: f32,
    /// Mean actor loss over this iteration's minibatch updates.
    pub policy_loss: f32,
    /// Mean critic loss over this iteration's minibatch updates.
    pub value_loss: f32,
    /// Mean policy entropy over this iteration's minibatch updates.
    pub entropy: f32,
}

impl TrainingSnapshot {
    /// Create a snapshot with zeroed losses.
    pub fn new(iteration: usize, env_steps: usize, episodes: usize, running_reward: f32) -> Self {
        Self {
            iteration,
            env_steps,
            episodes,
            running_reward,
            policy_loss: 0.0,
            value_loss: 0.0,
            entropy: 0.0,
        }
    }

    /// Set the loss components.
    pub fn with_losses(mut self, policy_loss: f32, value_loss: f32, entropy: f32) -> Self {
        self.policy_loss = policy_loss;
        self.value_loss = value_loss;
        self.entropy = entropy;
        self
    }
}

/// Logger backend.
pub trait MetricsLogger: Send {
    /// Log one snapshot.
    fn log(&mut self, snapshot: &TrainingSnapshot);

    /// Flush buffered output.
    fn flush(&mut self);
}

/// Console logger with tabular formatting.
pub struct ConsoleLogger {
    log_interval: usize,
    last_log_iter: usize,
    start_time: Instant,
    show_header: bool,
}

impl ConsoleLogger {
    /// Create a console logger that prints every `log_interval` iterations.
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval,
            last_log_iter: 0,
            start_time: Instant::now(),
            show_header: true,
        }
    }

    fn print_header(&self) {
        println!(
            "{:>6} {:>10} {:>8} {:>12} {:>10} {:>10} {:>10} {:>8}",
            "Iter", "EnvSteps", "Episodes", "RunReward", "Policy", "Value", "Entropy", "FPS"
        );
        println!("{}", "-".repeat(80));
    }
}

impl MetricsLogger for ConsoleLogger {
    fn log(&mut self, snapshot: &TrainingSnapshot) {
        if snapshot.iteration < self.last_log_iter + self.log_interval {
            return;
        }

        if self.show_header {
            self.print_header();
            self.show_header = false;
        }

        let elapsed = self.start_time.elapsed().as_secs_f32();
        let fps = if elapsed > 0.0 {
            snapshot.env_steps as f32 / elapsed
        } else {
            0.0
        };

        println!(
            "{:>6} {:>10} {:>8} {:>12.3} {:>10.4} {:>10.4} {:>10.4} {:>8.0}",
            snapshot.iteration,
            snapshot.env_steps,
            snapshot.episodes,
            snapshot.running_reward,
            snapshot.policy_loss,
            snapshot.value_loss,
            snapshot.entropy,
            fps
        );

        self.last_log_iter = snapshot.iteration;
    }

    fn flush(&mut self) {
        // stdout is line-buffered
    }
}

/// CSV file logger for offline analysis.
pub struct CsvLogger {
    writer: BufWriter<File>,
    start_time: Instant,
}

impl CsvLogger {
    /// Create a CSV logger writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "iteration,env_steps,episodes,running_reward,policy_loss,value_loss,entropy,elapsed_secs"
        )?;

        Ok(Self {
            writer,
            start_time: Instant::now(),
        })
    }
}

impl MetricsLogger for CsvLogger {
    fn log(&mut self, snapshot: &TrainingSnapshot) {
        let elapsed = self.start_time.elapsed().as_secs_f32();
        let _ = writeln!(
            self.writer,
            "{},{},{},{:.4},{:.6},{:.6},{:.6},{:.2}",
            snapshot.iteration,
            snapshot.env_steps,
            snapshot.episodes,
            snapshot.running_reward,
            snapshot.policy_loss,
            snapshot.value_loss,
            snapshot.entropy,
            elapsed
        );
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

impl Drop for CsvLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Fan-out logger writing to several backends.
pub struct MultiLogger {
    loggers: Vec<Box<dyn MetricsLogger>>,
}

impl MultiLogger {
    /// Create an empty multi-logger.
    pub fn new() -> Self {
        Self {
            loggers: Vec::new(),
        }
    }

    /// Add a backend.
    pub fn add<L: MetricsLogger + 'static>(mut self, logger: L) -> Self {
        self.loggers.push(Box::new(logger));
        self
    }
}

impl Default for MultiLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsLogger for MultiLogger {
    fn log(&mut self, snapshot: &TrainingSnapshot) {
        for logger in &mut self.loggers {
            logger.log(snapshot);
        }
    }

    fn flush(&mut self) {
        for logger in &mut self.loggers {
            logger.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_builder() {
        let snapshot = TrainingSnapshot::new(10, 20_480, 15, 120.5).with_losses(0.2, 0.8, 1.4);
        assert_eq!(snapshot.iteration, 10);
        assert_eq!(snapshot.env_steps, 20_480);
        assert_eq!(snapshot.episodes, 15);
        assert!((snapshot.running_reward - 120.5).abs() < 1e-6);
        assert!((snapshot.policy_loss - 0.2).abs() < 1e-6);
        assert!((snapshot.value_loss - 0.8).abs() < 1e-6);
        assert!((snapshot.entropy - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_console_logger_interval_gating() {
        let mut logger = ConsoleLogger::new(10);
        // Below the interval: skipped. At the interval: printed.
        logger.log(&TrainingSnapshot::new(5, 500, 1, 0.0));
        logger.log(&TrainingSnapshot::new(10, 1000, 2, 0.0));
        assert_eq!(logger.last_log_iter, 10);
    }

    #[test]
    fn test_multi_logger_fanout() {
        let mut multi = MultiLogger::new().add(ConsoleLogger::new(1));
        multi.log(&TrainingSnapshot::new(1, 100, 1, 5.0));
        multi.flush();
    }
}
