//! PPO on pendulum swing-up.
//!
//! A self-contained demonstration of the training loop on a classic
//! continuous-control task: swing a pendulum upright and hold it there by
//! applying bounded torque.
//!
//! # Network
//! - Separate actor/critic MLPs, tanh activations
//! - State-independent learned log-std for the Gaussian policy
//! - NdArray backend, runs on CPU

use burn::backend::ndarray::NdArray;
use burn::backend::Autodiff;
use burn::module::{Module, Param};
use burn::nn::{Linear, LinearConfig};
use burn::tensor::activation::tanh;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use ppo_control::{
    ActorModel, ConsoleLogger, ContinuousAction, ContinuousPolicy, CriticModel, Environment,
    GaussianPolicyOutput, MetricsLogger, RuntimeConfig, StepResult, Trainer, TrainerConfig,
};

type B = Autodiff<NdArray<f32>>;

// ============================================================================
// Environment: pendulum swing-up
// ============================================================================

const GRAVITY: f32 = 10.0;
const MASS: f32 = 1.0;
const LENGTH: f32 = 1.0;
const DT: f32 = 0.05;
const MAX_TORQUE: f32 = 2.0;
const MAX_SPEED: f32 = 8.0;

/// Pendulum with angle θ (0 = upright) and angular velocity.
///
/// Observation is `[cos θ, sin θ, θ_dot]`; reward penalizes angle error,
/// speed, and control effort. The task is continuing; episode length is
/// governed by the trainer's per-episode cap.
struct PendulumEnv {
    theta: f32,
    theta_dot: f32,
}

impl PendulumEnv {
    fn new() -> Self {
        Self {
            theta: std::f32::consts::PI,
            theta_dot: 0.0,
        }
    }

    fn observation(&self) -> Vec<f32> {
        vec![self.theta.cos(), self.theta.sin(), self.theta_dot]
    }
}

impl Environment<ContinuousAction> for PendulumEnv {
    fn obs_size(&self) -> usize {
        3
    }

    fn reset(&mut self) -> Vec<f32> {
        self.theta = std::f32::consts::PI * (2.0 * fastrand::f32() - 1.0);
        self.theta_dot = 2.0 * fastrand::f32() - 1.0;
        self.observation()
    }

    fn step(&mut self, action: &ContinuousAction) -> StepResult {
        let torque = action.0[0].clamp(-MAX_TORQUE, MAX_TORQUE);

        // Wrap θ into [-π, π] for the angle penalty.
        let angle = {
            let two_pi = 2.0 * std::f32::consts::PI;
            let wrapped = (self.theta + std::f32::consts::PI).rem_euclid(two_pi);
            wrapped - std::f32::consts::PI
        };
        let reward = -(angle.powi(2) + 0.1 * self.theta_dot.powi(2) + 0.001 * torque.powi(2));

        let accel = 3.0 * GRAVITY / (2.0 * LENGTH) * self.theta.sin()
            + 3.0 / (MASS * LENGTH * LENGTH) * torque;
        self.theta_dot = (self.theta_dot + accel * DT).clamp(-MAX_SPEED, MAX_SPEED);
        self.theta += self.theta_dot * DT;

        StepResult::new(self.observation(), reward, false)
    }
}

// ============================================================================
// Networks
// ============================================================================

const OBS_SIZE: usize = 3;
const ACTION_DIM: usize = 1;
const HIDDEN: usize = 64;

#[derive(Module, Debug, Clone)]
struct PendulumActor<Back: Backend> {
    fc1: Linear<Back>,
    fc2: Linear<Back>,
    mean_head: Linear<Back>,
    log_std: Param<Tensor<Back, 1>>,
}

impl<Back: Backend> PendulumActor<Back> {
    fn new(device: &Back::Device) -> Self {
        Self {
            fc1: LinearConfig::new(OBS_SIZE, HIDDEN).init(device),
            fc2: LinearConfig::new(HIDDEN, HIDDEN).init(device),
            mean_head: LinearConfig::new(HIDDEN, ACTION_DIM).init(device),
            log_std: Param::from_tensor(Tensor::zeros([ACTION_DIM], device)),
        }
    }
}

impl<Back: Backend> ActorModel<Back, ContinuousPolicy> for PendulumActor<Back> {
    fn forward(&self, states: Tensor<Back, 2>) -> GaussianPolicyOutput<Back> {
        let batch = states.dims()[0];

        let x = tanh(self.fc1.forward(states));
        let x = tanh(self.fc2.forward(x));
        let mean = self.mean_head.forward(x);

        let log_std = self
            .log_std
            .val()
            .unsqueeze::<2>()
            .expand([batch, ACTION_DIM]);

        GaussianPolicyOutput::new(
            mean,
            log_std,
            (vec![-MAX_TORQUE; ACTION_DIM], vec![MAX_TORQUE; ACTION_DIM]),
        )
    }
}

#[derive(Module, Debug, Clone)]
struct PendulumCritic<Back: Backend> {
    fc1: Linear<Back>,
    fc2: Linear<Back>,
    value_head: Linear<Back>,
}

impl<Back: Backend> PendulumCritic<Back> {
    fn new(device: &Back::Device) -> Self {
        Self {
            fc1: LinearConfig::new(OBS_SIZE, HIDDEN).init(device),
            fc2: LinearConfig::new(HIDDEN, HIDDEN).init(device),
            value_head: LinearConfig::new(HIDDEN, 1).init(device),
        }
    }
}

impl<Back: Backend> CriticModel<Back> for PendulumCritic<Back> {
    fn forward(&self, states: Tensor<Back, 2>) -> Tensor<Back, 2> {
        let x = tanh(self.fc1.forward(states));
        let x = tanh(self.fc2.forward(x));
        self.value_head.forward(x)
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let device = Default::default();

    let config = TrainerConfig::new()
        .with_horizon(512)
        .with_max_iter(40)
        .with_epochs(10)
        .with_mini_batch_size(64)
        .with_clip_epsilon(0.2)
        .with_actor_lr(3e-4)
        .with_critic_lr(1e-3)
        .with_max_steps_per_episode(Some(200));

    let runtime = RuntimeConfig::new().with_seed(42);

    println!("=== PPO pendulum swing-up ===");
    println!(
        "horizon {} | epochs {} | minibatch {} | clip {}",
        config.horizon, config.epochs, config.mini_batch_size, config.clip_epsilon
    );

    let trainer: Trainer<B, ContinuousPolicy> =
        Trainer::new(config, runtime).expect("valid configuration");

    let actor = PendulumActor::<B>::new(&device);
    let critic = PendulumCritic::<B>::new(&device);
    let env = PendulumEnv::new();

    let mut logger = ConsoleLogger::new(1);
    let result = trainer.run(actor, critic, env, |snapshot| logger.log(snapshot));

    match result {
        Ok(_) => {
            logger.flush();
            println!("training finished");
        }
        Err(err) => {
            eprintln!("training aborted: {}", err);
            std::process::exit(1);
        }
    }
}
