//! PPO training loop.
//!
//! Two nested loops: the outer one runs `max_iter` rollout/train cycles, the
//! inner one steps the environment `horizon` times per rollout. After each
//! rollout the trainer computes GAE targets, then runs `epochs` passes of
//! minibatch optimization with the clipped surrogate objective before
//! returning to collection. Everything is strictly sequential: a rollout is
//! fully collected before training touches it, and the buffer is consumed by
//! exactly one training pass.
//!
//! The policy pair is owned here: the new policy (actor + critic) is the only
//! thing the optimizers mutate, while the old policy is a frozen clone of the
//! actor, replaced wholesale at synchronization points and never stepped.
//!
//! Failure handling is fatal-only: a non-finite observation or reward from
//! the environment aborts training with
//! [`TrainError::EnvironmentFailure`]; there are no retries.

use std::marker::PhantomData;

use burn::grad_clipping::GradientClippingConfig;
use burn::module::AutodiffModule;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::Tensor;

use crate::algorithms::action_policy::{ActionPolicy, PolicyOutput};
use crate::algorithms::actor_critic::{ActorModel, CriticModel};
use crate::algorithms::gae::{compute_gae, normalize_advantages};
use crate::algorithms::policy_loss::{ppo_clip_loss, value_loss};
use crate::buffers::minibatch::MinibatchSampler;
use crate::buffers::rollout::RolloutBuffer;
use crate::config::{PolicySync, TrainerConfig};
use crate::core::transition::{Rollout, Transition};
use crate::environment::{Environment, StepResult};
use crate::error::TrainError;
use crate::metrics::logger::TrainingSnapshot;
use crate::metrics::running_reward::RunningReward;
use crate::runtime::RuntimeConfig;

/// PPO trainer.
///
/// Generic over the autodiff backend `B` and the action policy `P`
/// (discrete or continuous, selected by configuration).
pub struct Trainer<B, P>
where
    B: AutodiffBackend,
    P: ActionPolicy<B>,
{
    config: TrainerConfig,
    runtime: RuntimeConfig,
    _marker: PhantomData<(B, P)>,
}

impl<B, P> Trainer<B, P>
where
    B: AutodiffBackend,
    B::Device: Default + Clone,
    P: ActionPolicy<B>,
{
    /// Create a trainer, validating the configuration and applying the
    /// runtime settings.
    pub fn new(config: TrainerConfig, runtime: RuntimeConfig) -> Result<Self, TrainError> {
        config.validate()?;
        runtime.apply();
        Ok(Self {
            config,
            runtime,
            _marker: PhantomData,
        })
    }

    /// Get the training configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Get the runtime configuration.
    pub fn runtime(&self) -> &RuntimeConfig {
        &self.runtime
    }

    /// Run the training loop to completion.
    ///
    /// # Arguments
    ///
    /// - `actor` / `critic`: the new policy, optimized in place
    /// - `env`: the environment; its internal state advances as the only
    ///   side effect of collection
    /// - `callback`: invoked once per iteration with a [`TrainingSnapshot`]
    ///
    /// # Returns
    ///
    /// The trained actor and critic after `max_iter` iterations, or the
    /// first fatal error.
    pub fn run<Actor, Critic, E, F>(
        &self,
        mut actor: Actor,
        mut critic: Critic,
        mut env: E,
        mut callback: F,
    ) -> Result<(Actor, Critic), TrainError>
    where
        Actor: ActorModel<B, P> + AutodiffModule<B>,
        Critic: CriticModel<B> + AutodiffModule<B>,
        E: Environment<P::Action>,
        F: FnMut(&TrainingSnapshot),
    {
        let device = B::Device::default();
        let obs_size = env.obs_size();

        let mut optimizer_actor = self.create_optimizer::<Actor>();
        let mut optimizer_critic = self.create_optimizer::<Critic>();

        // Initial synchronization: the old policy starts as a snapshot of
        // the new one.
        let mut old_actor = actor.clone();

        let mut buffer = RolloutBuffer::<P::Action>::new(self.config.horizon, obs_size);
        let mut running = RunningReward::new();

        let mut env_steps = 0usize;
        let mut episodes = 0usize;
        let mut episode_reward = 0.0f32;
        let mut episode_steps = 0usize;

        let mut state = env.reset();
        ensure_finite_obs(&state, env_steps)?;

        for iteration in 0..self.config.max_iter {
            if self.config.policy_sync == PolicySync::EveryIteration && iteration > 0 {
                old_actor = actor.clone();
            }

            // COLLECTING: step the environment under the current policy,
            // letting episode boundaries fall anywhere inside the rollout.
            for _ in 0..self.config.horizon {
                let action = sample_action::<B, P, Actor>(&actor, &state, obs_size, &device);
                let value = state_value::<B, Critic>(&critic, &state, obs_size, &device);

                let result = env.step(&action);
                env_steps += 1;
                ensure_finite_step(&result, env_steps)?;

                episode_steps += 1;
                episode_reward += result.reward;

                let capped = self
                    .config
                    .max_steps_per_episode
                    .map_or(false, |cap| episode_steps >= cap);
                let done = result.done || capped;

                let previous = std::mem::replace(&mut state, result.next_state);
                buffer.push(Transition::new(previous, action, result.reward, done, value));

                if done {
                    running.update(episode_reward);
                    episodes += 1;
                    episode_reward = 0.0;
                    episode_steps = 0;
                    state = env.reset();
                    ensure_finite_obs(&state, env_steps)?;
                }
            }

            // Horizon boundary: bootstrap with 0 after a terminal step,
            // otherwise with the critic's estimate of the next state.
            let bootstrap = if buffer.last_done() {
                0.0
            } else {
                state_value::<B, Critic>(&critic, &state, obs_size, &device)
            };
            let rollout = buffer.complete(bootstrap);

            // TRAINING: GAE targets once per rollout, then minibatch epochs.
            let (mut advantages, returns) = compute_gae(
                &rollout.rewards,
                &rollout.values,
                &rollout.dones,
                self.config.gamma,
                self.config.gae_lambda,
            );
            normalize_advantages(&mut advantages);

            let (new_actor, new_critic, (policy_loss, critic_loss, entropy)) = self
                .train_on_rollout(
                    actor,
                    critic,
                    &old_actor,
                    &rollout,
                    &returns,
                    &advantages,
                    &mut optimizer_actor,
                    &mut optimizer_critic,
                    &device,
                );
            actor = new_actor;
            critic = new_critic;

            let snapshot = TrainingSnapshot::new(iteration + 1, env_steps, episodes, running.get())
                .with_losses(policy_loss, critic_loss, entropy);
            callback(&snapshot);
        }

        Ok((actor, critic))
    }

    /// Adam with a small epsilon and optional gradient-norm clipping.
    fn create_optimizer<M: AutodiffModule<B>>(&self) -> impl Optimizer<M, B> {
        let mut adam = AdamConfig::new().with_epsilon(1e-5);
        if let Some(max_norm) = self.config.max_grad_norm {
            adam = adam.with_grad_clipping(Some(GradientClippingConfig::Norm(max_norm)));
        }
        adam.init()
    }

    /// Run `epochs` minibatch passes over one rollout.
    ///
    /// `old_actor` is only read; its parameters are never touched by either
    /// optimizer.
    #[allow(clippy::too_many_arguments)]
    fn train_on_rollout<Actor, Critic, OA, OC>(
        &self,
        mut actor: Actor,
        mut critic: Critic,
        old_actor: &Actor,
        rollout: &Rollout<P::Action>,
        returns: &[f32],
        advantages: &[f32],
        optimizer_actor: &mut OA,
        optimizer_critic: &mut OC,
        device: &B::Device,
    ) -> (Actor, Critic, (f32, f32, f32))
    where
        Actor: ActorModel<B, P> + AutodiffModule<B>,
        Critic: CriticModel<B> + AutodiffModule<B>,
        OA: Optimizer<Actor, B>,
        OC: Optimizer<Critic, B>,
    {
        let sampler = MinibatchSampler::new(self.config.mini_batch_size);

        let mut total_policy_loss = 0.0f32;
        let mut total_value_loss = 0.0f32;
        let mut total_entropy = 0.0f32;
        let mut updates = 0usize;

        for _epoch in 0..self.config.epochs {
            for batch in sampler.minibatches(rollout, returns, advantages) {
                let states = batch.states_tensor::<B>(device);
                let batch_returns = batch.returns_tensor::<B>(device);
                let batch_advantages = batch.advantages_tensor::<B>(device);

                // Old-policy log probs, detached: the frozen snapshot only
                // ever contributes a constant to the ratio.
                let old_output = ActorModel::<B, P>::forward(old_actor, states.clone());
                let old_log_probs = old_output.log_prob(&batch.actions, device).detach();

                // Actor update.
                let output = ActorModel::<B, P>::forward(&actor, states.clone());
                let log_probs = output.log_prob(&batch.actions, device);
                let entropy = output.entropy().mean();

                let policy_loss = ppo_clip_loss(
                    log_probs,
                    old_log_probs,
                    batch_advantages,
                    self.config.clip_epsilon,
                );

                total_policy_loss += scalar_of(&policy_loss);
                total_entropy += scalar_of(&entropy);

                let actor_objective =
                    policy_loss - entropy.mul_scalar(self.config.entropy_coef);

                let grads = actor_objective.backward();
                let grads = GradientsParams::from_grads(grads, &actor);
                actor = optimizer_actor.step(self.config.actor_lr, actor, grads);

                // Critic update.
                let values: Tensor<B, 1> =
                    CriticModel::forward(&critic, states).flatten(0, 1);
                let critic_loss =
                    value_loss(values, batch_returns).mul_scalar(self.config.vf_coef);

                total_value_loss += scalar_of(&critic_loss);

                let grads = critic_loss.backward();
                let grads = GradientsParams::from_grads(grads, &critic);
                critic = optimizer_critic.step(self.config.critic_lr, critic, grads);

                updates += 1;
            }
        }

        let n = updates.max(1) as f32;
        (
            actor,
            critic,
            (
                total_policy_loss / n,
                total_value_loss / n,
                total_entropy / n,
            ),
        )
    }
}

/// Sample one action from the actor for a single observation.
fn sample_action<B, P, Actor>(
    actor: &Actor,
    state: &[f32],
    obs_size: usize,
    device: &B::Device,
) -> P::Action
where
    B: AutodiffBackend,
    P: ActionPolicy<B>,
    Actor: ActorModel<B, P>,
{
    let obs = Tensor::<B, 1>::from_floats(state, device).reshape([1, obs_size]);
    let output = ActorModel::<B, P>::forward(actor, obs);
    let (mut actions, _log_probs) = output.sample(device);
    actions.remove(0)
}

/// Critic estimate for a single observation.
fn state_value<B, Critic>(
    critic: &Critic,
    state: &[f32],
    obs_size: usize,
    device: &B::Device,
) -> f32
where
    B: AutodiffBackend,
    Critic: CriticModel<B>,
{
    let obs = Tensor::<B, 1>::from_floats(state, device).reshape([1, obs_size]);
    let values = CriticModel::forward(critic, obs);
    values.into_data().as_slice::<f32>().unwrap()[0]
}

/// Extract the scalar from a single-element tensor.
fn scalar_of<B: AutodiffBackend>(tensor: &Tensor<B, 1>) -> f32 {
    tensor.clone().into_data().as_slice::<f32>().unwrap()[0]
}

fn ensure_finite_obs(state: &[f32], step: usize) -> Result<(), TrainError> {
    if state.iter().any(|x| !x.is_finite()) {
        return Err(TrainError::EnvironmentFailure {
            step,
            detail: "non-finite observation".to_string(),
        });
    }
    Ok(())
}

fn ensure_finite_step(result: &StepResult, step: usize) -> Result<(), TrainError> {
    if !result.reward.is_finite() {
        return Err(TrainError::EnvironmentFailure {
            step,
            detail: format!("non-finite reward {}", result.reward),
        });
    }
    ensure_finite_obs(&result.next_state, step)
}
