//! Model contracts for the policy pair.
//!
//! The trainer treats the policy and value function as opaque differentiable
//! modules:
//!
//! - [`ActorModel`]: maps a batch of states to an action distribution
//!   (`choose_action`, `log_prob`, `entropy` come from the distribution).
//! - [`CriticModel`]: maps a batch of states to scalar value estimates
//!   (`get_value`).
//!
//! Both traits work with any `B: Backend`; the trainer additionally requires
//! `AutodiffModule` so the new policy can be optimized. The old policy is a
//! plain `clone()` of the actor, replaced wholesale at synchronization points
//! and never stepped; cloning a Burn module snapshots its parameters.

use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::action_policy::ActionPolicy;

/// Policy network: states in, action distribution out.
pub trait ActorModel<B, P>: Module<B> + Clone + Send + 'static
where
    B: Backend,
    P: ActionPolicy<B>,
{
    /// Forward pass over a batch of observations `[batch, obs_size]`.
    fn forward(&self, states: Tensor<B, 2>) -> P::Output;
}

/// Value network: states in, scalar estimates out.
pub trait CriticModel<B>: Module<B> + Clone + Send + 'static
where
    B: Backend,
{
    /// Forward pass over a batch of observations `[batch, obs_size]`.
    ///
    /// Returns value estimates `[batch, 1]`.
    fn forward(&self, states: Tensor<B, 2>) -> Tensor<B, 2>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::action_policy::{DiscretePolicy, DiscretePolicyOutput, PolicyOutput};
    use burn::backend::NdArray;
    use burn::nn::{Linear, LinearConfig};

    type B = NdArray<f32>;

    #[derive(Module, Debug, Clone)]
    struct TinyActor<Back: Backend> {
        head: Linear<Back>,
    }

    #[derive(Module, Debug, Clone)]
    struct TinyCritic<Back: Backend> {
        head: Linear<Back>,
    }

    impl<Back: Backend> ActorModel<Back, DiscretePolicy> for TinyActor<Back> {
        fn forward(&self, states: Tensor<Back, 2>) -> DiscretePolicyOutput<Back> {
            DiscretePolicyOutput::new(self.head.forward(states))
        }
    }

    impl<Back: Backend> CriticModel<Back> for TinyCritic<Back> {
        fn forward(&self, states: Tensor<Back, 2>) -> Tensor<Back, 2> {
            self.head.forward(states)
        }
    }

    #[test]
    fn test_actor_forward_shapes() {
        let device = Default::default();
        let actor = TinyActor::<B> {
            head: LinearConfig::new(4, 3).init(&device),
        };

        let obs = Tensor::<B, 2>::zeros([8, 4], &device);
        let output = ActorModel::<B, DiscretePolicy>::forward(&actor, obs);

        assert_eq!(output.logits.dims(), [8, 3]);
        let (actions, log_probs) = output.sample(&device);
        assert_eq!(actions.len(), 8);
        assert_eq!(log_probs.len(), 8);
    }

    #[test]
    fn test_critic_forward_shapes() {
        let device = Default::default();
        let critic = TinyCritic::<B> {
            head: LinearConfig::new(4, 1).init(&device),
        };

        let obs = Tensor::<B, 2>::zeros([8, 4], &device);
        let values = CriticModel::forward(&critic, obs);
        assert_eq!(values.dims(), [8, 1]);
    }

    #[test]
    fn test_clone_snapshots_parameters() {
        // The old-policy mechanism relies on clone() freezing the parameter
        // values at the moment of synchronization.
        let device = Default::default();
        let actor = TinyActor::<B> {
            head: LinearConfig::new(2, 2).init(&device),
        };
        let snapshot = actor.clone();

        let obs = Tensor::<B, 2>::from_floats([[0.5, -0.5]], &device);
        let out_a = ActorModel::<B, DiscretePolicy>::forward(&actor, obs.clone())
            .logits
            .into_data();
        let out_b = ActorModel::<B, DiscretePolicy>::forward(&snapshot, obs)
            .logits
            .into_data();

        assert_eq!(
            out_a.as_slice::<f32>().unwrap(),
            out_b.as_slice::<f32>().unwrap()
        );
    }
}
