use ndarray::{Array1, Array2};
use rand::Rng;
use crate::agent::Agent;
use crate::coders::TileFeatures;
use crate::env::Action;
use crate::error::{Error, Result};
use crate::policy;
use crate::tiles::TileSet;


#[derive(Debug, Clone)]
pub struct ActorCriticParams {
    pub num_actions: usize,
    pub actor_step_size: f64,
    pub critic_step_size: f64,
    pub avg_reward_step_size: f64,
}


/// Average-reward actor-critic for continuing tasks.
///
/// The critic is a linear state-value estimate over tile features. The actor
/// keeps linear action preferences over the same features and acts with
/// their softmax.
pub struct ActorCriticAgent<C> {
    params: ActorCriticParams,
    coder: C,
    /// Action preferences. Indexes: action, tile
    pub actor_weights: Array2<f64>,
    /// State values. Index: tile
    pub critic_weights: Array1<f64>,
    avg_reward: f64,
    softmax_prob: Vec<f64>,
    prev_action: Action,
    prev_tiles: TileSet,
}

impl<C: TileFeatures> ActorCriticAgent<C> {
    pub fn new(params: ActorCriticParams, coder: C) -> Result<ActorCriticAgent<C>> {
        if params.num_actions == 0 {
            return Err(Error::InvalidConfig(String::from("num_actions must be positive")));
        }
        let capacity = coder.capacity();
        Ok(ActorCriticAgent {
            actor_weights: Array2::<f64>::zeros((params.num_actions, capacity)),
            critic_weights: Array1::<f64>::zeros(capacity),
            softmax_prob: vec![1.0 / params.num_actions as f64; params.num_actions],
            params,
            coder,
            avg_reward: 0.0,
            prev_action: 0,
            prev_tiles: Vec::new(),
        })
    }

    /// Current estimate of the average reward per step.
    pub fn avg_reward(&self) -> f64 {
        self.avg_reward
    }

    pub fn prev_action(&self) -> Action {
        self.prev_action
    }

    pub fn prev_tiles(&self) -> &[usize] {
        &self.prev_tiles
    }

    /// Policy probabilities for a set of active tiles.
    pub fn softmax_prob(&self, tiles: &[usize]) -> Vec<f64> {
        policy::softmax(&policy::linear_action_values(&self.actor_weights, tiles))
    }

    fn state_value(&self, tiles: &[usize]) -> f64 {
        tiles.iter().map(|&i| self.critic_weights[i]).sum()
    }

    fn act<R: Rng + ?Sized>(
        &mut self, state: &C::State, rng: &mut R
    ) -> Result<(Action, TileSet)> {
        let tiles = self.coder.active_tiles(state)?;
        self.softmax_prob = self.softmax_prob(&tiles);
        let action = policy::sample_action(&self.softmax_prob, rng)?;
        Ok((action, tiles))
    }
}

impl<C: TileFeatures> Agent for ActorCriticAgent<C> {
    type State = C::State;

    fn start<R: Rng + ?Sized>(&mut self, state: &C::State, rng: &mut R) -> Result<Action> {
        let (action, tiles) = self.act(state, rng)?;
        self.prev_action = action;
        self.prev_tiles = tiles;
        Ok(action)
    }

    fn step<R: Rng + ?Sized>(
        &mut self, reward: f64, state: &C::State, rng: &mut R
    ) -> Result<Action> {
        // Probabilities the previous action was drawn from
        let prev_prob = self.softmax_prob.clone();
        let (action, tiles) = self.act(state, rng)?;

        let delta = reward - self.avg_reward
            + self.state_value(&tiles) - self.state_value(&self.prev_tiles);
        self.avg_reward += self.params.avg_reward_step_size * delta;

        for &i in self.prev_tiles.iter() {
            self.critic_weights[i] += self.params.critic_step_size * delta;
        }
        for (a, mut row) in self.actor_weights.rows_mut().into_iter().enumerate() {
            let indicator = if a == self.prev_action { 1.0 } else { 0.0 };
            let grad = self.params.actor_step_size * delta * (indicator - prev_prob[a]);
            for &i in self.prev_tiles.iter() {
                row[i] += grad;
            }
        }

        self.prev_action = action;
        self.prev_tiles = tiles;
        Ok(action)
    }

    /// Continuing task, nothing to do.
    fn end(&mut self, _reward: f64) {}
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::coders::PendulumTileCoder;
    use crate::env::Environment;
    use crate::pendulum::{Pendulum, PendulumState};

    fn agent(num_tilings: u32) -> ActorCriticAgent<PendulumTileCoder> {
        let params = ActorCriticParams {
            num_actions: 3,
            actor_step_size: 1e-1 / num_tilings as f64,
            critic_step_size: 1.0 / num_tilings as f64,
            avg_reward_step_size: 1e-2,
        };
        let coder = PendulumTileCoder::new(4096, num_tilings, 8).unwrap();
        ActorCriticAgent::new(params, coder).unwrap()
    }

    #[test]
    fn softmax_over_preferences() {
        // Arrange
        let mut agent = agent(8);
        let mut coder = PendulumTileCoder::new(4096, 8, 8).unwrap();
        let tiles = coder.get_tiles(-PI, 0.0).unwrap();
        for (a, w) in [-1.0, 1.0, 2.0].iter().enumerate() {
            agent.actor_weights.row_mut(a).fill(w / 8.0);
        }
        // Act
        let p = agent.softmax_prob(&tiles);
        // Assert
        assert_abs_diff_eq!(p[0], 0.03511903, epsilon = 1e-6);
        assert_abs_diff_eq!(p[1], 0.25949646, epsilon = 1e-6);
        assert_abs_diff_eq!(p[2], 0.70538451, epsilon = 1e-6);
    }

    #[test]
    fn softmax_over_thirty_two_tiles() {
        let mut agent = agent(32);
        agent.actor_weights.row_mut(0).fill(0.00818123);
        agent.actor_weights.row_mut(1).fill(-0.01636246);
        agent.actor_weights.row_mut(2).fill(0.00818123);
        let tiles: Vec<usize> = (0..32).collect();
        let p = agent.softmax_prob(&tiles);
        assert_abs_diff_eq!(p[0], 0.40717638, epsilon = 1e-6);
        assert_abs_diff_eq!(p[1], 0.18564724, epsilon = 1e-6);
        assert_abs_diff_eq!(p[2], 0.40717638, epsilon = 1e-6);
    }

    #[test]
    fn start_from_rest() {
        let mut agent = agent(8);
        let mut rng = StdRng::seed_from_u64(0);
        let action = agent.start(&PendulumState::RESTING, &mut rng).unwrap();
        assert!(action < 3);
        assert_eq!(agent.prev_tiles().to_vec(), (0..8).collect::<Vec<usize>>());
    }

    #[test]
    fn first_step_updates() {
        // Arrange
        let mut agent = agent(8);
        let mut env = Pendulum::new();
        let mut rng = StdRng::seed_from_u64(0);
        let start = env.start(&mut rng);
        let first = agent.start(&start.state, &mut rng).unwrap();
        let first_tiles = agent.prev_tiles().to_vec();
        let obs = env.step(2, &mut rng).unwrap();
        // Act
        agent.step(obs.reward, &obs.state, &mut rng).unwrap();
        // Assert
        assert_abs_diff_eq!(agent.avg_reward(), -0.03139, epsilon = 5e-5);
        for &i in first_tiles.iter() {
            assert_abs_diff_eq!(agent.critic_weights[i], -0.39238658, epsilon = 5e-4);
            for a in 0..3 {
                let expected = if a == first { -0.02615911 } else { 0.01307955 };
                assert_abs_diff_eq!(agent.actor_weights[[a, i]], expected, epsilon = 1e-4);
            }
        }
    }
}
