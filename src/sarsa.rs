use ndarray::Array2;
use rand::Rng;
use crate::agent::Agent;
use crate::coders::TileFeatures;
use crate::env::Action;
use crate::error::{Error, Result};
use crate::policy;
use crate::tiles::TileSet;


#[derive(Debug, Clone)]
pub struct SarsaParams {
    pub num_actions: usize,
    pub epsilon: f64,
    /// Step size per active tile, usually a base step size over `num_tilings`
    pub step_size: f64,
    pub discount: f64,
}


/// Semi-gradient Sarsa with linear function approximation over tile
/// features. The value of an action is the sum of its weights at the
/// active tiles.
pub struct SarsaAgent<C> {
    params: SarsaParams,
    coder: C,
    /// Indexes: action, tile
    pub weights: Array2<f64>,
    prev_action: Action,
    prev_tiles: TileSet,
    prev_q_value: f64,
}

impl<C: TileFeatures> SarsaAgent<C> {
    pub fn new(params: SarsaParams, coder: C) -> Result<SarsaAgent<C>> {
        if params.num_actions == 0 {
            return Err(Error::InvalidConfig(String::from("num_actions must be positive")));
        }
        let weights = Array2::<f64>::zeros((params.num_actions, coder.capacity()));
        Ok(SarsaAgent {
            params,
            coder,
            weights,
            prev_action: 0,
            prev_tiles: Vec::new(),
            prev_q_value: 0.0,
        })
    }

    pub fn coder(&self) -> &C {
        &self.coder
    }

    pub fn prev_tiles(&self) -> &[usize] {
        &self.prev_tiles
    }

    pub fn prev_action(&self) -> Action {
        self.prev_action
    }

    fn select_action<R: Rng + ?Sized>(
        &mut self, state: &C::State, rng: &mut R
    ) -> Result<(Action, f64, TileSet)> {
        let tiles = self.coder.active_tiles(state)?;
        let q_values = policy::linear_action_values(&self.weights, &tiles);
        let action = policy::epsilon_greedy(&q_values, self.params.epsilon, rng);
        Ok((action, q_values[action], tiles))
    }

    fn update(&mut self, target: f64) {
        let delta = self.params.step_size * (target - self.prev_q_value);
        let mut row = self.weights.row_mut(self.prev_action);
        for &i in self.prev_tiles.iter() {
            row[i] += delta;
        }
    }
}

impl<C: TileFeatures> Agent for SarsaAgent<C> {
    type State = C::State;

    fn start<R: Rng + ?Sized>(&mut self, state: &C::State, rng: &mut R) -> Result<Action> {
        let (action, q_value, tiles) = self.select_action(state, rng)?;
        self.prev_action = action;
        self.prev_tiles = tiles;
        self.prev_q_value = q_value;
        Ok(action)
    }

    fn step<R: Rng + ?Sized>(
        &mut self, reward: f64, state: &C::State, rng: &mut R
    ) -> Result<Action> {
        let (action, q_value, tiles) = self.select_action(state, rng)?;
        self.update(reward + self.params.discount * q_value);

        self.prev_action = action;
        self.prev_tiles = tiles;
        self.prev_q_value = q_value;
        Ok(action)
    }

    fn end(&mut self, reward: f64) {
        self.update(reward);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::coders::MountainCarTileCoder;
    use crate::mountain_car::CarState;

    fn agent() -> SarsaAgent<MountainCarTileCoder> {
        let params = SarsaParams {
            num_actions: 3, epsilon: 0.0, step_size: 0.5 / 8.0, discount: 1.0 };
        let coder = MountainCarTileCoder::new(4096, 8, 8).unwrap();
        SarsaAgent::new(params, coder).unwrap()
    }

    #[test]
    fn weights_sized_by_capacity() {
        let agent = agent();
        assert_eq!(agent.weights.dim(), (3, 4096));
    }

    #[test]
    fn start_records_tiles() {
        let mut agent = agent();
        let mut rng = StdRng::seed_from_u64(0);
        let action = agent.start(&CarState { position: -0.5, velocity: 0.0 }, &mut rng).unwrap();
        assert!(action < 3);
        assert_eq!(agent.prev_tiles().to_vec(), (0..8).collect::<Vec<usize>>());
    }

    #[test]
    fn step_moves_previous_weights_toward_target() {
        // Arrange
        let mut agent = agent();
        let mut rng = StdRng::seed_from_u64(0);
        let first = agent.start(&CarState { position: -0.5, velocity: 0.0 }, &mut rng).unwrap();
        let first_tiles = agent.prev_tiles().to_vec();
        // Act
        agent.step(-1.0, &CarState { position: -0.2, velocity: 0.05 }, &mut rng).unwrap();
        // Assert
        for &i in first_tiles.iter() {
            assert_abs_diff_eq!(agent.weights[[first, i]], 0.5 / 8.0 * -1.0, epsilon = 1e-12);
        }
        let q: f64 = first_tiles.iter().map(|&i| agent.weights[[first, i]]).sum();
        assert_abs_diff_eq!(q, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn end_updates_toward_reward() {
        let mut agent = agent();
        let mut rng = StdRng::seed_from_u64(0);
        let action = agent.start(&CarState { position: 0.4, velocity: 0.06 }, &mut rng).unwrap();
        agent.end(0.0);
        assert!(agent.weights.row(action).iter().all(|&w| w == 0.0));
    }
}
