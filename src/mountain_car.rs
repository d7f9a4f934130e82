use rand::Rng;
use crate::coders::{
    MountainCarTileCoder, TileFeatures,
    POSITION_MAX, POSITION_MIN, VELOCITY_MAX, VELOCITY_MIN,
};
use crate::env::{Action, Environment, Observation};
use crate::error::{Error, Result};
use crate::tiles::TileSet;

pub const NUM_ACTIONS: usize = 3;
const START_MIN: f64 = -0.6;
const START_MAX: f64 = -0.4;


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarState {
    pub position: f64,
    pub velocity: f64,
}


/// Underpowered car in a valley that must rock back and forth to reach the
/// goal at the top of the right hill.
///
/// Actions are full reverse, coast and full throttle (0, 1, 2). Every step
/// costs 1 until the car reaches `POSITION_MAX`, which ends the episode.
/// Each episode starts at rest somewhere in `[-0.6, -0.4)`.
#[derive(Debug, Clone)]
pub struct MountainCar {
    state: CarState,
}

impl Default for MountainCar {
    fn default() -> Self {
        MountainCar::new()
    }
}

impl MountainCar {
    pub fn new() -> MountainCar {
        MountainCar { state: CarState { position: START_MIN, velocity: 0.0 } }
    }

    /// Place the car at an arbitrary state.
    pub fn set_state(&mut self, state: CarState) {
        self.state = state;
    }
}

impl Environment for MountainCar {
    type State = CarState;

    fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Observation<CarState> {
        self.state = CarState {
            position: rng.random_range(START_MIN..START_MAX),
            velocity: 0.0,
        };
        Observation::new(0.0, self.state, false)
    }

    fn step<R: Rng + ?Sized>(
        &mut self, action: Action, _rng: &mut R
    ) -> Result<Observation<CarState>> {
        if action >= NUM_ACTIONS {
            return Err(Error::InvalidAction { action, num_actions: NUM_ACTIONS });
        }
        let CarState { position, velocity } = self.state;
        let throttle = action as f64 - 1.0;
        let mut velocity = (velocity + 0.001 * throttle - 0.0025 * (3.0 * position).cos())
            .clamp(VELOCITY_MIN, VELOCITY_MAX);
        let position = (position + velocity).clamp(POSITION_MIN, POSITION_MAX);

        let mut reward = -1.0;
        let mut terminal = false;
        if position == POSITION_MIN {
            velocity = 0.0;
        } else if position == POSITION_MAX {
            terminal = true;
            reward = 0.0;
        }
        self.state = CarState { position, velocity };
        Ok(Observation::new(reward, self.state, terminal))
    }
}

impl TileFeatures for MountainCarTileCoder {
    type State = CarState;

    fn active_tiles(&mut self, state: &CarState) -> Result<TileSet> {
        self.get_tiles(state.position, state.velocity)
    }

    fn capacity(&self) -> usize {
        MountainCarTileCoder::capacity(self)
    }
}
