use std::f64::consts::PI;
use rand::Rng;
use crate::coders::{PendulumTileCoder, TileFeatures};
use crate::env::{Action, Environment, Observation};
use crate::error::{Error, Result};
use crate::tiles::TileSet;

pub const NUM_ACTIONS: usize = 3;
const DT: f64 = 0.05;
const GRAVITY: f64 = 9.8;
const MASS: f64 = 1.0 / 3.0;
const LENGTH: f64 = 3.0 / 2.0;


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumState {
    /// Radians from upright, in `[-pi, pi)`
    pub angle: f64,
    /// Radians per second, in `[-2pi, 2pi]`
    pub velocity: f64,
}

impl PendulumState {
    /// Hanging straight down with no velocity.
    pub const RESTING: PendulumState = PendulumState { angle: -PI, velocity: 0.0 };
}

/// Wrap an angle into `[-pi, pi)`.
pub fn normalize_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}


/// Pendulum swing-up, a continuing task.
///
/// The agent applies an angular acceleration of -1, 0 or 1 (actions 0, 1,
/// 2), which is too weak to lift the pendulum directly. The reward is the
/// negative absolute angle from upright. If the angular velocity leaves
/// `[-2pi, 2pi]` the pendulum is put back at rest.
#[derive(Debug, Clone)]
pub struct Pendulum {
    state: PendulumState,
}

impl Default for Pendulum {
    fn default() -> Self {
        Pendulum::new()
    }
}

impl Pendulum {
    pub fn new() -> Pendulum {
        Pendulum { state: PendulumState::RESTING }
    }

    pub fn set_state(&mut self, state: PendulumState) {
        self.state = state;
    }
}

impl Environment for Pendulum {
    type State = PendulumState;

    fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    fn start<R: Rng + ?Sized>(&mut self, _rng: &mut R) -> Observation<PendulumState> {
        self.state = PendulumState::RESTING;
        Observation::new(0.0, self.state, false)
    }

    fn step<R: Rng + ?Sized>(
        &mut self, action: Action, _rng: &mut R
    ) -> Result<Observation<PendulumState>> {
        if action >= NUM_ACTIONS {
            return Err(Error::InvalidAction { action, num_actions: NUM_ACTIONS });
        }
        let PendulumState { angle, velocity } = self.state;
        let torque = action as f64 - 1.0;
        let mut velocity = velocity
            + 0.75 * (torque + MASS * LENGTH * GRAVITY * angle.sin())
                / (MASS * LENGTH * LENGTH) * DT;
        let mut angle = normalize_angle(angle + velocity * DT);

        if velocity.abs() > 2.0 * PI {
            angle = -PI;
            velocity = 0.0;
        }
        self.state = PendulumState { angle, velocity };
        let reward = -normalize_angle(angle).abs();
        Ok(Observation::new(reward, self.state, false))
    }
}

impl TileFeatures for PendulumTileCoder {
    type State = PendulumState;

    fn active_tiles(&mut self, state: &PendulumState) -> Result<TileSet> {
        self.get_tiles(state.angle, state.velocity)
    }

    fn capacity(&self) -> usize {
        PendulumTileCoder::capacity(self)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_case::test_case;

    #[test_case(0.0, 0.0; "zero")]
    #[test_case(PI, -PI; "upper bound wraps")]
    #[test_case(-PI, -PI; "lower bound kept")]
    #[test_case(3.0 * PI / 2.0, -PI / 2.0; "past pi")]
    #[test_case(-5.0 * PI / 2.0, -PI / 2.0; "below minus pi")]
    fn angle_normalization(angle: f64, expected: f64) {
        assert_abs_diff_eq!(normalize_angle(angle), expected, epsilon = 1e-12);
    }

    #[test]
    fn first_push_from_rest() {
        // Arrange
        let mut env = Pendulum::new();
        let mut rng = StdRng::seed_from_u64(0);
        env.start(&mut rng);
        // Act
        let obs = env.step(2, &mut rng).unwrap();
        // Assert
        assert_abs_diff_eq!(obs.state.velocity, 0.05, epsilon = 1e-9);
        assert_abs_diff_eq!(obs.state.angle, -PI + 0.0025, epsilon = 1e-9);
        assert_abs_diff_eq!(obs.reward, -(PI - 0.0025), epsilon = 1e-9);
        assert!(!obs.terminal);
    }

    #[test]
    fn overspeed_resets_to_rest() {
        let mut env = Pendulum::new();
        let mut rng = StdRng::seed_from_u64(0);
        env.set_state(PendulumState { angle: 0.0, velocity: 2.0 * PI });
        let obs = env.step(2, &mut rng).unwrap();
        assert_eq!(obs.state, PendulumState::RESTING);
    }

    #[test]
    fn never_terminates() {
        let mut env = Pendulum::new();
        let mut rng = StdRng::seed_from_u64(0);
        env.start(&mut rng);
        for step in 0..500 {
            let obs = env.step(step % NUM_ACTIONS, &mut rng).unwrap();
            assert!(!obs.terminal);
            assert!(obs.state.angle >= -PI && obs.state.angle < PI);
            assert!(obs.state.velocity.abs() <= 2.0 * PI);
        }
    }

    #[test]
    fn invalid_action_rejected() {
        let mut env = Pendulum::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(env.step(5, &mut rng).is_err());
    }
}
