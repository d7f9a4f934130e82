use rand::Rng;
use crate::env::Action;
use crate::error::Result;

/// A learning agent driven by the RL loop.
///
/// `start` is called with the first state of an episode, `step` after every
/// non-terminal transition and `end` when the episode terminates. Agents are
/// configured when constructed; build a new one for each independent run.
pub trait Agent {
    type State;

    fn start<R: Rng + ?Sized>(&mut self, state: &Self::State, rng: &mut R) -> Result<Action>;

    fn step<R: Rng + ?Sized>(
        &mut self, reward: f64, state: &Self::State, rng: &mut R
    ) -> Result<Action>;

    fn end(&mut self, reward: f64);
}
