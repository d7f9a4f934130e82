use rand::Rng;
use crate::error::Result;

/// Index of a discrete action.
pub type Action = usize;

/// What an environment reports after starting or taking a step.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<S> {
    pub reward: f64,
    pub state: S,
    pub terminal: bool,
}

impl<S> Observation<S> {
    pub fn new(reward: f64, state: S, terminal: bool) -> Observation<S> {
        Observation { reward, state, terminal }
    }
}

/// A simulated task the agent interacts with one step at a time.
///
/// Implemented by `GridWorldGame`, `MountainCar` and `Pendulum`. Randomness
/// comes from the caller so runs are reproducible from a seed.
pub trait Environment {
    type State: Clone;

    fn num_actions(&self) -> usize;

    /// Begin an episode and return the initial observation.
    fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Observation<Self::State>;

    fn step<R: Rng + ?Sized>(
        &mut self, action: Action, rng: &mut R
    ) -> Result<Observation<Self::State>>;
}
