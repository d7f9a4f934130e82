pub mod actor_critic;
pub mod agent;
pub mod coders;
pub mod config;
pub mod env;
pub mod error;
pub mod experiment;
pub mod gridworld;
pub mod iht;
pub mod mountain_car;
pub mod output;
pub mod pendulum;
pub mod policy;
pub mod rl;
pub mod sarsa;
pub mod tabular;
pub mod tiles;

pub use error::{Error, Result};
