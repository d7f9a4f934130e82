//! Error types for the rltiles crate.

use thiserror::Error;

/// A specialized `Result` type for rltiles operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A previously unseen tile coordinate arrived after the index hash
    /// table reached its capacity.
    #[error("Index hash table full: capacity of {capacity} exceeded")]
    CapacityExceeded { capacity: usize },

    /// A tile coder, agent or experiment was configured with invalid values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Non-finite coordinate: {0}")]
    NonFiniteCoordinate(f64),

    /// A coordinate too large in magnitude to quantize.
    #[error("Coordinate out of range: {0}")]
    CoordinateOutOfRange(f64),

    #[error("Invalid action {action}, environment has {num_actions} actions")]
    InvalidAction { action: usize, num_actions: usize },

    /// An action could not be sampled from a probability vector.
    #[error("Policy error: {0}")]
    Policy(String),

    /// The configuration file could not be read or parsed.
    #[error("Config file error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
