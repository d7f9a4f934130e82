use std::path::{Path, PathBuf};
use config_file::FromConfigFile;
use serde::Deserialize;
use crate::error::{Error, Result};
use crate::tabular::TabularRule;


/// Experiment settings read from a TOML configuration file.
///
/// Every section and field is optional; missing values fall back to the
/// defaults below.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Directory the result CSV files are written to
    pub output_dir: PathBuf,
    pub gridworld: GridWorldConfig,
    pub mountain_car: MountainCarConfig,
    pub pendulum: PendulumConfig,
}

impl ExperimentConfig {
    pub fn load(path: &Path) -> Result<ExperimentConfig> {
        log::info!("Reading config file: {}", path.display());
        let config = ExperimentConfig::from_config_file(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.gridworld.validate()?;
        self.mountain_car.validate()?;
        self.pendulum.validate()
    }
}

fn check_probability(x: f64, name: &str) -> Result<()> {
    check((0.0..=1.0).contains(&x), &format!("{} must be in [0, 1]", name))
}

fn check_step_size(x: f64, name: &str) -> Result<()> {
    check(x.is_finite() && x > 0.0, &format!("{} must be positive and finite", name))
}

fn check(ok: bool, message: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidConfig(String::from(message)))
    }
}


#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GridWorldConfig {
    pub num_runs: u32,
    pub num_episodes: u32,
    pub epsilon: f64,
    pub step_size: f64,
    pub discount: f64,
    /// Run `i` seeds the environment with `env_seed + i` and the agent with `i`
    pub env_seed: u64,
    pub agents: Vec<TabularRule>,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        GridWorldConfig {
            num_runs: 100,
            num_episodes: 250,
            epsilon: 0.1,
            step_size: 0.1,
            discount: 0.8,
            env_seed: 0,
            agents: vec![TabularRule::ExpectedSarsa, TabularRule::QLearning],
        }
    }
}

impl GridWorldConfig {
    fn validate(&self) -> Result<()> {
        check(self.num_runs > 0, "gridworld.num_runs must be positive")?;
        check(self.num_episodes > 0, "gridworld.num_episodes must be positive")?;
        check_probability(self.epsilon, "gridworld.epsilon")?;
        check_probability(self.discount, "gridworld.discount")?;
        check_step_size(self.step_size, "gridworld.step_size")?;
        check(!self.agents.is_empty(), "gridworld.agents must not be empty")
    }
}


/// A tile coder layout to compare.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilingOption {
    pub num_tilings: u32,
    pub num_tiles: u32,
}

impl TilingOption {
    pub fn label(&self) -> String {
        format!("tilings_{}_tiles_{}", self.num_tilings, self.num_tiles)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MountainCarConfig {
    pub num_runs: u32,
    pub num_episodes: u32,
    /// Episodes are cut off after this many steps, 0 for no limit
    pub max_steps: u32,
    /// Base step size, divided by the number of tilings
    pub step_size: f64,
    pub epsilon: f64,
    pub discount: f64,
    pub capacity: usize,
    /// Run `i` seeds the environment with `env_seed + i` and the agent with `i`
    pub env_seed: u64,
    pub tilings: Vec<TilingOption>,
}

impl Default for MountainCarConfig {
    fn default() -> Self {
        MountainCarConfig {
            num_runs: 20,
            num_episodes: 100,
            max_steps: 15000,
            step_size: 0.5,
            epsilon: 0.1,
            discount: 1.0,
            capacity: 4096,
            env_seed: 0,
            tilings: vec![
                TilingOption { num_tilings: 2, num_tiles: 16 },
                TilingOption { num_tilings: 32, num_tiles: 4 },
                TilingOption { num_tilings: 8, num_tiles: 8 },
            ],
        }
    }
}

impl MountainCarConfig {
    fn validate(&self) -> Result<()> {
        check(self.num_runs > 0, "mountain_car.num_runs must be positive")?;
        check(self.num_episodes > 0, "mountain_car.num_episodes must be positive")?;
        check(self.capacity > 0, "mountain_car.capacity must be positive")?;
        check_probability(self.epsilon, "mountain_car.epsilon")?;
        check_probability(self.discount, "mountain_car.discount")?;
        check_step_size(self.step_size, "mountain_car.step_size")?;
        check(!self.tilings.is_empty(), "mountain_car.tilings must not be empty")?;
        check(self.tilings.iter().all(|t| t.num_tilings > 0 && t.num_tiles > 0),
            "mountain_car.tilings entries must be positive")
    }
}


#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PendulumConfig {
    pub num_runs: u32,
    pub max_steps: u32,
    pub capacity: usize,
    pub num_tilings: u32,
    pub num_tiles: u32,
    /// Divided by the number of tilings
    pub actor_step_size: f64,
    /// Divided by the number of tilings
    pub critic_step_size: f64,
    pub avg_reward_step_size: f64,
    /// Step size of the reported exponential average reward
    pub exp_avg_reward_step_size: f64,
    /// Seeds every run's environment and agent generators
    pub seed: u64,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        PendulumConfig {
            num_runs: 25,
            max_steps: 20000,
            capacity: 4096,
            num_tilings: 32,
            num_tiles: 8,
            actor_step_size: 0.25,
            critic_step_size: 2.0,
            avg_reward_step_size: 2f64.powi(-6),
            exp_avg_reward_step_size: 0.01,
            seed: 0,
        }
    }
}

impl PendulumConfig {
    fn validate(&self) -> Result<()> {
        check(self.num_runs > 0, "pendulum.num_runs must be positive")?;
        check(self.max_steps > 0, "pendulum.max_steps must be positive")?;
        check(self.capacity > 0, "pendulum.capacity must be positive")?;
        check(self.num_tilings > 0, "pendulum.num_tilings must be positive")?;
        check(self.num_tiles > 0, "pendulum.num_tiles must be positive")?;
        check_step_size(self.actor_step_size, "pendulum.actor_step_size")?;
        check_step_size(self.critic_step_size, "pendulum.critic_step_size")?;
        check_step_size(self.avg_reward_step_size, "pendulum.avg_reward_step_size")?;
        check(self.exp_avg_reward_step_size > 0.0 && self.exp_avg_reward_step_size <= 1.0,
            "pendulum.exp_avg_reward_step_size must be in (0, 1]")
    }
}
