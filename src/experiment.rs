//! Experiment drivers. Each one runs a configured experiment to completion
//! and returns its per-run measurements.

use std::time::Instant;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::statistics::Statistics;
use crate::actor_critic::{ActorCriticAgent, ActorCriticParams};
use crate::coders::{MountainCarTileCoder, PendulumTileCoder};
use crate::config::{GridWorldConfig, MountainCarConfig, PendulumConfig, TilingOption};
use crate::env::Environment;
use crate::error::Result;
use crate::gridworld::{self, GridWorldGame};
use crate::mountain_car::MountainCar;
use crate::pendulum::Pendulum;
use crate::rl::Rl;
use crate::sarsa::{SarsaAgent, SarsaParams};
use crate::tabular::{TabularAgent, TabularParams, TabularRule};


/// Episode returns of one tabular agent. Indexes: run, episode
#[derive(Debug, Clone)]
pub struct GridWorldResult {
    pub rule: TabularRule,
    pub returns: Array2<f64>,
}

impl GridWorldResult {
    /// Return of each episode averaged over runs.
    pub fn avg_returns(&self) -> Array1<f64> {
        column_means(&self.returns)
    }
}

/// Steps per episode for one tiling layout. Indexes: run, episode
#[derive(Debug, Clone)]
pub struct MountainCarResult {
    pub tiling: TilingOption,
    pub steps: Array2<f64>,
}

impl MountainCarResult {
    pub fn avg_steps(&self) -> Array1<f64> {
        column_means(&self.steps)
    }
}

/// Per step measurements of the pendulum runs. Indexes: run, step
#[derive(Debug, Clone)]
pub struct PendulumResult {
    /// Sum of rewards up to and including the step
    pub returns: Array2<f64>,
    pub exp_avg_rewards: Array2<f64>,
}


fn column_means(values: &Array2<f64>) -> Array1<f64> {
    values.mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::<f64>::zeros(values.ncols()))
}

fn last_column(values: &Array2<f64>) -> Vec<f64> {
    values.rows().into_iter().filter_map(|r| r.iter().last().copied()).collect()
}

fn log_summary(label: &str, values: &[f64]) {
    log::info!("{}: mean {:.3}, std dev {:.3} over {} runs",
        label, values.iter().mean(), values.iter().std_dev(), values.len());
}


/// Exponentially weighted average with the startup bias removed, so the
/// first value is reported as is.
#[derive(Debug, Clone)]
pub struct ExpAverage {
    step_size: f64,
    normalizer: f64,
    value: f64,
}

impl ExpAverage {
    pub fn new(step_size: f64) -> ExpAverage {
        ExpAverage { step_size, normalizer: 0.0, value: 0.0 }
    }

    pub fn update(&mut self, x: f64) -> f64 {
        self.normalizer += self.step_size * (1.0 - self.normalizer);
        self.value += self.step_size / self.normalizer * (x - self.value);
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}


/// Compare the configured tabular agents on the grid world game.
pub fn run_gridworld(config: &GridWorldConfig) -> Result<Vec<GridWorldResult>> {
    let mut results = Vec::with_capacity(config.agents.len());
    for &rule in config.agents.iter() {
        log::info!("Grid world: {} agent, {} runs of {} episodes",
            rule.name(), config.num_runs, config.num_episodes);
        let start = Instant::now();
        let mut returns = Array2::<f64>::zeros(
            (config.num_runs as usize, config.num_episodes as usize));

        for run in 0..config.num_runs {
            let env = GridWorldGame::new();
            let params = TabularParams {
                num_states: gridworld::NUM_STATES,
                num_actions: env.num_actions(),
                epsilon: config.epsilon,
                step_size: config.step_size,
                discount: config.discount,
            };
            let agent = TabularAgent::new(rule, params)?;
            let mut rl = Rl::new(env, agent,
                config.env_seed.wrapping_add(u64::from(run)), u64::from(run));
            for episode in 0..config.num_episodes as usize {
                rl.episode(0)?;
                returns[[run as usize, episode]] = rl.total_reward();
            }
            log::debug!("{} run {} done", rule.name(), run);
        }

        log::info!("Grid world {} finished in {:.2?}", rule.name(), start.elapsed());
        let last = last_column(&returns);
        log_summary(&format!("{} final episode return", rule.name()), &last);
        results.push(GridWorldResult { rule, returns });
    }
    Ok(results)
}


/// Compare tiling layouts for Sarsa on mountain car.
pub fn run_mountain_car(config: &MountainCarConfig) -> Result<Vec<MountainCarResult>> {
    let mut results = Vec::with_capacity(config.tilings.len());
    for &tiling in config.tilings.iter() {
        log::info!("Mountain car: {}, {} runs of {} episodes",
            tiling.label(), config.num_runs, config.num_episodes);
        let start = Instant::now();
        let mut steps = Array2::<f64>::zeros(
            (config.num_runs as usize, config.num_episodes as usize));

        for run in 0..config.num_runs {
            let env = MountainCar::new();
            let params = SarsaParams {
                num_actions: env.num_actions(),
                epsilon: config.epsilon,
                step_size: config.step_size / f64::from(tiling.num_tilings),
                discount: config.discount,
            };
            let coder = MountainCarTileCoder::new(
                config.capacity, tiling.num_tilings, tiling.num_tiles)?;
            let mut rl = Rl::new(env, SarsaAgent::new(params, coder)?,
                config.env_seed.wrapping_add(u64::from(run)), u64::from(run));
            for episode in 0..config.num_episodes as usize {
                rl.episode(config.max_steps)?;
                steps[[run as usize, episode]] = f64::from(rl.num_steps());
            }
            log::debug!("{} run {}: {} tiles in use",
                tiling.label(), run, rl.agent().coder().size());
        }

        log::info!("Mountain car {} finished in {:.2?}", tiling.label(), start.elapsed());
        let totals: Vec<f64> = steps.rows().into_iter().map(|r| r.sum()).collect();
        log_summary(&format!("{} total steps", tiling.label()), &totals);
        results.push(MountainCarResult { tiling, steps });
    }
    Ok(results)
}


/// Train actor-critic agents on the continuing pendulum task.
pub fn run_pendulum(config: &PendulumConfig) -> Result<PendulumResult> {
    log::info!("Pendulum: {} runs of {} steps, {} tilings of {} tiles",
        config.num_runs, config.max_steps, config.num_tilings, config.num_tiles);
    let start = Instant::now();
    let shape = (config.num_runs as usize, config.max_steps as usize);
    let mut returns = Array2::<f64>::zeros(shape);
    let mut exp_avg_rewards = Array2::<f64>::zeros(shape);
    let mut seeds = StdRng::seed_from_u64(config.seed);

    for run in 0..config.num_runs as usize {
        let env = Pendulum::new();
        let params = ActorCriticParams {
            num_actions: env.num_actions(),
            actor_step_size: config.actor_step_size / f64::from(config.num_tilings),
            critic_step_size: config.critic_step_size / f64::from(config.num_tilings),
            avg_reward_step_size: config.avg_reward_step_size,
        };
        let coder = PendulumTileCoder::new(
            config.capacity, config.num_tilings, config.num_tiles)?;
        let agent = ActorCriticAgent::new(params, coder)?;
        let mut rl = Rl::new(env, agent, seeds.random(), seeds.random());
        let mut exp_avg = ExpAverage::new(config.exp_avg_reward_step_size);

        rl.start()?;
        for step in 0..config.max_steps as usize {
            let (obs, _) = rl.step()?;
            returns[[run, step]] = rl.total_reward();
            exp_avg_rewards[[run, step]] = exp_avg.update(obs.reward);
        }
        log::debug!("Pendulum run {}: average reward estimate {:.4}",
            run, rl.agent().avg_reward());
    }

    log::info!("Pendulum finished in {:.2?}", start.elapsed());
    let last = last_column(&exp_avg_rewards);
    log_summary("Final exponential average reward", &last);
    Ok(PendulumResult { returns, exp_avg_rewards })
}
