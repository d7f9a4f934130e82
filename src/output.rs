//! CSV files for experiment results.

use std::fs;
use std::path::{Path, PathBuf};
use serde::Serialize;
use crate::error::Result;
use crate::experiment::{GridWorldResult, MountainCarResult, PendulumResult};

pub const GRIDWORLD_FILE: &str = "gridworld_avg_returns.csv";
pub const MOUNTAIN_CAR_FILE: &str = "mountain_car_avg_steps.csv";
pub const PENDULUM_FILE: &str = "pendulum_returns.csv";


#[derive(Serialize)]
struct GridWorldRecord<'a> {
    agent: &'a str,
    episode: usize,
    avg_return: f64,
}

#[derive(Serialize)]
struct MountainCarRecord {
    num_tilings: u32,
    num_tiles: u32,
    episode: usize,
    avg_steps: f64,
}

#[derive(Serialize)]
struct PendulumRecord {
    run: usize,
    step: usize,
    #[serde(rename = "return")]
    total_return: f64,
    exp_avg_reward: f64,
}


fn output_path(dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    Ok(dir.join(file_name))
}

/// Write the run-averaged return of every episode, one row per agent and
/// episode. Returns the path written.
pub fn write_gridworld(dir: &Path, results: &[GridWorldResult]) -> Result<PathBuf> {
    let path = output_path(dir, GRIDWORLD_FILE)?;
    let mut wtr = csv::Writer::from_path(&path)?;
    for result in results {
        for (episode, &avg_return) in result.avg_returns().iter().enumerate() {
            wtr.serialize(GridWorldRecord {
                agent: result.rule.name(), episode: episode + 1, avg_return })?;
        }
    }
    wtr.flush()?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

pub fn write_mountain_car(dir: &Path, results: &[MountainCarResult]) -> Result<PathBuf> {
    let path = output_path(dir, MOUNTAIN_CAR_FILE)?;
    let mut wtr = csv::Writer::from_path(&path)?;
    for result in results {
        for (episode, &avg_steps) in result.avg_steps().iter().enumerate() {
            wtr.serialize(MountainCarRecord {
                num_tilings: result.tiling.num_tilings,
                num_tiles: result.tiling.num_tiles,
                episode: episode + 1,
                avg_steps,
            })?;
        }
    }
    wtr.flush()?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

pub fn write_pendulum(dir: &Path, result: &PendulumResult) -> Result<PathBuf> {
    let path = output_path(dir, PENDULUM_FILE)?;
    let mut wtr = csv::Writer::from_path(&path)?;
    for ((run, step), &total_return) in result.returns.indexed_iter() {
        wtr.serialize(PendulumRecord {
            run,
            step: step + 1,
            total_return,
            exp_avg_reward: result.exp_avg_rewards[[run, step]],
        })?;
    }
    wtr.flush()?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}


#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use crate::config::TilingOption;
    use crate::tabular::TabularRule;

    fn test_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rltiles_output_{}_{}", name, std::process::id()))
    }

    #[test]
    fn gridworld_rows() {
        // Arrange
        let dir = test_dir("gridworld");
        let results = vec![GridWorldResult {
            rule: TabularRule::QLearning,
            returns: array![[1.0, 2.0], [3.0, 4.0]],
        }];
        // Act
        let path = write_gridworld(&dir, &results).unwrap();
        // Assert
        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        assert_eq!(contents, "agent,episode,avg_return\nq_learning,1,2.0\nq_learning,2,3.0\n");
    }

    #[test]
    fn mountain_car_rows() {
        let dir = test_dir("mountain_car");
        let results = vec![MountainCarResult {
            tiling: TilingOption { num_tilings: 8, num_tiles: 8 },
            steps: array![[100.0, 50.0]],
        }];
        let path = write_mountain_car(&dir, &results).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        assert_eq!(contents, "num_tilings,num_tiles,episode,avg_steps\n8,8,1,100.0\n8,8,2,50.0\n");
    }

    #[test]
    fn pendulum_rows() {
        let dir = test_dir("pendulum");
        let result = PendulumResult {
            returns: array![[-1.0, -1.5], [-2.0, -2.5]],
            exp_avg_rewards: array![[-1.0, -0.75], [-2.0, -1.25]],
        };
        let path = write_pendulum(&dir, &result).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "run,step,return,exp_avg_reward");
        assert_eq!(lines[2], "0,2,-1.5,-0.75");
        assert_eq!(lines[3], "1,1,-2.0,-2.0");
    }
}
