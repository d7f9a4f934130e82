use std::path::PathBuf;
use std::process;
use clap::{Parser, Subcommand, ValueEnum};

use rltiles::coders::{MountainCarTileCoder, PendulumTileCoder};
use rltiles::config::ExperimentConfig;
use rltiles::{experiment, output, Error, Result};


/// Command line argument parser.
#[derive(Parser, Debug)]
#[command(about = "Tile coding reinforcement learning experiments", long_about = None)]
pub struct Args {
    /// Path to experiment configuration TOML file.
    config_path: PathBuf,

    /// Directory for result files. Overrides the configuration file.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands
}


#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare Q-learning and Expected Sarsa on the grid world game.
    GridWorld,
    /// Compare tilings for Sarsa on mountain car.
    MountainCar,
    /// Train actor-critic agents on the pendulum swing-up task.
    Pendulum,
    /// Print the active tiles for one state.
    Tiles {
        #[arg(value_enum)]
        domain: Domain,
        /// Position or angle
        #[arg(allow_negative_numbers = true)]
        coord_1: f64,
        /// Velocity or angular velocity
        #[arg(allow_negative_numbers = true)]
        coord_2: f64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Domain {
    MountainCar,
    Pendulum,
}


fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        process::exit(1);
    }
}


fn run(args: &Args) -> Result<()> {
    let config = ExperimentConfig::load(&args.config_path)?;
    let output_dir = args.output_dir.clone().unwrap_or_else(|| config.output_dir.clone());

    match &args.command {
        Commands::GridWorld => {
            let results = experiment::run_gridworld(&config.gridworld)?;
            output::write_gridworld(&output_dir, &results)?;
        }
        Commands::MountainCar => {
            let results = experiment::run_mountain_car(&config.mountain_car)?;
            output::write_mountain_car(&output_dir, &results)?;
        }
        Commands::Pendulum => {
            let result = experiment::run_pendulum(&config.pendulum)?;
            output::write_pendulum(&output_dir, &result)?;
        }
        Commands::Tiles { domain, coord_1, coord_2 } => {
            let tiles = match domain {
                Domain::MountainCar => {
                    let mc = &config.mountain_car;
                    let tiling = mc.tilings.first().ok_or_else(
                        || Error::InvalidConfig(String::from("no mountain car tilings")))?;
                    MountainCarTileCoder::new(mc.capacity, tiling.num_tilings, tiling.num_tiles)?
                        .get_tiles(*coord_1, *coord_2)?
                }
                Domain::Pendulum => {
                    let p = &config.pendulum;
                    PendulumTileCoder::new(p.capacity, p.num_tilings, p.num_tiles)?
                        .get_tiles(*coord_1, *coord_2)?
                }
            };
            println!("Active tiles: {:?}", tiles);
        }
    }
    Ok(())
}
