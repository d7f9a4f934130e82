//! Tile coders for the mountain car and pendulum state spaces.
//!
//! Each coder rescales physical state variables into `[0, num_tiles]` and
//! hands them to a [`TileCoder`] it owns.

use std::f64::consts::PI;
use crate::error::{Error, Result};
use crate::tiles::{TileCoder, TileSet};

/// Added to scaled coordinates so values on a tile boundary land inside the
/// tile above it regardless of rounding.
pub const BOUNDARY_NUDGE: f64 = f32::EPSILON as f64;

pub const POSITION_MIN: f64 = -1.2;
pub const POSITION_MAX: f64 = 0.5;
pub const VELOCITY_MIN: f64 = -0.07;
pub const VELOCITY_MAX: f64 = 0.07;

pub const ANGLE_MIN: f64 = -PI;
pub const ANGLE_MAX: f64 = PI;
pub const ANGULAR_VELOCITY_MIN: f64 = -2.0 * PI;
pub const ANGULAR_VELOCITY_MAX: f64 = 2.0 * PI;


/// Source of tile features for an agent's state type.
pub trait TileFeatures {
    type State;

    fn active_tiles(&mut self, state: &Self::State) -> Result<TileSet>;
    fn capacity(&self) -> usize;
}


fn scale(x: f64, min: f64, max: f64, num_tiles: u32) -> f64 {
    (x - min) / (max - min) * f64::from(num_tiles) + BOUNDARY_NUDGE
}

fn check_num_tiles(num_tiles: u32) -> Result<()> {
    if num_tiles == 0 {
        return Err(Error::InvalidConfig(String::from("num_tiles must be positive")));
    }
    Ok(())
}


/// Position and velocity tile coder. Neither dimension wraps.
#[derive(Debug, Clone)]
pub struct MountainCarTileCoder {
    tc: TileCoder<2>,
    num_tiles: u32,
}

impl MountainCarTileCoder {
    pub fn new(
        capacity: usize, num_tilings: u32, num_tiles: u32
    ) -> Result<MountainCarTileCoder> {
        check_num_tiles(num_tiles)?;
        Ok(MountainCarTileCoder {
            tc: TileCoder::new(capacity, num_tilings)?,
            num_tiles,
        })
    }

    /// Reconfigure the coder. All previously assigned tiles are forgotten.
    pub fn initialize(
        &mut self, capacity: usize, num_tilings: u32, num_tiles: u32
    ) -> Result<()> {
        *self = MountainCarTileCoder::new(capacity, num_tilings, num_tiles)?;
        Ok(())
    }

    /// Active tiles for a position in `[-1.2, 0.5]` and a velocity in
    /// `[-0.07, 0.07]`.
    pub fn get_tiles(&mut self, position: f64, velocity: f64) -> Result<TileSet> {
        let position_scaled = scale(position, POSITION_MIN, POSITION_MAX, self.num_tiles);
        let velocity_scaled = scale(velocity, VELOCITY_MIN, VELOCITY_MAX, self.num_tiles);
        self.tc.get_tiles(&[position_scaled, velocity_scaled])
    }

    pub fn num_tiles(&self) -> u32 {
        self.num_tiles
    }

    pub fn num_tilings(&self) -> u32 {
        self.tc.num_tilings()
    }

    pub fn capacity(&self) -> usize {
        self.tc.capacity()
    }

    pub fn size(&self) -> usize {
        self.tc.size()
    }
}


/// Angle and angular velocity tile coder. The angle wraps around with a
/// width of `num_tiles`, so tiles at `-pi` and `pi` are neighbours.
#[derive(Debug, Clone)]
pub struct PendulumTileCoder {
    tc: TileCoder<2>,
    num_tiles: u32,
}

impl PendulumTileCoder {
    pub fn new(
        capacity: usize, num_tilings: u32, num_tiles: u32
    ) -> Result<PendulumTileCoder> {
        check_num_tiles(num_tiles)?;
        Ok(PendulumTileCoder {
            tc: TileCoder::new(capacity, num_tilings)?,
            num_tiles,
        })
    }

    /// Reconfigure the coder. All previously assigned tiles are forgotten.
    pub fn initialize(
        &mut self, capacity: usize, num_tilings: u32, num_tiles: u32
    ) -> Result<()> {
        *self = PendulumTileCoder::new(capacity, num_tilings, num_tiles)?;
        Ok(())
    }

    /// Active tiles for an angle in `[-pi, pi]` and an angular velocity in
    /// `[-2pi, 2pi]`.
    pub fn get_tiles(&mut self, angle: f64, velocity: f64) -> Result<TileSet> {
        let angle_scaled = scale(angle, ANGLE_MIN, ANGLE_MAX, self.num_tiles);
        let velocity_scaled = scale(
            velocity, ANGULAR_VELOCITY_MIN, ANGULAR_VELOCITY_MAX, self.num_tiles);
        let wrap_widths = [self.num_tiles, 0];
        self.tc.get_tiles_wrapped(&[angle_scaled, velocity_scaled], &wrap_widths)
    }

    pub fn num_tiles(&self) -> u32 {
        self.num_tiles
    }

    pub fn num_tilings(&self) -> u32 {
        self.tc.num_tilings()
    }

    pub fn capacity(&self) -> usize {
        self.tc.capacity()
    }

    pub fn size(&self) -> usize {
        self.tc.size()
    }
}
