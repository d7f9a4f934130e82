use crate::error::{Error, Result};
use crate::iht::IndexHashTable;


/// Grid cell address of one tile: the tiling it belongs to plus one coarse
/// coordinate per state dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey<const D: usize> {
    pub tiling: u32,
    pub coords: [i64; D],
}

/// Active tile set. One index per tiling, in tiling order.
pub type TileSet = Vec<usize>;

/// Largest magnitude of a coordinate times `num_tilings` that is quantized.
const MAX_SCALED: f64 = (1u64 << 52) as f64;


/// Tile coder for points in `D`-dimensional space.
///
/// Coordinates must already be scaled so that one unit is one tile width,
/// e.g. into `[0, num_tiles]`. Each tiling is displaced from the previous
/// one by `1 + 2d` fine-grid units in dimension `d`, so tilings never move
/// in phase along a diagonal.
#[derive(Debug, Clone)]
pub struct TileCoder<const D: usize = 2> {
    num_tilings: u32,
    iht: IndexHashTable<CoordKey<D>>,
}

impl<const D: usize> TileCoder<D> {
    pub fn new(capacity: usize, num_tilings: u32) -> Result<TileCoder<D>> {
        if num_tilings == 0 {
            return Err(Error::InvalidConfig(
                String::from("num_tilings must be positive")));
        }
        let iht = IndexHashTable::new(capacity)?;
        Ok(TileCoder { num_tilings, iht })
    }

    pub fn num_tilings(&self) -> u32 {
        self.num_tilings
    }

    pub fn capacity(&self) -> usize {
        self.iht.capacity()
    }

    /// Number of distinct tiles seen so far.
    pub fn size(&self) -> usize {
        self.iht.size()
    }

    pub fn clear(&mut self) {
        self.iht.clear();
    }

    /// Active tiles for a point with no wrapping dimensions.
    pub fn get_tiles(&mut self, floats: &[f64; D]) -> Result<TileSet> {
        self.get_tiles_wrapped(floats, &[0; D])
    }

    /// Active tiles for a point. A dimension with a non-zero wrap width is
    /// treated as cyclic: its coarse coordinate is taken modulo the width.
    pub fn get_tiles_wrapped(
        &mut self, floats: &[f64; D], wrap_widths: &[u32; D]
    ) -> Result<TileSet> {
        let n = i64::from(self.num_tilings);
        let mut qfloats = [0i64; D];
        for (q, &f) in qfloats.iter_mut().zip(floats.iter()) {
            if !f.is_finite() {
                return Err(Error::NonFiniteCoordinate(f));
            }
            let scaled = f * n as f64;
            if scaled.abs() > MAX_SCALED {
                return Err(Error::CoordinateOutOfRange(f));
            }
            *q = scaled.floor() as i64;
        }

        let mut tiles = Vec::with_capacity(self.num_tilings as usize);
        for tiling in 0..self.num_tilings {
            let t = i64::from(tiling);
            let mut coords = [0i64; D];
            for (d, coord) in coords.iter_mut().enumerate() {
                let offset = t * (1 + 2 * d as i64);
                let mut c = (qfloats[d] + offset).div_euclid(n);
                if wrap_widths[d] > 0 {
                    c = c.rem_euclid(i64::from(wrap_widths[d]));
                }
                *coord = c;
            }
            tiles.push(self.iht.get_index(CoordKey { tiling, coords })?);
        }
        Ok(tiles)
    }
}
