use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::tile_grid::TileGrid;

/// Noise-based elevation source for procedural maps.
/// Samples fBm Perlin noise on the grid lattice and quantizes it to the
/// integer elevation levels tiles carry.
pub struct ElevationField {
    fbm: Fbm<Perlin>,
    amplitude: f32,
    base_level: i32,
}

impl ElevationField {
    pub fn new(seed: u32, octaves: usize, frequency: f32, amplitude: f32, base_level: i32) -> Self {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(octaves)
            .set_frequency(frequency as f64)
            .set_lacunarity(2.0)
            .set_persistence(0.5);

        Self {
            fbm,
            amplitude,
            base_level,
        }
    }

    /// Quantized elevation at one grid position
    pub fn sample(&self, row: u32, col: u32) -> i32 {
        let noise_value = self.fbm.get([col as f64, row as f64]) as f32;
        self.base_level + (noise_value * self.amplitude).round() as i32
    }

    /// Fill a whole grid from the field. Deterministic per seed.
    pub fn generate(&self, num_rows: u32, num_cols: u32) -> TileGrid {
        let mut grid = TileGrid::new(num_rows, num_cols);
        for row in 0..num_rows {
            for col in 0..num_cols {
                grid.set_elevation(row, col, self.sample(row, col));
            }
        }
        grid
    }
}
