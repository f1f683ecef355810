//! Tile-grid mesh generation.
//!
//! Walks a rectangular grid of integer-elevation tiles in row-major order
//! and emits one flat top quad per tile, plus a vertical skirt quad between
//! every pair of orthogonal neighbors whose elevations differ. Coordinates
//! are right-handed Y-up: columns advance along +X, rows along +Z, and a
//! tile's far (+Z) edge belongs to the skirt toward its row+1 neighbor.

use std::ops::Range;

use rayon::prelude::*;

use crate::debug_log::{compute_normal_stats, debug_log};
use crate::mesh_buffer::MeshBuffer;
use crate::tile_grid::{Tile, TileGrid};

/// Minimum rows per band in the parallel build; small grids stay on one band.
const MIN_ROWS_PER_BAND: usize = 16;

const UP: [f32; 3] = [0.0, 1.0, 0.0];
const LEFT: [f32; 3] = [-1.0, 0.0, 0.0];
const RIGHT: [f32; 3] = [1.0, 0.0, 0.0];
const BACK: [f32; 3] = [0.0, 0.0, -1.0];
const FORWARD: [f32; 3] = [0.0, 0.0, 1.0];

/// Build-time scaling parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshConfig {
    /// World distance covered by one grid step
    pub tile_size: f32,
    /// World height of one elevation unit; 0 flattens the map
    pub height_scale: f32,
    /// Texture density knob, reserved; the grid walk does not consume it
    pub tile_resolution: u32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            tile_size: 1.0,
            height_scale: 1.0,
            tile_resolution: 16,
        }
    }
}

/// Builds a MeshBuffer from a TileGrid
pub struct MeshBuilder {
    config: MeshConfig,
}

impl MeshBuilder {
    pub fn new(config: MeshConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    /// Build the complete mesh for a grid in one synchronous pass.
    /// The returned buffer is fresh; nothing is pooled or reused across builds.
    pub fn build(&self, grid: &TileGrid) -> MeshBuffer {
        let buffer = self.build_rows(grid, 0..grid.num_rows());

        if cfg!(debug_assertions) && !buffer.normals.is_empty() {
            let stats = compute_normal_stats(&buffer.normals);
            debug_log(&format!(
                "[build] {}x{} grid: verts={}, tris={}, normal_len=[{:.3}, {:.3}], degenerate={}",
                grid.num_rows(),
                grid.num_cols(),
                buffer.vertex_count(),
                buffer.triangle_count(),
                stats.min_len,
                stats.max_len,
                stats.degenerate_count
            ));
        }

        buffer
    }

    /// Build the mesh for a contiguous band of rows.
    ///
    /// Each tile only reads its row+1 and col+1 neighbors, so disjoint bands
    /// cover the full grid without duplicating or dropping any skirt.
    pub fn build_rows(&self, grid: &TileGrid, rows: Range<u32>) -> MeshBuffer {
        let mut buffer = MeshBuffer::new();
        for row in rows {
            for col in 0..grid.num_cols() {
                self.emit_tile(grid, row, col, &mut buffer);
            }
        }
        buffer
    }

    /// Parallel build: rows are split into contiguous bands, meshed on the
    /// rayon pool, and merged in band order. Produces a buffer bit-identical
    /// to `build` on the same inputs.
    pub fn build_parallel(&self, grid: &TileGrid) -> MeshBuffer {
        let num_rows = grid.num_rows() as usize;
        let band_rows = (num_rows / rayon::current_num_threads()).max(MIN_ROWS_PER_BAND);

        let bands: Vec<Range<u32>> = (0..num_rows)
            .step_by(band_rows)
            .map(|start| start as u32..(start + band_rows).min(num_rows) as u32)
            .collect();

        let partials: Vec<MeshBuffer> = bands
            .into_par_iter()
            .map(|band| self.build_rows(grid, band))
            .collect();

        let mut buffer = MeshBuffer::new();
        for partial in &partials {
            buffer.append(partial);
        }
        buffer
    }

    /// Emit the top quad for one tile plus its +col and +row skirts.
    fn emit_tile(&self, grid: &TileGrid, row: u32, col: u32, buffer: &mut MeshBuffer) {
        let tile = grid.tile_at(row, col);

        let tile_size = self.config.tile_size;
        let height = self.tile_height(tile);
        let near = row as f32 * tile_size;
        let far = near + tile_size;
        let left = col as f32 * tile_size;
        let right = left + tile_size;

        // Both UV axes intentionally divide by the column count.
        let num_cols = grid.num_cols() as f32;
        let uv = [col as f32 / num_cols, row as f32 / num_cols];

        // Top face, unconditional
        buffer.emit_quad(
            [
                [left, height, far],
                [right, height, far],
                [left, height, near],
                [right, height, near],
            ],
            UP,
            uv,
        );

        // Skirt toward the col+1 neighbor, at the tile's right edge.
        // The quad spans the full elevation gap in one face; its normal
        // points away from the higher side. Skirts reuse the tile's top UV.
        if col + 1 < grid.num_cols() {
            let neighbor = grid.tile_at(row, col + 1);
            let diff = neighbor.elevation - tile.elevation;
            if diff != 0 {
                let neighbor_height = self.tile_height(neighbor);
                let normal = if diff > 0 { LEFT } else { RIGHT };
                buffer.emit_quad(
                    [
                        [right, height, far],
                        [right, neighbor_height, far],
                        [right, height, near],
                        [right, neighbor_height, near],
                    ],
                    normal,
                    uv,
                );
            }
        }

        // Skirt toward the row+1 neighbor, at the tile's far edge
        if row + 1 < grid.num_rows() {
            let neighbor = grid.tile_at(row + 1, col);
            let diff = neighbor.elevation - tile.elevation;
            if diff != 0 {
                let neighbor_height = self.tile_height(neighbor);
                let normal = if diff > 0 { BACK } else { FORWARD };
                buffer.emit_quad(
                    [
                        [left, neighbor_height, far],
                        [right, neighbor_height, far],
                        [left, height, far],
                        [right, height, far],
                    ],
                    normal,
                    uv,
                );
            }
        }
    }

    fn tile_height(&self, tile: &Tile) -> f32 {
        tile.elevation as f32 * self.config.height_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> MeshBuilder {
        MeshBuilder::new(MeshConfig::default())
    }

    #[test]
    fn test_flat_grid_emits_only_tops() {
        let grid = TileGrid::new(3, 4);
        let buffer = builder().build(&grid);

        assert_eq!(buffer.vertex_count(), 4 * 12, "one quad per tile, no skirts");
        assert_eq!(buffer.triangles.len(), 6 * 12);
    }

    #[test]
    fn test_uniform_nonzero_elevation_is_still_flat() {
        let grid = TileGrid::from_elevations(&[vec![7, 7], vec![7, 7]]);
        let buffer = builder().build(&grid);
        assert_eq!(buffer.vertex_count(), 4 * 4);
    }

    #[test]
    fn test_buffers_stay_index_aligned() {
        let grid = TileGrid::from_elevations(&[vec![0, 3, -1], vec![2, 2, 5]]);
        let buffer = builder().build(&grid);

        assert_eq!(buffer.vertices.len(), buffer.normals.len());
        assert_eq!(buffer.vertices.len(), buffer.uvs.len());
        assert_eq!(buffer.triangles.len() % 3, 0);

        let vertex_count = buffer.vertex_count() as u32;
        assert!(buffer.triangles.iter().all(|&i| i < vertex_count));
    }

    #[test]
    fn test_single_step_cliff() {
        let grid = TileGrid::from_elevations(&[vec![0, 5]]);
        let buffer = builder().build(&grid);

        // 2 tops + 1 X skirt
        assert_eq!(buffer.vertex_count(), 12);
        assert_eq!(buffer.triangles.len(), 18);

        // The skirt follows its tile's top quad: vertices 4..8.
        // Wall at x=1 spanning the full 0..5 gap, facing the lower tile.
        assert_eq!(
            buffer.vertices[4..8],
            [
                [1.0, 0.0, 1.0],
                [1.0, 5.0, 1.0],
                [1.0, 0.0, 0.0],
                [1.0, 5.0, 0.0],
            ]
        );
        assert!(buffer.normals[4..8].iter().all(|&n| n == LEFT));
    }

    #[test]
    fn test_cliff_symmetry_flips_normal() {
        let low_high = builder().build(&TileGrid::from_elevations(&[vec![0, 5]]));
        let high_low = builder().build(&TileGrid::from_elevations(&[vec![5, 0]]));

        assert_eq!(low_high.vertex_count(), high_low.vertex_count());
        assert_eq!(low_high.triangles.len(), high_low.triangles.len());
        assert!(low_high.normals[4..8].iter().all(|&n| n == LEFT));
        assert!(high_low.normals[4..8].iter().all(|&n| n == RIGHT));
    }

    #[test]
    fn test_z_skirt_geometry() {
        let grid = TileGrid::from_elevations(&[vec![0], vec![3]]);
        let buffer = builder().build(&grid);

        // top(0,0), Z skirt, top(1,0)
        assert_eq!(buffer.vertex_count(), 12);
        assert_eq!(
            buffer.vertices[4..8],
            [
                [0.0, 3.0, 1.0],
                [1.0, 3.0, 1.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
            ]
        );
        assert!(buffer.normals[4..8].iter().all(|&n| n == BACK));
    }

    #[test]
    fn test_interior_steps_emit_all_four_skirts() {
        let grid = TileGrid::from_elevations(&[vec![0, 1], vec![2, 3]]);
        let buffer = builder().build(&grid);

        // 4 tops + 2 X skirts + 2 Z skirts
        assert_eq!(buffer.vertex_count(), 4 * 8);
    }

    #[test]
    fn test_last_row_and_column_have_no_trailing_skirts() {
        // Steep grid; still only interior seams produce walls
        let grid = TileGrid::from_elevations(&[vec![0, 10], vec![20, 30]]);
        let buffer = builder().build(&grid);
        assert_eq!(buffer.vertex_count(), 4 * 8, "trailing edges must stay open");
    }

    #[test]
    fn test_top_uv_divides_both_axes_by_num_cols() {
        let grid = TileGrid::new(2, 4);
        let buffer = builder().build(&grid);

        // Flat grid: tile (1, 3) owns vertices 28..32
        let uv = buffer.uvs[(1 * 4 + 3) * 4];
        assert_eq!(uv, [0.75, 0.25]);
    }

    #[test]
    fn test_skirt_reuses_tile_top_uv() {
        let grid = TileGrid::from_elevations(&[vec![0, 5]]);
        let buffer = builder().build(&grid);

        assert_eq!(buffer.uvs[4], buffer.uvs[0], "wall inherits its tile's UV");
        assert_ne!(buffer.uvs[4], buffer.uvs[8], "not the neighbor's UV");
    }

    #[test]
    fn test_tile_size_scales_positions() {
        let config = MeshConfig {
            tile_size: 2.5,
            ..MeshConfig::default()
        };
        let grid = TileGrid::new(1, 2);
        let buffer = MeshBuilder::new(config).build(&grid);

        // Second tile's top quad starts at x = 2.5
        assert_eq!(buffer.vertices[4], [2.5, 0.0, 2.5]);
        assert_eq!(buffer.vertices[5], [5.0, 0.0, 2.5]);
    }

    #[test]
    fn test_zero_height_scale_flattens_but_keeps_walls() {
        let config = MeshConfig {
            height_scale: 0.0,
            ..MeshConfig::default()
        };
        let grid = TileGrid::from_elevations(&[vec![0, 5]]);
        let buffer = MeshBuilder::new(config).build(&grid);

        // Elevation still differs, so the (degenerate) wall is emitted
        assert_eq!(buffer.vertex_count(), 12);
        assert!(buffer.vertices.iter().all(|v| v[1] == 0.0));
    }

    #[test]
    fn test_top_face_winding_matches_up_normal() {
        let grid = TileGrid::new(1, 1);
        let buffer = builder().build(&grid);

        // Cross product of the first triangle's edges should point up
        let [i0, i1, i2] = [
            buffer.triangles[0] as usize,
            buffer.triangles[1] as usize,
            buffer.triangles[2] as usize,
        ];
        let (a, b, c) = (buffer.vertices[i0], buffer.vertices[i1], buffer.vertices[i2]);
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let cross_y = e1[2] * e2[0] - e1[0] * e2[2];
        assert!(cross_y > 0.0, "top face winding should face +Y");
    }

    #[test]
    fn test_empty_grid_builds_empty_buffer() {
        let buffer = builder().build(&TileGrid::new(0, 0));
        assert_eq!(buffer.vertex_count(), 0);
        assert!(buffer.triangles.is_empty());
    }

    #[test]
    fn test_rebuild_is_bit_identical() {
        let grid = TileGrid::from_elevations(&[vec![0, 2, 1], vec![3, 3, -2], vec![1, 0, 4]]);
        let b = builder();
        assert_eq!(b.build(&grid), b.build(&grid));
    }

    #[test]
    fn test_parallel_build_matches_serial() {
        // Tall enough to split into several bands
        let mut grid = TileGrid::new(100, 7);
        for row in 0..100u32 {
            for col in 0..7u32 {
                grid.set_elevation(row, col, ((row * 31 + col * 17) % 11) as i32 - 5);
            }
        }

        let b = builder();
        assert_eq!(b.build_parallel(&grid), b.build(&grid));
    }

    #[test]
    fn test_row_bands_partition_cleanly() {
        let grid = TileGrid::from_elevations(&[vec![0, 1], vec![2, 3], vec![4, 5], vec![6, 7]]);
        let b = builder();

        let mut merged = MeshBuffer::new();
        merged.append(&b.build_rows(&grid, 0..2));
        merged.append(&b.build_rows(&grid, 2..4));

        assert_eq!(merged, b.build(&grid));
    }
}
