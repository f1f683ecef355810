/// Represents a single tile in the map grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    /// Grid row (0-based)
    pub row: u32,
    /// Grid column (0-based)
    pub col: u32,
    /// Signed height in elevation units; world height is `elevation * height_scale`
    pub elevation: i32,
}

impl Tile {
    pub fn new(row: u32, col: u32, elevation: i32) -> Self {
        Self {
            row,
            col,
            elevation,
        }
    }
}

/// Dense rectangular grid of tiles stored row-major (index = row * num_cols + col).
/// Every (row, col) inside the dimensions holds exactly one tile.
#[derive(Clone, Debug, Default)]
pub struct TileGrid {
    num_rows: u32,
    num_cols: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create a grid of the given dimensions with every elevation at 0
    pub fn new(num_rows: u32, num_cols: u32) -> Self {
        let mut tiles = Vec::with_capacity((num_rows as usize) * (num_cols as usize));
        for row in 0..num_rows {
            for col in 0..num_cols {
                tiles.push(Tile::new(row, col, 0));
            }
        }
        Self {
            num_rows,
            num_cols,
            tiles,
        }
    }

    /// Build a grid from a nested elevation table (outer = rows).
    /// Panics if the rows are ragged.
    pub fn from_elevations(elevations: &[Vec<i32>]) -> Self {
        let num_rows = elevations.len() as u32;
        let num_cols = elevations.first().map_or(0, |r| r.len()) as u32;

        let mut grid = Self::new(num_rows, num_cols);
        for (row, row_elevations) in elevations.iter().enumerate() {
            assert_eq!(
                row_elevations.len() as u32,
                num_cols,
                "ragged elevation table at row {}",
                row
            );
            for (col, &elevation) in row_elevations.iter().enumerate() {
                grid.set_elevation(row as u32, col as u32, elevation);
            }
        }
        grid
    }

    pub fn num_rows(&self) -> u32 {
        self.num_rows
    }

    pub fn num_cols(&self) -> u32 {
        self.num_cols
    }

    /// Total number of tiles
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    fn index(&self, row: u32, col: u32) -> usize {
        assert!(
            row < self.num_rows && col < self.num_cols,
            "tile ({}, {}) outside {}x{} grid",
            row,
            col,
            self.num_rows,
            self.num_cols
        );
        (row as usize) * (self.num_cols as usize) + (col as usize)
    }

    /// Get the tile at the given position. Panics if out of bounds.
    pub fn tile_at(&self, row: u32, col: u32) -> &Tile {
        &self.tiles[self.index(row, col)]
    }

    /// Elevation at the given position. Panics if out of bounds.
    pub fn elevation_at(&self, row: u32, col: u32) -> i32 {
        self.tiles[self.index(row, col)].elevation
    }

    /// Set the elevation of one tile. Panics if out of bounds.
    pub fn set_elevation(&mut self, row: u32, col: u32, elevation: i32) {
        let idx = self.index(row, col);
        self.tiles[idx].elevation = elevation;
    }

    /// Iterate over all tiles in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}
