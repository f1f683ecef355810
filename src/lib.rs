//! Heightmap-tile mesh generation.
//!
//! Converts a rectangular grid of integer tile elevations into a triangle
//! mesh: one flat top quad per tile plus vertical skirt quads wherever
//! adjacent tiles differ in elevation. The output is a plain vertex/normal/
//! UV/index buffer ready for a renderer or a triangle-mesh collider.

pub mod debug_log;
pub mod elevation;
pub mod mesh_buffer;
pub mod mesh_builder;
pub mod mesh_worker;
pub mod tile_grid;

pub use elevation::ElevationField;
pub use mesh_buffer::MeshBuffer;
pub use mesh_builder::{MeshBuilder, MeshConfig};
pub use mesh_worker::{MapCoord, MeshRequest, MeshResult, MeshWorkerPool};
pub use tile_grid::{Tile, TileGrid};
