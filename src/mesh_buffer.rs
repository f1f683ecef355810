//! Append-only mesh accumulator.
//!
//! One buffer is owned by a single build pass; it grows through
//! `emit_quad` calls and is handed off read-only once the pass finishes.

/// Accumulated vertex/normal/UV/index data for a complete mesh.
/// Arrays are index-aligned: `vertices[i]` pairs with `normals[i]` and `uvs[i]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Triangle index list; every consecutive triple is one triangle
    pub triangles: Vec<u32>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Append one quad: 4 fresh vertices sharing a flat normal and a single UV,
    /// triangulated as (v0, v3, v2) and (v0, v1, v3).
    ///
    /// Vertices are never shared between quads; each face owns its 4 entries so
    /// flat normals and per-face UVs stay exact. Zero-area quads are appended
    /// as-is and produce degenerate triangles.
    pub fn emit_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3], uv: [f32; 2]) {
        let v0 = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&corners);
        self.normals.extend_from_slice(&[normal; 4]);
        self.uvs.extend_from_slice(&[uv; 4]);

        self.triangles
            .extend_from_slice(&[v0, v0 + 3, v0 + 2, v0, v0 + 1, v0 + 3]);
    }

    /// Append another buffer, offsetting its triangle indices past the
    /// vertices already present. Used to merge row-band partial meshes.
    pub fn append(&mut self, other: &MeshBuffer) {
        let base_index = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.triangles
            .extend(other.triangles.iter().map(|&i| base_index + i));
    }
}
