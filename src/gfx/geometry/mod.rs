//! # Primitive Geometry
//!
//! Canonical vertex and index data for every renderable node kind. The data
//! is fixed per shape and baked once when a node is created.
//!
//! ## Supported Primitives
//!
//! - **Cube**: unit cube, 24 vertices so each face carries its own normal
//! - **Empty**: a 0.1 wide cube, drawn only as an outline
//! - **Pyramid** / **Tetrahedron**: flat-faced solids
//! - **Cone** / **Cylinder**: 20-segment circle approximations
//!
//! ## Outline indices
//!
//! The same index buffer serves both the filled draw and the outline draw.
//! [`GeometryData::baked_indices`] appends the first index once more, so a
//! line strip over `index_count + 1` indices closes the loop while a triangle
//! list over `index_count` indices ignores the extra entry.
//!
//! ```rust
//! use scenecraft::gfx::geometry::generate_cube;
//!
//! let cube = generate_cube();
//! assert_eq!(cube.vertex_count(), 24);
//! assert_eq!(cube.triangle_count(), 12);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;
use crate::gfx::scene::NodeKind;

/// Interleaved-ready geometry for one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z), one per vertex
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u16>,
    /// Whether the shape is drawn filled; outline-only shapes skip the fill pass
    pub filled: bool,
}

impl GeometryData {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            filled: true,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Index the next pushed vertex receives.
    pub fn next_index(&self) -> u16 {
        let index = u16::try_from(self.vertices.len());
        debug_assert!(index.is_ok(), "vertex count exceeds the u16 index range");
        index.unwrap_or(u16::MAX)
    }

    /// Number of triangle-list indices, excluding the loop-closing one.
    pub fn index_count(&self) -> u32 {
        let count = u32::try_from(self.indices.len());
        debug_assert!(count.is_ok(), "index count exceeds u32");
        count.unwrap_or(u32::MAX)
    }

    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u16 {
        let index = self.next_index();
        self.vertices.push(position);
        self.normals.push(normal);
        index
    }

    pub fn push_triangle(&mut self, a: u16, b: u16, c: u16) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Vertices in the GPU layout.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .zip(self.normals.iter())
            .map(|(position, normal)| Vertex3D {
                position: *position,
                normal: *normal,
            })
            .collect()
    }

    /// Triangle indices followed by the first index again, closing the outline loop.
    pub fn baked_indices(&self) -> Vec<u16> {
        let mut out = self.indices.clone();
        if let Some(first) = self.indices.first() {
            out.push(*first);
        }
        out
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical geometry for `kind`, or `None` for the Root sentinel.
pub fn geometry_for(kind: NodeKind) -> Option<GeometryData> {
    match kind {
        NodeKind::Cube => Some(generate_cube()),
        NodeKind::Pyramid => Some(generate_pyramid()),
        NodeKind::Tetrahedron => Some(generate_tetrahedron()),
        NodeKind::Cone => Some(generate_cone()),
        NodeKind::Cylinder => Some(generate_cylinder()),
        NodeKind::Empty => Some(generate_empty()),
        NodeKind::Root => None,
    }
}
