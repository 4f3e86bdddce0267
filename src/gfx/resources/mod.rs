// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Geometry buffers owned through [`GeometryStore`] handles, plus the depth
//! texture used by both render passes.

pub mod geometry_store;
pub mod mesh_buffers;
pub mod texture_resource;

// Re-export main types
pub use geometry_store::{
    GeometryHandle, GeometryId, GeometryStore, HeadlessGeometryStore, StoredGeometry,
};
pub use mesh_buffers::{GpuGeometryStore, MeshBuffers};
pub use texture_resource::TextureResource;
