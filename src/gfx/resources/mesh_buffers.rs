// src/gfx/resources/mesh_buffers.rs
//! wgpu-backed geometry storage.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::geometry_store::{validate_upload, GeometryHandle, GeometryId, GeometryStore};
use crate::error::GfxError;
use crate::gfx::scene::vertex::Vertex3D;

/// Vertex and index buffers of one uploaded geometry.
pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    /// Length of the baked index buffer, including the loop-closing index.
    pub index_len: u32,
}

impl MeshBuffers {
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
    }
}

/// Holds every live mesh, keyed by [`GeometryId`].
pub struct GpuGeometryStore {
    device: wgpu::Device,
    meshes: HashMap<GeometryId, MeshBuffers>,
}

impl GpuGeometryStore {
    pub fn new(device: wgpu::Device) -> Self {
        Self {
            device,
            meshes: HashMap::new(),
        }
    }

    pub fn get(&self, id: GeometryId) -> Option<&MeshBuffers> {
        self.meshes.get(&id)
    }
}

impl GeometryStore for GpuGeometryStore {
    fn upload(
        &mut self,
        label: &str,
        vertices: &[Vertex3D],
        indices: &[u16],
    ) -> Result<GeometryHandle, GfxError> {
        validate_upload(label, vertices, indices)?;

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertex Buffer")),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        // create_buffer_init pads the u16 data to the copy alignment
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Index Buffer")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let index_len = u32::try_from(indices.len());
        debug_assert!(index_len.is_ok(), "index count exceeds u32");
        let index_len = index_len.unwrap_or(u32::MAX);

        let id = GeometryId::next();
        self.meshes.insert(
            id,
            MeshBuffers {
                vertex_buffer,
                index_buffer,
                index_len,
            },
        );
        log::trace!("uploaded {label} as {id} ({} vertices)", vertices.len());
        Ok(GeometryHandle::new(id))
    }

    fn release(&mut self, handle: GeometryHandle) -> Result<(), GfxError> {
        let mesh = self
            .meshes
            .remove(&handle.id())
            .ok_or(GfxError::UnknownGeometry(handle.id()))?;
        mesh.vertex_buffer.destroy();
        mesh.index_buffer.destroy();
        Ok(())
    }

    fn live_count(&self) -> usize {
        self.meshes.len()
    }
}
