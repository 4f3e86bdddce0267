// src/gfx/resources/geometry_store.rs
//! Ownership boundary for per-node vertex and index buffers.
//!
//! Nodes never hold GPU objects directly. They hold a [`GeometryHandle`]
//! returned by a [`GeometryStore`], and hand it back through
//! [`GeometryStore::release`] exactly once when they are removed. The handle
//! is move-only, so double release does not type-check.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::GfxError;
use crate::gfx::scene::vertex::Vertex3D;

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(1);

/// Copyable key identifying uploaded geometry inside its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

impl GeometryId {
    pub fn next() -> Self {
        Self(NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GeometryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geometry#{}", self.0)
    }
}

/// Owning token for one uploaded geometry. Not `Clone`.
#[derive(Debug, PartialEq, Eq)]
pub struct GeometryHandle {
    id: GeometryId,
}

impl GeometryHandle {
    /// Only stores mint handles.
    pub(crate) fn new(id: GeometryId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }
}

/// Allocates and frees geometry buffers.
pub trait GeometryStore {
    /// Uploads interleaved vertices and `u16` indices, returning the owning handle.
    fn upload(
        &mut self,
        label: &str,
        vertices: &[Vertex3D],
        indices: &[u16],
    ) -> Result<GeometryHandle, GfxError>;

    /// Frees the buffers behind `handle`.
    fn release(&mut self, handle: GeometryHandle) -> Result<(), GfxError>;

    /// Number of live geometries.
    fn live_count(&self) -> usize;
}

/// Reject uploads that could never be drawn.
pub(crate) fn validate_upload(
    label: &str,
    vertices: &[Vertex3D],
    indices: &[u16],
) -> Result<(), GfxError> {
    if vertices.is_empty() || indices.is_empty() {
        return Err(GfxError::EmptyGeometry(label.to_string()));
    }
    Ok(())
}

/// CPU-side copy of an upload, kept by [`HeadlessGeometryStore`].
#[derive(Debug, Clone)]
pub struct StoredGeometry {
    pub label: String,
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u16>,
}

/// In-memory store with no device behind it.
///
/// Used by tests and by tooling that only needs the scene graph.
#[derive(Debug, Default)]
pub struct HeadlessGeometryStore {
    live: HashMap<GeometryId, StoredGeometry>,
    uploads: usize,
    releases: usize,
}

impl HeadlessGeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: GeometryId) -> Option<&StoredGeometry> {
        self.live.get(&id)
    }

    pub fn contains(&self, id: GeometryId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn total_uploads(&self) -> usize {
        self.uploads
    }

    pub fn total_releases(&self) -> usize {
        self.releases
    }
}

impl GeometryStore for HeadlessGeometryStore {
    fn upload(
        &mut self,
        label: &str,
        vertices: &[Vertex3D],
        indices: &[u16],
    ) -> Result<GeometryHandle, GfxError> {
        validate_upload(label, vertices, indices)?;
        let id = GeometryId::next();
        self.live.insert(
            id,
            StoredGeometry {
                label: label.to_string(),
                vertices: vertices.to_vec(),
                indices: indices.to_vec(),
            },
        );
        self.uploads += 1;
        Ok(GeometryHandle::new(id))
    }

    fn release(&mut self, handle: GeometryHandle) -> Result<(), GfxError> {
        self.live
            .remove(&handle.id())
            .ok_or(GfxError::UnknownGeometry(handle.id()))?;
        self.releases += 1;
        Ok(())
    }

    fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;

    #[test]
    fn upload_then_release() {
        let mut store = HeadlessGeometryStore::new();
        let cube = generate_cube();

        let handle = store
            .upload("cube", &cube.to_vertices(), &cube.baked_indices())
            .expect("upload");
        let id = handle.id();
        assert!(store.contains(id));
        assert_eq!(store.get(id).map(|g| g.indices.len()), Some(37));
        assert_eq!(store.live_count(), 1);

        store.release(handle).expect("release");
        assert!(!store.contains(id));
        assert_eq!(store.live_count(), 0);
        assert_eq!((store.total_uploads(), store.total_releases()), (1, 1));
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let mut a = HeadlessGeometryStore::new();
        let mut b = HeadlessGeometryStore::new();
        let cube = generate_cube();
        let handle = a
            .upload("cube", &cube.to_vertices(), &cube.indices)
            .expect("upload");

        let err = b.release(handle).unwrap_err();
        assert!(matches!(err, GfxError::UnknownGeometry(_)));
    }

    #[test]
    fn empty_uploads_fail() {
        let mut store = HeadlessGeometryStore::new();
        let err = store.upload("nothing", &[], &[]).unwrap_err();
        assert!(matches!(err, GfxError::EmptyGeometry(label) if label == "nothing"));
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn ids_are_unique() {
        let a = GeometryId::next();
        let b = GeometryId::next();
        assert_ne!(a, b);
    }
}
