// src/error.rs
//! Error types shared across the composer core.

use thiserror::Error;

use crate::gfx::resources::GeometryId;
use crate::gfx::scene::{NodeId, NodeKind};

/// Failures of the math kernel.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MathError {
    /// The matrix has a determinant of exactly zero.
    #[error("matrix is not invertible (determinant {determinant})")]
    NotInvertible { determinant: f32 },
}

/// Failures of the rendering core and its GPU plumbing.
#[derive(Debug, Error)]
pub enum GfxError {
    #[error("draw issued before bind_resources() for this pass")]
    PassNotBound,

    #[error("node {0} has a renderable kind but no allocated geometry")]
    MissingGeometry(NodeId),

    #[error("geometry {0} is not owned by this store")]
    UnknownGeometry(GeometryId),

    #[error("node kind {0:?} cannot be spawned")]
    NotSpawnable(NodeKind),

    #[error("geometry '{0}' has no vertices or indices")]
    EmptyGeometry(String),

    #[error("node {0} does not exist in this scene")]
    UnknownNode(NodeId),

    #[error("no pipeline registered under '{0}'")]
    Pipeline(String),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to acquire device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}
