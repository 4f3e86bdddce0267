// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! [`SceneRenderer`] and [`OverlayRenderer`] record into a [`FrameRecorder`];
//! [`RenderEngine`] owns the GPU and replays the recording.

pub mod frame;
pub mod overlay_renderer;
pub mod pipeline_manager;
pub mod render_engine;
pub mod scene_renderer;
pub mod uniforms;

// Re-export main types
pub use frame::{
    DrawCall, DrawUniforms, FrameRecorder, Primitive, ProgramBinding, ProgramKind, RenderCommand,
    Viewport,
};
pub use overlay_renderer::OverlayRenderer;
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use scene_renderer::SceneRenderer;
