//! # Scenecraft Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use scenecraft::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ComposerConfig::from_env().with_title("My scene");
//!     ComposerApp::new(config)?.run()
//! }
//! ```

// Re-export core application types
pub use crate::app::ComposerApp;
pub use crate::composer::{Composer, Shortcut};
pub use crate::config::{CameraConfig, ComposerConfig};
pub use crate::error::{GfxError, MathError};

// Re-export graphics and scene types
pub use crate::gfx::camera::{Camera, CameraController, ProjectionMode};
pub use crate::gfx::gizmos::{CompassGizmo, Gizmo, GizmoContext, GizmoManager, LightDirectionGizmo};
pub use crate::gfx::rendering::{FrameRecorder, OverlayRenderer, RenderEngine, SceneRenderer};
pub use crate::gfx::resources::{GeometryStore, HeadlessGeometryStore};
pub use crate::gfx::scene::{NodeId, NodeKind, Scene, SceneNode, Transform};

// Re-export math kernel
pub use crate::math::{Mat3, Mat4, Vector3};
