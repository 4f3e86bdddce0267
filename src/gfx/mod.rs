//! # Graphics Module
//!
//! Everything between the scene graph and the screen.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Free-flying camera with perspective and orthogonal modes
//! - **Geometry** ([`geometry`]) - Canonical vertex data for every primitive kind
//! - **Scene Management** ([`scene`]) - Node hierarchy with a single selection
//! - **Rendering** ([`rendering`]) - Lit scene pass and unlit overlay pass
//! - **Gizmos** ([`gizmos`]) - Axis compass and light direction indicator
//! - **Resource Management** ([`resources`]) - Geometry buffers and depth texture
//!
//! ## Usage
//!
//! Renderers record into a [`FrameRecorder`] that needs no GPU:
//!
//! ```rust
//! use scenecraft::gfx::{Camera, FrameRecorder, Scene, SceneRenderer};
//! use scenecraft::gfx::resources::HeadlessGeometryStore;
//! use scenecraft::gfx::scene::NodeKind;
//!
//! let mut store = HeadlessGeometryStore::new();
//! let mut scene = Scene::new();
//! scene.spawn(NodeKind::Cube, &mut store).unwrap();
//!
//! let camera = Camera::new(16.0 / 9.0);
//! let renderer = SceneRenderer::default();
//! let mut frame = FrameRecorder::new();
//! renderer.clear(&mut frame);
//! renderer.bind_resources(&mut frame, &camera);
//! renderer.draw(&mut frame, &scene, scene.root(), None).unwrap();
//! assert_eq!(frame.draw_count(), 2);
//! ```
//!
//! [`FrameRecorder`]: rendering::FrameRecorder

pub mod camera;
pub mod geometry;
pub mod gizmos;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{Camera, CameraController, ProjectionMode};
pub use gizmos::{Gizmo, GizmoManager};
pub use rendering::{FrameRecorder, OverlayRenderer, RenderEngine, SceneRenderer};
pub use scene::{NodeId, NodeKind, Scene, SceneNode};
