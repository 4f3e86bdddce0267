//! # Gizmo System
//!
//! Overlay gizmos: small fixed-size graphs that show the camera's
//! orientation against world axes and the scene light.
//!
//! ## Key Components
//!
//! - [`Gizmo`] - Base trait for all gizmo implementations
//! - [`GizmoManager`] - Updates and draws gizmos in insertion order
//! - [`CompassGizmo`] - World X/Y/Z axes, top-right
//! - [`LightDirectionGizmo`] - Light direction arrow, top-left
//!
//! ## Usage
//!
//! ```no_run
//! use scenecraft::gfx::gizmos::{CompassGizmo, GizmoManager};
//! use scenecraft::gfx::resources::HeadlessGeometryStore;
//!
//! let mut store = HeadlessGeometryStore::new();
//! let mut gizmo_manager = GizmoManager::new();
//! gizmo_manager.add_gizmo(Box::new(CompassGizmo::new(&mut store, 150).unwrap()));
//! ```

pub mod compass;
pub mod light_gizmo;
pub mod manager;
pub mod traits;

// Re-export main types
pub use compass::CompassGizmo;
pub use light_gizmo::{aim_rotation, LightDirectionGizmo};
pub use manager::GizmoManager;
pub use traits::{Gizmo, GizmoContext};
