//! # Scene Management Module
//!
//! Hierarchical scene graph of primitive solids.
//!
//! ## Key Components
//!
//! - [`Scene`] - arena of nodes with a Root sentinel and a primary selection
//! - [`SceneNode`] - transform, local model matrix, geometry handle and links
//! - [`NodeKind`] - shape tag selecting the canonical geometry
//! - [`Vertex3D`] - interleaved position and normal
//!
//! ## Usage
//!
//! ```rust
//! use scenecraft::gfx::resources::HeadlessGeometryStore;
//! use scenecraft::gfx::scene::{NodeKind, Scene};
//!
//! let mut store = HeadlessGeometryStore::new();
//! let mut scene = Scene::new();
//! let cube = scene.spawn(NodeKind::Cube, &mut store).unwrap();
//! let cone = scene.spawn(NodeKind::Cone, &mut store).unwrap();
//! assert!(scene.set_parent(cone, cube));
//! assert!(!scene.set_parent(cube, cone));
//! ```

pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use node::{Geometry, NodeId, NodeKind, SceneNode, Transform};
pub use scene::{DetachedSubtree, Scene, SceneStatistics};
pub use vertex::Vertex3D;
