//! # Gizmo Traits
//!
//! Core interface shared by every overlay gizmo.

use crate::error::GfxError;
use crate::gfx::rendering::Viewport;
use crate::gfx::resources::GeometryStore;
use crate::gfx::scene::{NodeId, Scene};
use crate::math::Vector3;

/// Per-frame inputs a gizmo may react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoContext {
    /// Direction the scene light travels in
    pub light_direction: Vector3,
    pub delta_time: f32,
}

/// An orientation indicator drawn by the overlay pass.
///
/// A gizmo owns a private [`Scene`] holding its graph. The overlay pass
/// draws the subtree under [`Gizmo::anchor`] into [`Gizmo::viewport`].
///
/// ## Lifecycle
///
/// 1. **Construct** - build the graph, uploading geometry into a store
/// 2. **Update** - called every frame with the current [`GizmoContext`]
/// 3. **Cleanup** - release the graph's geometry when removed
///
/// ```no_run
/// use scenecraft::gfx::gizmos::{CompassGizmo, Gizmo};
/// use scenecraft::gfx::resources::HeadlessGeometryStore;
///
/// let mut store = HeadlessGeometryStore::new();
/// let mut compass = CompassGizmo::new(&mut store, 150).unwrap();
/// let viewport = compass.viewport(1280, 720);
/// assert_eq!(viewport.x, 1130);
/// compass.cleanup(&mut store).unwrap();
/// ```
pub trait Gizmo {
    /// Display name, also the lookup key in the manager
    fn name(&self) -> &str;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    fn scene(&self) -> &Scene;

    fn scene_mut(&mut self) -> &mut Scene;

    /// Top node of the drawn subtree
    fn anchor(&self) -> NodeId;

    /// Screen rectangle for a surface of `width` x `height` pixels
    fn viewport(&self, width: u32, height: u32) -> Viewport;

    /// Called every frame before drawing. Default: nothing changes.
    fn update(&mut self, _context: &GizmoContext) {}

    /// Removes the graph and releases its geometry.
    fn cleanup(&mut self, store: &mut dyn GeometryStore) -> Result<(), GfxError> {
        let anchor = self.anchor();
        match self.scene_mut().remove(anchor, None) {
            Some(subtree) => subtree.release(store),
            None => Ok(()),
        }
    }
}
