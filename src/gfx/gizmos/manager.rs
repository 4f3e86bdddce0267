//! # Gizmo Manager
//!
//! Owns the overlay gizmos and drives their update and draw, in insertion order.

use crate::error::GfxError;
use crate::gfx::gizmos::traits::{Gizmo, GizmoContext};
use crate::gfx::rendering::{FrameRecorder, OverlayRenderer};
use crate::gfx::resources::GeometryStore;

/// Manager for handling multiple gizmo instances
pub struct GizmoManager {
    gizmos: Vec<Box<dyn Gizmo>>,
    /// Whether the gizmo system is globally enabled
    enabled: bool,
}

impl GizmoManager {
    pub fn new() -> Self {
        Self {
            gizmos: Vec::new(),
            enabled: true,
        }
    }

    /// Adds a gizmo, replacing any existing one with the same name. The
    /// replaced gizmo is returned so its geometry can be released.
    pub fn add_gizmo(&mut self, gizmo: Box<dyn Gizmo>) -> Option<Box<dyn Gizmo>> {
        match self.gizmos.iter().position(|g| g.name() == gizmo.name()) {
            Some(index) => Some(std::mem::replace(&mut self.gizmos[index], gizmo)),
            None => {
                self.gizmos.push(gizmo);
                None
            }
        }
    }

    /// Removes a gizmo by name and releases its geometry
    pub fn remove_gizmo(
        &mut self,
        name: &str,
        store: &mut dyn GeometryStore,
    ) -> Result<bool, GfxError> {
        let Some(index) = self.gizmos.iter().position(|g| g.name() == name) else {
            return Ok(false);
        };
        let mut gizmo = self.gizmos.remove(index);
        gizmo.cleanup(store)?;
        Ok(true)
    }

    pub fn has_gizmo(&self, name: &str) -> bool {
        self.gizmos.iter().any(|g| g.name() == name)
    }

    pub fn get_gizmo(&self, name: &str) -> Option<&dyn Gizmo> {
        self.gizmos
            .iter()
            .find(|g| g.name() == name)
            .map(|g| g.as_ref())
    }

    pub fn get_gizmo_mut(&mut self, name: &str) -> Option<&mut (dyn Gizmo + 'static)> {
        self.gizmos
            .iter_mut()
            .find(|g| g.name() == name)
            .map(|g| g.as_mut())
    }

    /// Updates every enabled gizmo
    pub fn update(&mut self, context: &GizmoContext) {
        if !self.enabled {
            return;
        }
        for gizmo in self.gizmos.iter_mut().filter(|g| g.is_enabled()) {
            gizmo.update(context);
        }
    }

    /// Records every enabled gizmo into the overlay pass.
    ///
    /// The overlay must already be cleared and bound.
    pub fn draw(
        &self,
        frame: &mut FrameRecorder,
        overlay: &OverlayRenderer,
        width: u32,
        height: u32,
    ) -> Result<(), GfxError> {
        if !self.enabled {
            return Ok(());
        }
        for gizmo in self.gizmos.iter().filter(|g| g.is_enabled()) {
            overlay.set_viewport(frame, gizmo.viewport(width, height));
            overlay.draw(frame, gizmo.scene(), gizmo.anchor(), None)?;
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the enabled state of the gizmo system
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn gizmo_count(&self) -> usize {
        self.gizmos.len()
    }

    pub fn get_gizmo_names(&self) -> Vec<&str> {
        self.gizmos.iter().map(|g| g.name()).collect()
    }

    /// Clean up all gizmos
    pub fn cleanup(&mut self, store: &mut dyn GeometryStore) -> Result<(), GfxError> {
        for mut gizmo in self.gizmos.drain(..) {
            gizmo.cleanup(store)?;
        }
        Ok(())
    }
}

impl Default for GizmoManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::Camera;
    use crate::gfx::gizmos::{CompassGizmo, LightDirectionGizmo};
    use crate::gfx::rendering::{RenderCommand, Viewport};
    use crate::gfx::resources::HeadlessGeometryStore;
    use crate::math::Vector3;

    fn manager(store: &mut HeadlessGeometryStore) -> GizmoManager {
        let mut manager = GizmoManager::new();
        manager.add_gizmo(Box::new(CompassGizmo::new(store, 150).expect("compass")));
        manager.add_gizmo(Box::new(LightDirectionGizmo::new(store, 150).expect("light")));
        manager
    }

    #[test]
    fn draws_each_gizmo_in_its_viewport() {
        let mut store = HeadlessGeometryStore::new();
        let gizmos = manager(&mut store);
        let overlay = OverlayRenderer::new();
        let camera = Camera::new(1.0);

        let mut frame = FrameRecorder::new();
        overlay.clear(&mut frame);
        overlay.bind_resources(&mut frame, &camera);
        gizmos.draw(&mut frame, &overlay, 800, 600).expect("draw");

        let viewports: Vec<Viewport> = frame
            .commands()
            .iter()
            .filter_map(|c| match c {
                RenderCommand::SetViewport(v) => Some(*v),
                _ => None,
            })
            .collect();
        assert_eq!(
            viewports,
            vec![Viewport::new(650, 0, 150, 150), Viewport::new(0, 0, 150, 150)]
        );
        // compass: cube + 3 shafts + 3 tips, light: cube + shaft + tip
        assert_eq!(frame.draw_count(), 10);
    }

    #[test]
    fn disabled_gizmos_are_skipped() {
        let mut store = HeadlessGeometryStore::new();
        let mut gizmos = manager(&mut store);
        gizmos
            .get_gizmo_mut(CompassGizmo::NAME)
            .expect("compass")
            .set_enabled(false);

        let overlay = OverlayRenderer::new();
        let camera = Camera::new(1.0);
        let mut frame = FrameRecorder::new();
        overlay.clear(&mut frame);
        overlay.bind_resources(&mut frame, &camera);
        gizmos.draw(&mut frame, &overlay, 800, 600).expect("draw");
        assert_eq!(frame.draw_count(), 3);

        gizmos.set_enabled(false);
        frame.reset();
        gizmos.draw(&mut frame, &overlay, 800, 600).expect("draw");
        assert!(frame.is_empty());
    }

    #[test]
    fn update_reaches_enabled_gizmos() {
        let mut store = HeadlessGeometryStore::new();
        let mut gizmos = manager(&mut store);
        gizmos.update(&GizmoContext {
            light_direction: Vector3::new(0.0, 0.0, 1.0),
            delta_time: 0.016,
        });
        let light = gizmos.get_gizmo(LightDirectionGizmo::NAME).expect("light");
        let rotation = light
            .scene()
            .get(light.anchor())
            .expect("anchor")
            .rotation();
        assert!((rotation.x - 90.0).abs() < 1e-4);
    }

    #[test]
    fn removal_releases_geometry() {
        let mut store = HeadlessGeometryStore::new();
        let mut gizmos = manager(&mut store);
        assert_eq!(store.live_count(), 10);

        assert!(gizmos.remove_gizmo(CompassGizmo::NAME, &mut store).expect("remove"));
        assert!(!gizmos.remove_gizmo(CompassGizmo::NAME, &mut store).expect("remove"));
        assert_eq!(store.live_count(), 3);
        assert_eq!(gizmos.get_gizmo_names(), vec![LightDirectionGizmo::NAME]);

        gizmos.cleanup(&mut store).expect("cleanup");
        assert_eq!(store.live_count(), 0);
        assert_eq!(gizmos.gizmo_count(), 0);
    }

    #[test]
    fn adding_a_duplicate_name_replaces() {
        let mut store = HeadlessGeometryStore::new();
        let mut gizmos = manager(&mut store);
        let old = gizmos.add_gizmo(Box::new(CompassGizmo::new(&mut store, 100).expect("compass")));
        assert!(old.is_some());
        assert_eq!(gizmos.gizmo_count(), 2);
        assert!(gizmos.has_gizmo(CompassGizmo::NAME));
    }
}
