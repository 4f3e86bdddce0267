// src/composer.rs
//! Device-independent state of the running composer.
//!
//! [`Composer`] owns the scene, camera, renderers and gizmos, and records a
//! whole frame in the fixed order: camera update, scene pass, overlay pass.
//! The winit shell in [`crate::app`] only forwards events and submits the
//! recording.

use winit::keyboard::KeyCode;

use crate::config::ComposerConfig;
use crate::error::GfxError;
use crate::gfx::camera::{Camera, CameraController};
use crate::gfx::gizmos::{CompassGizmo, GizmoContext, GizmoManager, LightDirectionGizmo};
use crate::gfx::rendering::{FrameRecorder, OverlayRenderer, SceneRenderer};
use crate::gfx::resources::GeometryStore;
use crate::gfx::scene::{NodeKind, Scene};

/// Editing commands bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Spawn(NodeKind),
    DeleteSelection,
    CycleSelection,
    ToggleProjection,
    Quit,
}

impl Shortcut {
    pub fn from_key(code: KeyCode) -> Option<Shortcut> {
        let shortcut = match code {
            KeyCode::Digit1 => Shortcut::Spawn(NodeKind::Cube),
            KeyCode::Digit2 => Shortcut::Spawn(NodeKind::Pyramid),
            KeyCode::Digit3 => Shortcut::Spawn(NodeKind::Tetrahedron),
            KeyCode::Digit4 => Shortcut::Spawn(NodeKind::Cone),
            KeyCode::Digit5 => Shortcut::Spawn(NodeKind::Cylinder),
            KeyCode::Digit6 => Shortcut::Spawn(NodeKind::Empty),
            KeyCode::Delete | KeyCode::Backspace => Shortcut::DeleteSelection,
            KeyCode::Tab => Shortcut::CycleSelection,
            KeyCode::KeyP => Shortcut::ToggleProjection,
            KeyCode::Escape => Shortcut::Quit,
            _ => return None,
        };
        Some(shortcut)
    }
}

pub struct Composer {
    pub scene: Scene,
    pub camera: Camera,
    pub controller: CameraController,
    pub scene_renderer: SceneRenderer,
    pub overlay: OverlayRenderer,
    pub gizmos: GizmoManager,
    frame: FrameRecorder,
}

impl Composer {
    /// Builds the composer for a `width` x `height` surface, uploading gizmo
    /// geometry into `store`.
    pub fn new(
        config: &ComposerConfig,
        width: u32,
        height: u32,
        store: &mut dyn GeometryStore,
    ) -> Result<Self, GfxError> {
        let mut camera = Camera::with_config(config.camera, aspect_ratio(width, height));
        camera.set_width_listener(|width| log::debug!("ortho width now {width:.2}"));

        let mut gizmos = GizmoManager::new();
        gizmos.add_gizmo(Box::new(CompassGizmo::new(store, config.gizmo_size)?));
        gizmos.add_gizmo(Box::new(LightDirectionGizmo::new(store, config.gizmo_size)?));

        Ok(Self {
            scene: Scene::new(),
            camera,
            controller: CameraController::new(),
            scene_renderer: SceneRenderer::new(config),
            overlay: OverlayRenderer::new(),
            gizmos,
            frame: FrameRecorder::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_ratio(aspect_ratio(width, height));
        self.overlay.update_projection();
    }

    /// Advances the camera and gizmos by `delta_time` seconds and records
    /// the frame for a `width` x `height` surface.
    pub fn record_frame(
        &mut self,
        delta_time: f32,
        width: u32,
        height: u32,
    ) -> Result<&FrameRecorder, GfxError> {
        self.camera.update(delta_time);
        self.gizmos.update(&GizmoContext {
            light_direction: self.scene_renderer.light_direction,
            delta_time,
        });

        self.frame.reset();
        self.scene_renderer.clear(&mut self.frame);
        self.scene_renderer.bind_resources(&mut self.frame, &self.camera);
        self.scene_renderer
            .draw(&mut self.frame, &self.scene, self.scene.root(), None)?;

        self.overlay.clear(&mut self.frame);
        self.overlay.bind_resources(&mut self.frame, &self.camera);
        self.gizmos
            .draw(&mut self.frame, &self.overlay, width, height)?;

        Ok(&self.frame)
    }

    /// Applies an editing shortcut. Returns false for [`Shortcut::Quit`].
    pub fn apply(
        &mut self,
        shortcut: Shortcut,
        store: &mut dyn GeometryStore,
    ) -> Result<bool, GfxError> {
        match shortcut {
            Shortcut::Spawn(kind) => {
                self.scene.spawn(kind, store)?;
                self.log_statistics();
            }
            Shortcut::DeleteSelection => {
                if let Some(id) = self.scene.selected() {
                    if let Some(removed) = self.scene.remove(id, Some(store)) {
                        log::debug!("deleted {} node(s) under {id}", removed.len());
                    }
                    self.log_statistics();
                }
            }
            Shortcut::CycleSelection => {
                let next = self.scene.next_selectable();
                self.scene.select(next);
            }
            Shortcut::ToggleProjection => {
                let mode = self.camera.toggle_mode();
                log::info!("projection mode: {mode:?}");
            }
            Shortcut::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Releases every geometry the composer owns.
    pub fn shutdown(&mut self, store: &mut dyn GeometryStore) -> Result<(), GfxError> {
        let root = self.scene.root();
        let top_level: Vec<_> = self
            .scene
            .get(root)
            .map(|node| node.children().to_vec())
            .unwrap_or_default();
        for id in top_level {
            self.scene.remove(id, Some(&mut *store));
        }
        self.gizmos.cleanup(store)
    }

    fn log_statistics(&self) {
        let stats = self.scene.get_statistics();
        log::debug!(
            "scene: {} nodes, {} renderable, {} triangles",
            stats.node_count,
            stats.renderable_count,
            stats.total_triangles
        );
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::ProjectionMode;
    use crate::gfx::rendering::{Primitive, RenderCommand};
    use crate::gfx::resources::HeadlessGeometryStore;

    fn composer(store: &mut HeadlessGeometryStore) -> Composer {
        Composer::new(&ComposerConfig::default(), 1280, 720, store).expect("composer")
    }

    #[test]
    fn digits_spawn_in_menu_order() {
        let kinds: Vec<_> = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
        ]
        .into_iter()
        .filter_map(|code| match Shortcut::from_key(code) {
            Some(Shortcut::Spawn(kind)) => Some(kind),
            _ => None,
        })
        .collect();
        assert_eq!(kinds, NodeKind::SPAWNABLE.to_vec());
        assert_eq!(Shortcut::from_key(KeyCode::KeyW), None);
    }

    #[test]
    fn frame_order_is_scene_then_overlay() {
        let mut store = HeadlessGeometryStore::new();
        let mut composer = composer(&mut store);
        composer
            .apply(Shortcut::Spawn(NodeKind::Cube), &mut store)
            .expect("spawn");

        let frame = composer.record_frame(0.016, 1280, 720).expect("frame");
        let commands = frame.commands();
        assert!(matches!(commands[0], RenderCommand::Clear { color: Some(_), depth: true }));
        assert!(matches!(commands[1], RenderCommand::BindProgram(_)));
        // selected cube: fill + outline
        assert!(matches!(&commands[2], RenderCommand::Draw(c) if c.primitive == Primitive::Triangles));
        assert!(matches!(&commands[3], RenderCommand::Draw(c) if c.primitive == Primitive::LineLoop));
        assert!(matches!(commands[4], RenderCommand::Clear { color: None, depth: true }));
        assert_eq!(frame.pass_count(), 2);
        assert_eq!(frame.draw_count(), 2 + 10);
    }

    #[test]
    fn delete_releases_selection_buffers() {
        let mut store = HeadlessGeometryStore::new();
        let mut composer = composer(&mut store);
        let gizmo_geometry = store.live_count();

        composer
            .apply(Shortcut::Spawn(NodeKind::Cylinder), &mut store)
            .expect("spawn");
        assert_eq!(store.live_count(), gizmo_geometry + 1);

        composer
            .apply(Shortcut::DeleteSelection, &mut store)
            .expect("delete");
        assert_eq!(store.live_count(), gizmo_geometry);
        assert!(composer.scene.is_empty());
        assert_eq!(composer.scene.selected(), None);

        // nothing selected: no-op
        composer
            .apply(Shortcut::DeleteSelection, &mut store)
            .expect("delete");
    }

    #[test]
    fn tab_cycles_and_p_toggles() {
        let mut store = HeadlessGeometryStore::new();
        let mut composer = composer(&mut store);
        let a = composer.scene.spawn(NodeKind::Cube, &mut store).expect("a");
        let b = composer.scene.spawn(NodeKind::Cone, &mut store).expect("b");
        assert_eq!(composer.scene.selected(), Some(b));

        composer.apply(Shortcut::CycleSelection, &mut store).expect("tab");
        assert_eq!(composer.scene.selected(), Some(a));

        composer
            .apply(Shortcut::ToggleProjection, &mut store)
            .expect("p");
        assert_eq!(composer.camera.mode(), ProjectionMode::Orthogonal);
        assert!(!composer.apply(Shortcut::Quit, &mut store).expect("quit"));
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut store = HeadlessGeometryStore::new();
        let mut composer = composer(&mut store);
        composer.scene.spawn(NodeKind::Pyramid, &mut store).expect("spawn");
        composer.shutdown(&mut store).expect("shutdown");
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn resize_updates_camera_aspect() {
        let mut store = HeadlessGeometryStore::new();
        let mut composer = composer(&mut store);
        composer.resize(1000, 500);
        assert!((composer.camera.aspect_ratio() - 2.0).abs() < 1e-6);
    }
}
