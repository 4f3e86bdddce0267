// src/gfx/rendering/overlay_renderer.rs
//! Unlit gizmo pass.
//!
//! Gizmos follow the camera's orientation but not its position or zoom: the
//! pass uses the rotation-only view matrix and a fixed orthographic volume,
//! so each gizmo keeps its on-screen size inside its own viewport.

use crate::error::GfxError;
use crate::gfx::camera::Camera;
use crate::gfx::scene::{NodeId, Scene};
use crate::math::{Mat3, Mat4};

use super::frame::{
    DrawCall, DrawUniforms, FrameRecorder, Primitive, ProgramBinding, ProgramKind, Viewport,
};

#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    projection: Mat4,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayRenderer {
    /// Half extent of the view volume along x and y.
    pub const HALF_EXTENT: f32 = 3.0;
    /// Depth of the view volume, centred on the eye.
    pub const DEPTH: f32 = 6.0;

    pub fn new() -> Self {
        let mut renderer = Self {
            projection: Mat4::zero(),
        };
        renderer.update_projection();
        renderer
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    /// Rebuilds the fixed orthographic projection. Called on every resize.
    pub fn update_projection(&mut self) {
        let mut projection = Mat4::zero();
        projection.set(0, 0, 1.0 / Self::HALF_EXTENT);
        projection.set(1, 1, 1.0 / Self::HALF_EXTENT);
        projection.set(2, 2, -2.0 / Self::DEPTH);
        projection.set(2, 3, 0.0);
        projection.set(3, 3, 1.0);
        self.projection = projection;
    }

    /// Opens the pass, clearing depth only so gizmos land on top of the scene.
    pub fn clear(&self, frame: &mut FrameRecorder) {
        frame.clear(None, true);
    }

    pub fn bind_resources(&self, frame: &mut FrameRecorder, camera: &Camera) {
        frame.bind_program(ProgramBinding::Unlit {
            view: *camera.view_rotation_matrix(),
            projection: self.projection,
        });
    }

    /// Must precede each gizmo's `draw`.
    pub fn set_viewport(&self, frame: &mut FrameRecorder, viewport: Viewport) {
        frame.set_viewport(viewport);
    }

    /// Records `id` and its subtree, filled geometry only.
    pub fn draw(
        &self,
        frame: &mut FrameRecorder,
        scene: &Scene,
        id: NodeId,
        parent: Option<&Mat4>,
    ) -> Result<(), GfxError> {
        let Some(node) = scene.get(id) else {
            return Ok(());
        };
        if frame.bound_program() != Some(ProgramKind::Unlit) {
            return Err(GfxError::PassNotBound);
        }

        let world = match parent {
            Some(parent) => Mat4::pre_multiply(parent, node.model_matrix()),
            None => *node.model_matrix(),
        };

        match node.geometry() {
            Some(geometry) if geometry.is_filled() => frame.draw(DrawCall {
                node: node.id(),
                geometry: geometry.id(),
                primitive: Primitive::Triangles,
                index_count: geometry.index_count(),
                uniforms: DrawUniforms {
                    model: world,
                    normal: Mat3::identity(),
                    color: node.color(),
                    diffuse: 0.0,
                },
            }),
            Some(_) => {}
            None if node.kind().is_renderable() => {
                return Err(GfxError::MissingGeometry(node.id()));
            }
            None => {}
        }

        for child in node.children() {
            self.draw(frame, scene, *child, Some(&world))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::frame::RenderCommand;
    use crate::gfx::resources::HeadlessGeometryStore;
    use crate::gfx::scene::NodeKind;
    use crate::math::Vector3;

    #[test]
    fn projection_is_a_fixed_volume() {
        let overlay = OverlayRenderer::new();
        let p = overlay.projection_matrix();
        assert!((p.get(0, 0) - 1.0 / 3.0).abs() < 1e-6);
        assert!((p.get(1, 1) - 1.0 / 3.0).abs() < 1e-6);
        assert!((p.get(2, 2) + 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(p.get(2, 3), 0.0);
        assert_eq!(p.get(3, 3), 1.0);
        assert_eq!(p.get(3, 2), 0.0);
    }

    #[test]
    fn view_ignores_camera_translation() {
        let overlay = OverlayRenderer::new();
        let mut camera = Camera::new(1.0);
        camera.set_position(Vector3::new(50.0, -20.0, 7.0));

        let mut frame = FrameRecorder::new();
        overlay.clear(&mut frame);
        overlay.bind_resources(&mut frame, &camera);

        let view = frame.bound_binding().map(|b| *b.view()).expect("bound");
        assert_eq!(view, *camera.view_rotation_matrix());
        assert_eq!(view.translation(), Vector3::zero());
    }

    #[test]
    fn clear_keeps_colour() {
        let overlay = OverlayRenderer::new();
        let mut frame = FrameRecorder::new();
        overlay.clear(&mut frame);
        assert_eq!(
            frame.commands(),
            &[RenderCommand::Clear {
                color: None,
                depth: true
            }]
        );
    }

    #[test]
    fn draws_into_the_requested_viewport() {
        let mut store = HeadlessGeometryStore::new();
        let mut scene = Scene::new();
        let anchor = scene.create(NodeKind::Cube, &mut store).expect("anchor");
        scene.create_under(anchor, NodeKind::Cone, &mut store).expect("tip");

        let overlay = OverlayRenderer::new();
        let camera = Camera::new(1.0);
        let mut frame = FrameRecorder::new();
        overlay.clear(&mut frame);
        overlay.bind_resources(&mut frame, &camera);
        overlay.set_viewport(&mut frame, Viewport::new(10, 0, 150, 150));
        overlay
            .draw(&mut frame, &scene, scene.root(), None)
            .expect("draw");

        assert!(matches!(
            frame.commands()[2],
            RenderCommand::SetViewport(Viewport { x: 10, width: 150, .. })
        ));
        assert_eq!(frame.draw_count(), 2);
    }

    #[test]
    fn selection_is_not_outlined() {
        let mut store = HeadlessGeometryStore::new();
        let mut scene = Scene::new();
        scene.spawn(NodeKind::Cube, &mut store).expect("cube");

        let overlay = OverlayRenderer::new();
        let camera = Camera::new(1.0);
        let mut frame = FrameRecorder::new();
        overlay.clear(&mut frame);
        overlay.bind_resources(&mut frame, &camera);
        overlay
            .draw(&mut frame, &scene, scene.root(), None)
            .expect("draw");
        assert!(frame.draw_calls().all(|c| c.primitive == Primitive::Triangles));
        assert_eq!(frame.draw_count(), 1);
    }

    #[test]
    fn lit_binding_does_not_count() {
        let mut store = HeadlessGeometryStore::new();
        let mut scene = Scene::new();
        scene.create(NodeKind::Cube, &mut store).expect("cube");
        let overlay = OverlayRenderer::new();
        let mut frame = FrameRecorder::new();
        frame.clear(None, true);
        frame.bind_program(ProgramBinding::Lit {
            view: Mat4::identity(),
            projection: Mat4::identity(),
            ambient_color: [0.0; 3],
            direction_to_light: Vector3::up(),
        });
        let err = overlay
            .draw(&mut frame, &scene, scene.root(), None)
            .unwrap_err();
        assert!(matches!(err, GfxError::PassNotBound));
    }
}
