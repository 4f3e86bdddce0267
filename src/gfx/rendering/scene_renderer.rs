// src/gfx/rendering/scene_renderer.rs
//! Lit scene pass with selection outlines.

use crate::config::ComposerConfig;
use crate::error::GfxError;
use crate::gfx::camera::Camera;
use crate::gfx::scene::{NodeId, Scene, SceneNode};
use crate::math::{Mat3, Mat4, Vector3};

use super::frame::{DrawCall, DrawUniforms, FrameRecorder, Primitive, ProgramBinding, ProgramKind};

/// Draws a scene graph with ambient plus one directional light.
///
/// Usage per frame is `clear`, `bind_resources`, then `draw` on the Root.
/// Selected nodes get a second, line-loop draw in [`Self::outline_color`].
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    background_color: [f32; 3],
    pub outline_color: [f32; 3],
    pub spotlight_strength: f32,
    /// Direction the light travels in; the shader normalizes it.
    pub light_direction: Vector3,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new(&ComposerConfig::default())
    }
}

impl SceneRenderer {
    /// Diffuse term used while drawing outlines.
    pub const OUTLINE_DIFFUSE: f32 = 0.1;

    pub fn new(config: &ComposerConfig) -> Self {
        Self {
            background_color: config.background_color,
            outline_color: config.outline_color,
            spotlight_strength: config.spotlight_strength,
            light_direction: config.light_direction,
        }
    }

    /// Clear colour of the pass, doubling as the ambient light colour.
    pub fn background_color(&self) -> [f32; 3] {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: [f32; 3]) {
        self.background_color = color;
    }

    pub fn direction_to_light(&self) -> Vector3 {
        -self.light_direction
    }

    /// Opens the pass, clearing colour and depth.
    pub fn clear(&self, frame: &mut FrameRecorder) {
        frame.clear(Some(self.background_color), true);
    }

    pub fn bind_resources(&self, frame: &mut FrameRecorder, camera: &Camera) {
        frame.bind_program(ProgramBinding::Lit {
            view: *camera.view_matrix(),
            projection: *camera.projection_matrix(),
            ambient_color: self.background_color,
            direction_to_light: self.direction_to_light(),
        });
    }

    /// Records `id` and its subtree in pre-order.
    ///
    /// `parent` is the accumulated world matrix of the node's parent; `None`
    /// uses the node's local matrix as-is. Unknown ids are skipped silently.
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
        let view = match frame.bound_binding() {
            Some(binding) if binding.kind() == ProgramKind::Lit => *binding.view(),
            _ => return Err(GfxError::PassNotBound),
        };

        let world = match parent {
            Some(parent) => Mat4::pre_multiply(parent, node.model_matrix()),
            None => *node.model_matrix(),
        };

        self.draw_node(frame, node, &view, &world)?;

        for child in node.children() {
            self.draw(frame, scene, *child, Some(&world))?;
        }
        Ok(())
    }

    fn draw_node(
        &self,
        frame: &mut FrameRecorder,
        node: &SceneNode,
        view: &Mat4,
        world: &Mat4,
    ) -> Result<(), GfxError> {
        let Some(geometry) = node.geometry() else {
            if node.kind().is_renderable() {
                return Err(GfxError::MissingGeometry(node.id()));
            }
            return Ok(());
        };

        let model_view = Mat4::pre_multiply(view, world);
        let normal = match Mat3::inverse(&Mat3::from_mat4(&model_view)) {
            Ok(normal) => normal,
            Err(err) => {
                log::warn!("skipping {} '{}': {err}", node.id(), node.name());
                return Ok(());
            }
        };

        let mut uniforms = DrawUniforms {
            model: *world,
            normal,
            color: node.color(),
            diffuse: self.spotlight_strength,
        };

        if geometry.is_filled() {
            frame.draw(DrawCall {
                node: node.id(),
                geometry: geometry.id(),
                primitive: Primitive::Triangles,
                index_count: geometry.index_count(),
                uniforms,
            });
        }

        if node.is_selected() {
            uniforms.color = self.outline_color;
            uniforms.diffuse = Self::OUTLINE_DIFFUSE;
            frame.draw(DrawCall {
                node: node.id(),
                geometry: geometry.id(),
                primitive: Primitive::LineLoop,
                index_count: geometry.outline_index_count(),
                uniforms,
            });
        }
        Ok(())
    }
}
