// src/gfx/rendering/frame.rs
//! Device-independent frame description.
//!
//! Renderers never talk to wgpu directly. They append [`RenderCommand`]s to a
//! [`FrameRecorder`], and [`super::RenderEngine::render`] replays the list on
//! the GPU. Tests inspect the same list without a device.

use crate::gfx::resources::GeometryId;
use crate::gfx::scene::NodeId;
use crate::math::{Mat3, Mat4, Vector3};

/// Shader program family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    Lit,
    Unlit,
}

/// How the indices of a draw are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Triangles,
    /// Closed line loop, drawn as a strip over the loop-closing index buffer.
    LineLoop,
}

/// Pixel rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Intersects the rectangle with a `width` x `height` target. Returns
    /// `None` when nothing is left to draw into.
    pub fn clamped_to(&self, width: u32, height: u32) -> Option<Viewport> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let w = self.width.min(width - self.x);
        let h = self.height.min(height - self.y);
        if w == 0 || h == 0 {
            return None;
        }
        Some(Viewport::new(self.x, self.y, w, h))
    }
}

/// Per-pass uniforms selected by `bind_resources`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramBinding {
    Lit {
        view: Mat4,
        projection: Mat4,
        ambient_color: [f32; 3],
        direction_to_light: Vector3,
    },
    Unlit {
        view: Mat4,
        projection: Mat4,
    },
}

impl ProgramBinding {
    pub fn kind(&self) -> ProgramKind {
        match self {
            ProgramBinding::Lit { .. } => ProgramKind::Lit,
            ProgramBinding::Unlit { .. } => ProgramKind::Unlit,
        }
    }

    pub fn view(&self) -> &Mat4 {
        match self {
            ProgramBinding::Lit { view, .. } | ProgramBinding::Unlit { view, .. } => view,
        }
    }

    pub fn projection(&self) -> &Mat4 {
        match self {
            ProgramBinding::Lit { projection, .. } | ProgramBinding::Unlit { projection, .. } => {
                projection
            }
        }
    }
}

/// Per-draw uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawUniforms {
    pub model: Mat4,
    /// Unused by the unlit program
    pub normal: Mat3,
    pub color: [f32; 3],
    /// Unused by the unlit program
    pub diffuse: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub node: NodeId,
    pub geometry: GeometryId,
    pub primitive: Primitive,
    pub index_count: u32,
    pub uniforms: DrawUniforms,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Starts a new pass. `None` keeps the current colour contents.
    Clear { color: Option<[f32; 3]>, depth: bool },
    BindProgram(ProgramBinding),
    SetViewport(Viewport),
    Draw(DrawCall),
}

/// Command list of one frame.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    commands: Vec<RenderCommand>,
    bound: Option<ProgramBinding>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a pass. Any program bound before it is forgotten.
    pub fn clear(&mut self, color: Option<[f32; 3]>, depth: bool) {
        self.bound = None;
        self.commands.push(RenderCommand::Clear { color, depth });
    }

    pub fn bind_program(&mut self, binding: ProgramBinding) {
        self.bound = Some(binding.clone());
        self.commands.push(RenderCommand::BindProgram(binding));
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.commands.push(RenderCommand::SetViewport(viewport));
    }

    pub fn draw(&mut self, call: DrawCall) {
        self.commands.push(RenderCommand::Draw(call));
    }

    /// Program bound in the current pass.
    pub fn bound_program(&self) -> Option<ProgramKind> {
        self.bound.as_ref().map(ProgramBinding::kind)
    }

    pub fn bound_binding(&self) -> Option<&ProgramBinding> {
        self.bound.as_ref()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.commands.iter().filter_map(|command| match command {
            RenderCommand::Draw(call) => Some(call),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.draw_calls().count()
    }

    pub fn pass_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, RenderCommand::Clear { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Empties the list for the next frame, keeping its allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.bound = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_forgets_the_bound_program() {
        let mut frame = FrameRecorder::new();
        frame.clear(Some([0.0; 3]), true);
        frame.bind_program(ProgramBinding::Unlit {
            view: Mat4::identity(),
            projection: Mat4::identity(),
        });
        assert_eq!(frame.bound_program(), Some(ProgramKind::Unlit));

        frame.clear(None, true);
        assert_eq!(frame.bound_program(), None);
        assert_eq!(frame.pass_count(), 2);

        frame.reset();
        assert!(frame.is_empty());
    }

    #[test]
    fn viewport_clamping() {
        let gizmo = Viewport::new(1100, 0, 150, 150);
        assert_eq!(gizmo.clamped_to(1200, 700), Some(Viewport::new(1100, 0, 100, 150)));
        assert_eq!(gizmo.clamped_to(1000, 700), None);
        assert_eq!(Viewport::full(10, 20).clamped_to(10, 20), Some(Viewport::full(10, 20)));
    }
}
