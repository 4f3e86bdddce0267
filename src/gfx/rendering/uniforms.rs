// src/gfx/rendering/uniforms.rs
//! GPU layouts of the pass and draw uniform blocks.
//!
//! Field order and padding match the WGSL structs in `lit.wgsl` and
//! `unlit.wgsl`. Matrices are stored column-major.

use bytemuck::{Pod, Zeroable};

use super::frame::{DrawUniforms, ProgramBinding};
use crate::gfx::camera::to_wgpu_projection;

/// `@group(0) @binding(0)`: camera and lighting, one per bound program.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct PassUniformsRaw {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub ambient_color: [f32; 4],
    pub direction_to_light: [f32; 4],
}

impl From<&ProgramBinding> for PassUniformsRaw {
    fn from(binding: &ProgramBinding) -> Self {
        let (ambient_color, direction_to_light) = match binding {
            ProgramBinding::Lit {
                ambient_color,
                direction_to_light,
                ..
            } => (
                [ambient_color[0], ambient_color[1], ambient_color[2], 1.0],
                [direction_to_light.x, direction_to_light.y, direction_to_light.z, 0.0],
            ),
            ProgramBinding::Unlit { .. } => ([0.0; 4], [0.0; 4]),
        };
        Self {
            view: binding.view().to_cols_array_2d(),
            projection: to_wgpu_projection(binding.projection()).to_cols_array_2d(),
            ambient_color,
            direction_to_light,
        }
    }
}

/// `@group(1) @binding(0)`: per-draw transform and material.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct DrawUniformsRaw {
    pub model: [[f32; 4]; 4],
    /// mat3x3 columns, each padded to 16 bytes
    pub normal: [[f32; 4]; 3],
    pub color: [f32; 3],
    pub diffuse: f32,
}

impl From<&DrawUniforms> for DrawUniformsRaw {
    fn from(uniforms: &DrawUniforms) -> Self {
        Self {
            model: uniforms.model.to_cols_array_2d(),
            normal: uniforms.normal.to_padded_cols(),
            color: uniforms.color,
            diffuse: uniforms.diffuse,
        }
    }
}
