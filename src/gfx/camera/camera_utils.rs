use cgmath::Matrix4;

use crate::math::Mat4;

/// Maps OpenGL clip depth (-1..1) to the wgpu range (0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Converts a projection built in OpenGL convention for upload to wgpu.
pub fn to_wgpu_projection(projection: &Mat4) -> Mat4 {
    Mat4::from(OPENGL_TO_WGPU_MATRIX * Matrix4::from(*projection))
}

/// Column-major array for uniform buffers.
pub fn convert_matrix4_to_array(matrix: &Mat4) -> [[f32; 4]; 4] {
    matrix.to_cols_array_2d()
}
