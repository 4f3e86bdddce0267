// src/math/convert.rs
//! Conversions between the kernel types and `cgmath`.
//!
//! cgmath stores matrices column-major (`m[col][row]`), the kernel stores
//! them row-major, so every matrix conversion swaps the indices.

use super::{Mat3, Mat4, Vector3};

impl From<Mat4> for cgmath::Matrix4<f32> {
    fn from(m: Mat4) -> Self {
        cgmath::Matrix4::from(m.to_cols_array_2d())
    }
}

impl From<cgmath::Matrix4<f32>> for Mat4 {
    fn from(m: cgmath::Matrix4<f32>) -> Self {
        let cols: [[f32; 4]; 4] = m.into();
        Mat4::from_rows(cols).transpose()
    }
}

impl From<Mat3> for cgmath::Matrix3<f32> {
    fn from(m: Mat3) -> Self {
        let t = m.transpose();
        cgmath::Matrix3::new(
            t.get(0, 0),
            t.get(0, 1),
            t.get(0, 2),
            t.get(1, 0),
            t.get(1, 1),
            t.get(1, 2),
            t.get(2, 0),
            t.get(2, 1),
            t.get(2, 2),
        )
    }
}

impl From<cgmath::Matrix3<f32>> for Mat3 {
    fn from(m: cgmath::Matrix3<f32>) -> Self {
        let cols: [[f32; 3]; 3] = m.into();
        Mat3::from_rows(cols).transpose()
    }
}

impl From<Vector3> for cgmath::Vector3<f32> {
    fn from(v: Vector3) -> Self {
        cgmath::Vector3::new(v.x, v.y, v.z)
    }
}

impl From<cgmath::Vector3<f32>> for Vector3 {
    fn from(v: cgmath::Vector3<f32>) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}
