// src/math/mod.rs
//! Math kernel: [`Vector3`], and row-major [`Mat3`] / [`Mat4`].
//!
//! All matrices are row-major and multiply column vectors on the right.

pub mod convert;
pub mod mat3;
pub mod mat4;
pub mod vector3;

pub use mat3::Mat3;
pub use mat4::Mat4;
pub use vector3::Vector3;
