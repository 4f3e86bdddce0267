// src/math/mat3.rs
//! Row-major 3x3 matrix, used to build normal matrices.

use std::fmt;

use super::{Mat4, Vector3};
use crate::error::MathError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    data: [f32; 9],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat3 {
    pub const fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            ],
        }
    }

    pub const fn zero() -> Self {
        Self { data: [0.0; 9] }
    }

    pub fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        let mut m = Self::zero();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                m.set(r, c, *value);
            }
        }
        m
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * 3 + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * 3 + col] = value;
    }

    /// Copies the upper-left 3x3 block of `m` *transposed*: entry `(r, c)`
    /// receives `m.get(c, r)`.
    ///
    /// `Mat3::inverse(Mat3::from_mat4(&model_view))` is therefore the
    /// inverse-transpose of the model-view block, i.e. the normal matrix.
    pub fn from_mat4(m: &Mat4) -> Mat3 {
        let mut out = Mat3::zero();
        for r in 0..3 {
            for c in 0..3 {
                out.set(r, c, m.get(c, r));
            }
        }
        out
    }

    pub fn transpose(&self) -> Mat3 {
        let mut out = Mat3::zero();
        for r in 0..3 {
            for c in 0..3 {
                out.set(c, r, self.get(r, c));
            }
        }
        out
    }

    pub fn pre_multiply(a: &Mat3, b: &Mat3) -> Mat3 {
        let mut out = Mat3::zero();
        for r in 0..3 {
            for c in 0..3 {
                let mut acc = 0.0;
                for k in 0..3 {
                    acc += a.get(r, k) * b.get(k, c);
                }
                out.set(r, c, acc);
            }
        }
        out
    }

    pub fn determinant(&self) -> f32 {
        let [a, b, c, d, e, f, g, h, i] = self.data;
        a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
    }

    /// Inverse by the closed-form adjugate.
    ///
    /// Fails only when the determinant is exactly zero; nearly singular
    /// matrices still invert, with whatever precision that leaves.
    pub fn inverse(m: &Mat3) -> Result<Mat3, MathError> {
        let determinant = m.determinant();
        if determinant == 0.0 {
            return Err(MathError::NotInvertible { determinant });
        }

        let [a, b, c, d, e, f, g, h, i] = m.data;
        let inv = 1.0 / determinant;
        Ok(Mat3 {
            data: [
                (e * i - f * h) * inv,
                (c * h - b * i) * inv,
                (b * f - c * e) * inv,
                (f * g - d * i) * inv,
                (a * i - c * g) * inv,
                (c * d - a * f) * inv,
                (d * h - e * g) * inv,
                (b * g - a * h) * inv,
                (a * e - b * d) * inv,
            ],
        })
    }

    pub fn transform(&self, v: Vector3) -> Vector3 {
        let row = |r: usize| self.get(r, 0) * v.x + self.get(r, 1) * v.y + self.get(r, 2) * v.z;
        Vector3::new(row(0), row(1), row(2))
    }

    /// Column-major with each column padded to 16 bytes, the layout of a
    /// WGSL `mat3x3<f32>` inside a uniform block.
    pub fn to_padded_cols(&self) -> [[f32; 4]; 3] {
        let mut out = [[0.0; 4]; 3];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, value) in col.iter_mut().take(3).enumerate() {
                *value = self.get(r, c);
            }
        }
        out
    }

    pub fn approx_eq(&self, other: &Mat3, epsilon: f32) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl fmt::Display for Mat3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..3 {
            writeln!(
                f,
                "[{:>9.4} {:>9.4} {:>9.4}]",
                self.get(r, 0),
                self.get(r, 1),
                self.get(r, 2)
            )?;
        }
        Ok(())
    }
}
