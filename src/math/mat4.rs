// src/math/mat4.rs
//! Row-major 4x4 matrix.
//!
//! Storage is a flat array addressed with `get(row, col)`. Points are column
//! vectors multiplied on the right, so `pre_multiply(a, b)` yields `a * b` and
//! applies `b` first. Combined transforms are always `T * R * S`.

use std::fmt;

use super::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub const fn zero() -> Self {
        Self { data: [0.0; 16] }
    }

    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
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
        self.data[row * 4 + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * 4 + col] = value;
    }

    pub fn as_slice(&self) -> &[f32; 16] {
        &self.data
    }

    pub fn rows(&self) -> [[f32; 4]; 4] {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.get(r, c);
            }
        }
        out
    }

    /// Column-major layout expected by shader uniforms.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.transpose().rows()
    }

    pub fn transpose(&self) -> Mat4 {
        let mut out = Mat4::zero();
        for r in 0..4 {
            for c in 0..4 {
                out.set(c, r, self.get(r, c));
            }
        }
        out
    }

    /// Element-wise sum.
    pub fn sum(a: &Mat4, b: &Mat4) -> Mat4 {
        let mut out = *a;
        for (o, v) in out.data.iter_mut().zip(b.data.iter()) {
            *o += v;
        }
        out
    }

    /// Matrix product `a * b`.
    pub fn pre_multiply(a: &Mat4, b: &Mat4) -> Mat4 {
        let mut out = Mat4::zero();
        for r in 0..4 {
            for c in 0..4 {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += a.get(r, k) * b.get(k, c);
                }
                out.set(r, c, acc);
            }
        }
        out
    }

    pub fn from_translation(t: Vector3) -> Mat4 {
        let mut m = Mat4::identity();
        m.set_translation(t);
        m
    }

    /// Rotation from Euler angles in degrees, applied about X, then Y, then Z
    /// (extrinsic), written out as the combined closed form `Rz * Ry * Rx`.
    pub fn from_rotation(rotation: Vector3) -> Mat4 {
        let mut m = Mat4::identity();
        m.set_rotation(rotation);
        m
    }

    pub fn from_scale(s: Vector3) -> Mat4 {
        let mut m = Mat4::identity();
        m.set_scale(s);
        m
    }

    /// `T * R * S`: scale first, then rotate, then translate.
    pub fn from_transform(position: Vector3, rotation: Vector3, scale: Vector3) -> Mat4 {
        let rs = Mat4::pre_multiply(&Mat4::from_rotation(rotation), &Mat4::from_scale(scale));
        Mat4::pre_multiply(&Mat4::from_translation(position), &rs)
    }

    /// Overwrites the translation column only.
    pub fn set_translation(&mut self, t: Vector3) -> &mut Self {
        self.set(0, 3, t.x);
        self.set(1, 3, t.y);
        self.set(2, 3, t.z);
        self
    }

    /// Overwrites the upper-left 3x3 block with the rotation for `rotation`
    /// (degrees). Translation and the bottom row are left untouched.
    pub fn set_rotation(&mut self, rotation: Vector3) -> &mut Self {
        let (sx, cx) = rotation.x.to_radians().sin_cos();
        let (sy, cy) = rotation.y.to_radians().sin_cos();
        let (sz, cz) = rotation.z.to_radians().sin_cos();

        self.set(0, 0, cy * cz);
        self.set(0, 1, sx * sy * cz - sz * cx);
        self.set(0, 2, cx * sy * cz + sx * sz);

        self.set(1, 0, sz * cy);
        self.set(1, 1, sx * sy * sz + cz * cx);
        self.set(1, 2, cx * sy * sz - sx * cz);

        self.set(2, 0, -sy);
        self.set(2, 1, sx * cy);
        self.set(2, 2, cy * cx);
        self
    }

    /// Overwrites the diagonal scale entries only.
    pub fn set_scale(&mut self, s: Vector3) -> &mut Self {
        self.set(0, 0, s.x);
        self.set(1, 1, s.y);
        self.set(2, 2, s.z);
        self
    }

    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.get(0, 3), self.get(1, 3), self.get(2, 3))
    }

    /// Applies the matrix to a point (w = 1), dropping the resulting w.
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let row = |r: usize| {
            self.get(r, 0) * p.x + self.get(r, 1) * p.y + self.get(r, 2) * p.z + self.get(r, 3)
        };
        Vector3::new(row(0), row(1), row(2))
    }

    pub fn approx_eq(&self, other: &Mat4, epsilon: f32) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4::pre_multiply(&self, &rhs)
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            writeln!(
                f,
                "[{:>9.4} {:>9.4} {:>9.4} {:>9.4}]",
                self.get(r, 0),
                self.get(r, 1),
                self.get(r, 2),
                self.get(r, 3)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Matrix4};
    use rand::Rng;

    const EPS: f32 = 1e-5;

    fn random_rotation(rng: &mut impl Rng) -> Vector3 {
        Vector3::new(
            rng.random_range(-360.0..360.0),
            rng.random_range(-360.0..360.0),
            rng.random_range(-360.0..360.0),
        )
    }

    fn random_matrix(rng: &mut impl Rng) -> Mat4 {
        let mut m = Mat4::zero();
        for r in 0..4 {
            for c in 0..4 {
                m.set(r, c, rng.random_range(-10.0..10.0));
            }
        }
        m
    }

    #[test]
    fn zero_rotation_is_identity() {
        assert_eq!(Mat4::from_rotation(Vector3::zero()), Mat4::identity());
    }

    #[test]
    fn rotations_are_orthogonal() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let m = Mat4::from_rotation(random_rotation(&mut rng));
            let product = Mat4::pre_multiply(&m.transpose(), &m);
            assert!(product.approx_eq(&Mat4::identity(), EPS), "{product}");
        }
    }

    #[test]
    fn transpose_round_trips() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let m = random_matrix(&mut rng);
            assert_eq!(m.transpose().transpose(), m);
        }
    }

    #[test]
    fn closed_form_rotation_matches_extrinsic_xyz() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let r = random_rotation(&mut rng);
            let expected: Matrix4<f32> = Matrix4::from_angle_z(Deg(r.z))
                * Matrix4::from_angle_y(Deg(r.y))
                * Matrix4::from_angle_x(Deg(r.x));
            let ours = Mat4::from_rotation(r);
            assert!(ours.approx_eq(&Mat4::from(expected), EPS), "rotation {r}");
        }
    }

    #[test]
    fn pre_multiply_matches_cgmath_product() {
        let mut rng = rand::rng();
        let a = random_matrix(&mut rng);
        let b = random_matrix(&mut rng);
        let expected = Matrix4::from(a) * Matrix4::from(b);
        assert!(Mat4::pre_multiply(&a, &b).approx_eq(&Mat4::from(expected), 1e-3));
        assert_eq!(a * b, Mat4::pre_multiply(&a, &b));
    }

    #[test]
    fn translation_only_transform() {
        let m = Mat4::from_transform(Vector3::new(2.0, 0.0, 0.0), Vector3::zero(), Vector3::one());
        assert_eq!(m.translation(), Vector3::new(2.0, 0.0, 0.0));
        for r in 0..3 {
            for c in 0..3 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert_eq!(m.get(r, c), expected);
            }
        }
    }

    #[test]
    fn transform_scales_then_rotates_then_translates() {
        let m = Mat4::from_transform(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 0.0, 90.0),
            Vector3::new(2.0, 1.0, 1.0),
        );
        // (1,0,0) -> scale (2,0,0) -> rotate (0,2,0) -> translate (1,4,3)
        let p = m.transform_point(Vector3::right());
        assert!((p.x - 1.0).abs() < EPS);
        assert!((p.y - 4.0).abs() < EPS);
        assert!((p.z - 3.0).abs() < EPS);
    }

    #[test]
    fn sub_block_setters_leave_other_entries_alone() {
        let mut m = Mat4::from_translation(Vector3::new(5.0, 6.0, 7.0));
        m.set_rotation(Vector3::new(30.0, 45.0, 60.0));
        assert_eq!(m.translation(), Vector3::new(5.0, 6.0, 7.0));
        assert_eq!(m.rows()[3], [0.0, 0.0, 0.0, 1.0]);

        let rotated = m;
        m.set_translation(Vector3::new(-1.0, -2.0, -3.0));
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(m.get(r, c), rotated.get(r, c));
            }
        }

        let mut s = Mat4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        s.set_scale(Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(s.get(0, 0), -1.0);
        assert_eq!(s.get(1, 1), -2.0);
        assert_eq!(s.get(2, 2), -3.0);
        assert_eq!(s.get(0, 1), 2.0);
        assert_eq!(s.get(3, 3), 16.0);
    }

    #[test]
    fn sum_is_element_wise() {
        let a = Mat4::identity();
        let b = Mat4::from_translation(Vector3::new(1.0, 1.0, 1.0));
        let s = Mat4::sum(&a, &b);
        assert_eq!(s.get(0, 0), 2.0);
        assert_eq!(s.get(0, 3), 1.0);
        assert_eq!(s.get(3, 3), 2.0);
    }

    #[test]
    fn column_major_export_transposes_storage() {
        let m = Mat4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let cols = m.to_cols_array_2d();
        assert_eq!(cols[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
