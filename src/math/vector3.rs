// src/math/vector3.rs
//! Three-component `f32` vector.
//!
//! Two families of operations are provided. The mutating ones (`add`,
//! `subtract`, `scale`, `normalize`, `negate`, `rotate_by_matrix`) change the
//! receiver in place and return it for chaining. The associated functions
//! (`sum`, `difference`, `scaled`, `normalized`, `negated`, `dot`, `cross`)
//! leave their inputs alone and return a fresh value.

use std::fmt;

use super::Mat4;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub const fn one() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub const fn up() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    pub const fn down() -> Self {
        Self::new(0.0, -1.0, 0.0)
    }

    pub const fn left() -> Self {
        Self::new(-1.0, 0.0, 0.0)
    }

    pub const fn right() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Camera-space forward, looking down negative Z.
    pub const fn forward() -> Self {
        Self::new(0.0, 0.0, -1.0)
    }

    pub const fn backward() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn length(&self) -> f32 {
        Self::dot(*self, *self).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    pub fn set(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    pub fn add(&mut self, other: Vector3) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
        self
    }

    pub fn subtract(&mut self, other: Vector3) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
        self
    }

    pub fn scale(&mut self, factor: f32) -> &mut Self {
        self.x *= factor;
        self.y *= factor;
        self.z *= factor;
        self
    }

    /// Rescales to unit length in place.
    ///
    /// A zero-length vector stays zero and a warning is logged.
    pub fn normalize(&mut self) -> &mut Self {
        let length = self.length();
        if length == 0.0 {
            log::warn!("normalizing a zero-length vector, leaving it at zero");
            self.set(0.0, 0.0, 0.0);
            return self;
        }
        self.scale(1.0 / length)
    }

    pub fn negate(&mut self) -> &mut Self {
        self.scale(-1.0)
    }

    /// Multiplies the vector by the transpose of the upper-left 3x3 block of `m`.
    ///
    /// For a pure rotation block this applies the inverse rotation, which is
    /// how camera-local motion is carried into world space by the view rotation.
    pub fn rotate_by_matrix(&mut self, m: &Mat4) -> &mut Self {
        let (x, y, z) = (self.x, self.y, self.z);
        self.x = x * m.get(0, 0) + y * m.get(1, 0) + z * m.get(2, 0);
        self.y = x * m.get(0, 1) + y * m.get(1, 1) + z * m.get(2, 1);
        self.z = x * m.get(0, 2) + y * m.get(1, 2) + z * m.get(2, 2);
        self
    }

    pub fn sum(a: Vector3, b: Vector3) -> Vector3 {
        let mut out = a;
        out.add(b);
        out
    }

    pub fn difference(a: Vector3, b: Vector3) -> Vector3 {
        let mut out = a;
        out.subtract(b);
        out
    }

    pub fn scaled(v: Vector3, factor: f32) -> Vector3 {
        let mut out = v;
        out.scale(factor);
        out
    }

    pub fn normalized(v: Vector3) -> Vector3 {
        let mut out = v;
        out.normalize();
        out
    }

    pub fn negated(v: Vector3) -> Vector3 {
        let mut out = v;
        out.negate();
        out
    }

    pub fn dot(a: Vector3, b: Vector3) -> f32 {
        a.x * b.x + a.y * b.y + a.z * b.z
    }

    pub fn cross(a: Vector3, b: Vector3) -> Vector3 {
        Vector3::new(
            a.y * b.z - a.z * b.y,
            a.z * b.x - a.x * b.z,
            a.x * b.y - a.y * b.x,
        )
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl std::ops::Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::sum(self, rhs)
    }
}

impl std::ops::Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::difference(self, rhs)
    }
}

impl std::ops::Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f32) -> Vector3 {
        Vector3::scaled(self, rhs)
    }
}

impl std::ops::Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::negated(self)
    }
}

impl std::ops::AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        Vector3::add(self, rhs);
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn normalizing_zero_yields_zero() {
        let v = Vector3::normalized(Vector3::zero());
        assert_eq!(v, Vector3::zero());

        let mut w = Vector3::zero();
        w.normalize();
        assert!(w.is_zero());
    }

    #[test]
    fn normalize_produces_unit_length() {
        let v = Vector3::normalized(Vector3::new(3.0, 0.0, 4.0));
        assert!((v.length() - 1.0).abs() < EPS);
        assert!((v.x - 0.6).abs() < EPS);
        assert!((v.z - 0.8).abs() < EPS);
    }

    #[test]
    fn mutating_and_static_forms_agree() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-4.0, 0.5, 2.0);

        let mut m = a;
        m.add(b).scale(2.0).negate();
        let s = Vector3::negated(Vector3::scaled(Vector3::sum(a, b), 2.0));
        assert_eq!(m, s);
        assert_eq!(a, Vector3::new(1.0, 2.0, 3.0), "static forms must not alias");
    }

    #[test]
    fn operators_match_named_forms() {
        let a = Vector3::new(1.0, -2.0, 0.25);
        let b = Vector3::new(0.5, 4.0, -1.0);
        assert_eq!(a + b, Vector3::sum(a, b));
        assert_eq!(a - b, Vector3::difference(a, b));
        assert_eq!(a * 3.0, Vector3::scaled(a, 3.0));
        assert_eq!(-a, Vector3::negated(a));

        let mut c = a;
        c += b;
        assert_eq!(c, a + b);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let z = Vector3::cross(Vector3::right(), Vector3::up());
        assert_eq!(z, Vector3::backward());
        assert_eq!(Vector3::dot(z, Vector3::right()), 0.0);
    }

    #[test]
    fn rotate_by_matrix_applies_transpose() {
        // 90 degrees about Z maps +X to +Y; its transpose maps +X to -Y.
        let r = Mat4::from_rotation(Vector3::new(0.0, 0.0, 90.0));
        let mut v = Vector3::right();
        v.rotate_by_matrix(&r);
        assert!(v.x.abs() < EPS);
        assert!((v.y + 1.0).abs() < EPS);
        assert!(v.z.abs() < EPS);
    }

    #[test]
    fn rotate_by_matrix_ignores_translation() {
        let m = Mat4::from_translation(Vector3::new(10.0, 20.0, 30.0));
        let mut v = Vector3::new(1.0, 2.0, 3.0);
        v.rotate_by_matrix(&m);
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(Vector3::new(1.0, 0.5, -2.0).to_string(), "(1.000, 0.500, -2.000)");
    }
}
