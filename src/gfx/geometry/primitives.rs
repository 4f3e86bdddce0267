//! # Primitive Shape Generation
//!
//! Fixed-topology solids centered at the origin, spanning -0.5..0.5 on every
//! axis. Cone and cylinder use a 20 point circle in 18 degree steps, starting
//! on +Z and turning towards +X.

use super::GeometryData;

/// Number of points on the circle approximating cones and cylinders.
pub const CIRCLE_SEGMENTS: u16 = 20;

const CIRCLE_RADIUS: f32 = 0.5;

/// Point `k` of the circle at height `y`.
pub fn circle_point(k: u16, y: f32) -> [f32; 3] {
    let angle = (18.0 * k as f32).to_radians();
    [CIRCLE_RADIUS * angle.sin(), y, CIRCLE_RADIUS * angle.cos()]
}

// Face order and index order are chosen so a line strip over the indices
// traces all twelve edges of the box.
const BOX_INDICES: [u16; 36] = [
    4, 5, 7, 7, 5, 6, // front
    20, 21, 23, 23, 21, 22, // right
    3, 0, 2, 2, 0, 1, // bottom
    13, 14, 12, 12, 14, 15, // back
    17, 18, 16, 16, 18, 19, // left
    8, 9, 11, 11, 9, 10, // top
];

fn generate_box(h: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // bottom
        (
            [0.0, -1.0, 0.0],
            [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
        ),
        // front
        (
            [0.0, 0.0, 1.0],
            [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
        ),
        // top
        (
            [0.0, 1.0, 0.0],
            [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
        ),
        // back
        (
            [0.0, 0.0, -1.0],
            [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
        ),
        // left
        (
            [-1.0, 0.0, 0.0],
            [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
        ),
        // right
        (
            [1.0, 0.0, 0.0],
            [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],
        ),
    ];

    for (normal, corners) in faces.iter() {
        for corner in corners.iter() {
            data.push_vertex(*corner, *normal);
        }
    }
    data.indices = BOX_INDICES.to_vec();
    data
}

/// Unit cube with per-face normals.
pub fn generate_cube() -> GeometryData {
    generate_box(0.5)
}

/// Small outline-only cube used as a parenting anchor.
pub fn generate_empty() -> GeometryData {
    let mut data = generate_box(0.05);
    data.filled = false;
    data
}

/// Square-based pyramid with its apex at (0, 0.5, 0).
pub fn generate_pyramid() -> GeometryData {
    let mut data = GeometryData::new();
    let apex = [0.0, 0.5, 0.0];

    let bottom = [0.0, -1.0, 0.0];
    data.push_vertex([-0.5, -0.5, -0.5], bottom);
    data.push_vertex([0.5, -0.5, -0.5], bottom);
    data.push_vertex([0.5, -0.5, 0.5], bottom);
    data.push_vertex([-0.5, -0.5, 0.5], bottom);

    // (first base corner, second base corner, face normal)
    let sides = [
        ([-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.0, 0.5, 1.0]),
        ([0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [0.0, 0.5, -1.0]),
        ([-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-1.0, 0.5, 0.0]),
        ([0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [1.0, 0.5, 0.0]),
    ];
    for (a, b, normal) in sides {
        data.push_vertex(a, normal);
        data.push_vertex(b, normal);
        data.push_vertex(apex, normal);
    }

    data.indices = vec![
        0, 1, 3, 1, 2, 3, // bottom
        4, 5, 6, // front
        7, 8, 9, // back
        10, 11, 12, // left
        13, 14, 15, // right
    ];
    data
}

/// Regular tetrahedron inscribed in the unit cube.
pub fn generate_tetrahedron() -> GeometryData {
    let mut data = GeometryData::new();
    let n = 0.33;

    let faces: [([f32; 3], [[f32; 3]; 3]); 4] = [
        (
            [-n, -n, n],
            [[-0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, 0.5, 0.5]],
        ),
        (
            [n, n, n],
            [[0.5, -0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, 0.5]],
        ),
        (
            [n, -n, -n],
            [[-0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, -0.5, 0.5]],
        ),
        (
            [-n, n, -n],
            [[-0.5, -0.5, -0.5], [-0.5, 0.5, 0.5], [0.5, 0.5, -0.5]],
        ),
    ];

    for (normal, corners) in faces.iter() {
        let a = data.push_vertex(corners[0], *normal);
        let b = data.push_vertex(corners[1], *normal);
        let c = data.push_vertex(corners[2], *normal);
        data.push_triangle(a, b, c);
    }
    data
}

/// Pushes a center vertex and a ring of `CIRCLE_SEGMENTS` points at height
/// `y`, all with `normal`. Returns the index of the center.
fn push_disc(data: &mut GeometryData, y: f32, normal: [f32; 3]) -> u16 {
    let center = data.push_vertex([0.0, y, 0.0], normal);
    for k in 0..CIRCLE_SEGMENTS {
        data.push_vertex(circle_point(k, y), normal);
    }
    center
}

/// Pushes a ring whose normals point radially outward, lifted by `normal_y`.
fn push_side_ring(data: &mut GeometryData, y: f32, normal_y: f32) -> u16 {
    let first = data.next_index();
    for k in 0..CIRCLE_SEGMENTS {
        let p = circle_point(k, y);
        data.push_vertex(p, [p[0], normal_y, p[2]]);
    }
    first
}

/// Cone with its base at y = -0.5 and apex at y = 0.5.
///
/// Side normals are the radial direction tilted up by 0.25 rather than true
/// per-face normals. The apex normal points straight up.
pub fn generate_cone() -> GeometryData {
    let n = CIRCLE_SEGMENTS;
    let mut data = GeometryData::new();

    let center = push_disc(&mut data, -0.5, [0.0, -1.0, 0.0]);
    let side = push_side_ring(&mut data, -0.5, 0.25);
    let apex = data.push_vertex([0.0, 0.5, 0.0], [0.0, 1.0, 0.0]);

    for i in 1..=n {
        data.push_triangle(center, i % n + 1, i);
    }
    for i in 0..n {
        data.push_triangle(side + i, side + (i + 1) % n, apex);
    }
    data
}

/// Cylinder spanning y = -0.5..0.5 with capped ends.
pub fn generate_cylinder() -> GeometryData {
    let n = CIRCLE_SEGMENTS;
    let mut data = GeometryData::new();

    let bottom = push_disc(&mut data, -0.5, [0.0, -1.0, 0.0]);
    let bottom_side = push_side_ring(&mut data, -0.5, 0.0);
    let top = push_disc(&mut data, 0.5, [0.0, 1.0, 0.0]);
    let top_side = push_side_ring(&mut data, 0.5, 0.0);

    for i in 1..=n {
        data.push_triangle(bottom, i % n + 1, i);
    }
    for i in 0..n {
        data.push_triangle(bottom_side + i, bottom_side + (i + 1) % n, top_side + i);
    }
    for i in 0..n {
        data.push_triangle(top, top + 1 + i, top + 1 + (i + 1) % n);
    }
    for i in 0..n {
        data.push_triangle(
            bottom_side + (i + 1) % n,
            top_side + (i + 1) % n,
            top_side + i,
        );
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    fn face_normal(data: &GeometryData, tri: usize) -> Vector3 {
        let idx = &data.indices[tri * 3..tri * 3 + 3];
        let p = |i: u16| Vector3::from(data.vertices[i as usize]);
        Vector3::cross(p(idx[1]) - p(idx[0]), p(idx[2]) - p(idx[0]))
    }

    /// Every triangle must wind counter-clockwise when seen from outside,
    /// i.e. its geometric normal agrees with the stored vertex normal.
    fn assert_outward_winding(data: &GeometryData) {
        for tri in 0..data.triangle_count() {
            let geometric = face_normal(data, tri);
            let stored = Vector3::from(data.normals[data.indices[tri * 3] as usize]);
            assert!(
                Vector3::dot(geometric, stored) > 0.0,
                "triangle {tri} winds inward"
            );
        }
    }

    #[test]
    fn cube_layout() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(cube.vertices[6], [0.5, 0.5, 0.5]);
        assert_eq!(cube.normals[6], [0.0, 0.0, 1.0]);
        assert_eq!(&cube.indices[..6], &[4, 5, 7, 7, 5, 6]);
        assert!(cube.filled);
        assert_outward_winding(&cube);
    }

    #[test]
    fn empty_is_a_small_outline_cube() {
        let empty = generate_empty();
        assert!(!empty.filled);
        assert_eq!(empty.indices, generate_cube().indices);
        assert!(empty
            .vertices
            .iter()
            .all(|v| v.iter().all(|c| c.abs() == 0.05)));
    }

    #[test]
    fn pyramid_and_tetrahedron_counts() {
        let pyramid = generate_pyramid();
        assert_eq!(pyramid.vertex_count(), 16);
        assert_eq!(pyramid.triangle_count(), 6);
        assert_outward_winding(&pyramid);

        let tetra = generate_tetrahedron();
        assert_eq!(tetra.vertex_count(), 12);
        assert_eq!(tetra.indices, (0..12).collect::<Vec<u16>>());
        assert_outward_winding(&tetra);
    }

    #[test]
    fn circle_points_step_by_eighteen_degrees() {
        let p = circle_point(1, -0.5);
        assert!((p[0] - 0.1545).abs() < 1e-4);
        assert!((p[2] - 0.4755).abs() < 1e-4);
        let q = circle_point(5, 0.0);
        assert!((q[0] - 0.5).abs() < 1e-6);
        assert!(q[2].abs() < 1e-6);
    }

    #[test]
    fn cone_layout() {
        let cone = generate_cone();
        assert_eq!(cone.vertex_count(), 42);
        assert_eq!(cone.triangle_count(), 40);
        assert_eq!(&cone.indices[..3], &[0, 2, 1]);
        assert_eq!(&cone.indices[57..60], &[0, 1, 20]);
        assert_eq!(&cone.indices[60..63], &[21, 22, 41]);
        assert_eq!(&cone.indices[117..120], &[40, 21, 41]);
        assert_eq!(cone.normals[41], [0.0, 1.0, 0.0]);
        assert_eq!(cone.normals[21][1], 0.25);
        assert_outward_winding(&cone);
    }

    #[test]
    fn cylinder_layout() {
        let cyl = generate_cylinder();
        assert_eq!(cyl.vertex_count(), 82);
        assert_eq!(cyl.triangle_count(), 80);
        assert_eq!(&cyl.indices[60..63], &[21, 22, 62]);
        assert_eq!(&cyl.indices[117..120], &[40, 21, 81]);
        assert_eq!(&cyl.indices[120..123], &[41, 42, 43]);
        assert_eq!(&cyl.indices[177..180], &[41, 61, 42]);
        assert_eq!(&cyl.indices[180..183], &[22, 63, 62]);
        assert_eq!(&cyl.indices[237..240], &[21, 62, 81]);
        assert_eq!(cyl.vertices[41], [0.0, 0.5, 0.0]);
        assert_eq!(cyl.normals[62][1], 0.0);
        assert_outward_winding(&cyl);
    }

    #[test]
    fn baked_indices_close_the_loop() {
        let tetra = generate_tetrahedron();
        let baked = tetra.baked_indices();
        assert_eq!(baked.len(), tetra.indices.len() + 1);
        assert_eq!(baked.last(), tetra.indices.first());
    }

    #[test]
    fn counts_fit_their_index_types() {
        use crate::gfx::scene::NodeKind;

        for kind in NodeKind::SPAWNABLE {
            let data = crate::gfx::geometry::geometry_for(kind).expect("geometry");
            assert_eq!(data.next_index() as usize, data.vertex_count());
            assert_eq!(data.index_count() as usize, data.indices.len());
            assert!(data.indices.iter().all(|i| (*i as usize) < data.vertex_count()));
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "u16 index range")]
    fn vertex_overflow_is_caught() {
        let mut data = GeometryData::new();
        for _ in 0..=u16::MAX as usize + 1 {
            data.push_vertex([0.0; 3], [0.0, 1.0, 0.0]);
        }
    }
}
