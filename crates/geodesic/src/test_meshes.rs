//! Small meshes shared by the unit tests.

use foundation::math::Vec3;
use scene::TriangleMesh;

/// Axis-aligned unit cube; vertex `i` sits at `(i & 1, (i >> 1) & 1, (i >> 2) & 1)`.
pub fn unit_cube() -> TriangleMesh {
    let positions = (0..8)
        .map(|i| Vec3::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64))
        .collect();
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 3, 0, 3, 1, // z = 0
        4, 5, 7, 4, 7, 6, // z = 1
        0, 1, 5, 0, 5, 4, // y = 0
        2, 6, 7, 2, 7, 3, // y = 1
        0, 4, 6, 0, 6, 2, // x = 0
        1, 3, 7, 1, 7, 5, // x = 1
    ];
    TriangleMesh::indexed(positions, indices)
}

/// Unit quad as a triangle soup: the diagonal is duplicated, not shared.
pub fn split_quad() -> TriangleMesh {
    TriangleMesh::soup(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ])
}

/// Two triangles ten units apart with no shared vertices.
pub fn two_islands() -> TriangleMesh {
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(11.0, 0.0, 0.0),
        Vec3::new(10.0, 1.0, 0.0),
    ];
    TriangleMesh::indexed(positions, vec![0, 1, 2, 3, 4, 5])
}

/// `(n + 1)^2` vertices on [0, 1]^2 with a gentle bump in z.
pub fn flat_grid(n: usize) -> TriangleMesh {
    let step = 1.0 / n as f64;
    let mut positions = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            let (x, y) = (i as f64 * step, j as f64 * step);
            let z = 0.1 * (x * std::f64::consts::PI).sin() * (y * std::f64::consts::PI).sin();
            positions.push(Vec3::new(x, y, z));
        }
    }
    let at = |i: usize, j: usize| (j * (n + 1) + i) as u32;
    let mut indices = Vec::with_capacity(n * n * 6);
    for j in 0..n {
        for i in 0..n {
            indices.extend([at(i, j), at(i + 1, j), at(i + 1, j + 1)]);
            indices.extend([at(i, j), at(i + 1, j + 1), at(i, j + 1)]);
        }
    }
    TriangleMesh::indexed(positions, indices)
}
