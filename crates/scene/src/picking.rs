use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::mesh::TriangleMesh;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Distance along the normalized ray.
    pub distance: f64,
    pub triangle: usize,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
    /// Hit triangles from behind as well as from the front.
    pub double_sided: bool,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
            double_sided: true,
        }
    }
}

/// Closest ray hit against a mesh's triangles, in world space.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - Equal distances resolve to the lower triangle index.
///
/// Triangles referencing out-of-range vertices are skipped.
pub fn pick_mesh(mesh: &TriangleMesh, ray: Ray, opts: PickOptions) -> Option<MeshHit> {
    let dir = ray.dir.normalized()?;
    let mut best: Option<(f64, usize)> = None;

    for (t_idx, [a, b, c]) in mesh.triangles().enumerate() {
        let (Some(p0), Some(p1), Some(p2)) = (
            mesh.world_position(a as usize),
            mesh.world_position(b as usize),
            mesh.world_position(c as usize),
        ) else {
            continue;
        };

        let Some(t) = ray_triangle_t(ray.origin, dir, [p0, p1, p2], opts.double_sided) else {
            continue;
        };
        if t > opts.max_distance {
            continue;
        }

        best = match best {
            None => Some((t, t_idx)),
            Some((bt, bi)) => {
                if stable_total_cmp_f64(t, bt)
                    .then_with(|| t_idx.cmp(&bi))
                    .is_lt()
                {
                    Some((t, t_idx))
                } else {
                    Some((bt, bi))
                }
            }
        };
    }

    let (t, triangle) = best?;
    Some(MeshHit {
        point: ray.origin + dir * t,
        distance: t,
        triangle,
    })
}

// Möller–Trumbore; returns the ray parameter of the hit.
fn ray_triangle_t(origin: Vec3, dir: Vec3, tri: [Vec3; 3], double_sided: bool) -> Option<f64> {
    const EPS: f64 = 1e-12;

    let e1 = tri[1] - tri[0];
    let e2 = tri[2] - tri[0];
    let p = dir.cross(e2);
    let det = e1.dot(p);

    if double_sided {
        if det.abs() < EPS {
            return None;
        }
    } else if det < EPS {
        return None;
    }

    let inv = 1.0 / det;
    let s = origin - tri[0];
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = dir.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q) * inv;
    if t < 0.0 {
        return None;
    }
    Some(t)
}
