//! Cross-section perimeter ("girth") around a picked center.
//!
//! Rays are cast inward in the plane perpendicular to the view direction and
//! the hits are joined, in angular order, into a closed polygon. This is an
//! estimate from the visible silhouette, not a mesh-plane intersection.

use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;
use scene::TriangleMesh;
use scene::picking::{PickOptions, Ray, pick_mesh};

/// Inward rays cast around the center.
pub const GIRTH_RAYS: usize = 96;
/// Fewer hits than this cannot describe a closed section.
pub const MIN_GIRTH_HITS: usize = 8;
/// Local radius used when none of the radius rays hit.
pub const DEFAULT_LOCAL_RADIUS: f64 = 0.05;
const RADIUS_RAY_OFFSET: f64 = 0.3;
const SAMPLE_RADIUS_FACTOR: f64 = 3.0;

/// Sampled cross-section; `points` are in angular order, not closed.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    pub points: Vec<Vec3>,
    pub perimeter: f64,
}

impl CrossSection {
    /// `points` with the first point repeated at the end, for drawing.
    pub fn closed_points(&self) -> Vec<Vec3> {
        let mut out = self.points.clone();
        if let Some(first) = self.points.first() {
            out.push(*first);
        }
        out
    }
}

/// Outcome of [`cross_section`].
#[derive(Debug, Clone, PartialEq)]
pub enum GirthSample {
    Section(CrossSection),
    TooFewHits { hits: usize },
}

/// Orthonormal `(u, v)` spanning the plane perpendicular to `view_dir`.
///
/// `view_dir` must be unit length.
pub fn section_basis(view_dir: Vec3) -> Option<(Vec3, Vec3)> {
    let helper = match view_dir.y.abs() < 0.9 {
        true => Vec3::new(0.0, 1.0, 0.0),
        false => Vec3::new(1.0, 0.0, 0.0),
    };
    let u = view_dir.cross(helper).normalized()?;
    let v = view_dir.cross(u).normalized()?;
    Some((u, v))
}

/// Mean distance from `center` to the surface along `±u` and `±v`.
pub fn estimate_local_radius(mesh: &TriangleMesh, center: Vec3, u: Vec3, v: Vec3) -> f64 {
    let hits: Vec<f64> = [u, -u, v, -v]
        .into_iter()
        .filter_map(|d| {
            let ray = Ray::new(center + d * RADIUS_RAY_OFFSET, -d);
            pick_mesh(mesh, ray, PickOptions::default())
        })
        .map(|hit| hit.point.distance(center))
        .collect();
    match hits.is_empty() {
        true => DEFAULT_LOCAL_RADIUS,
        false => hits.iter().sum::<f64>() / hits.len() as f64,
    }
}

pub fn cross_section(mesh: &TriangleMesh, center: Vec3, view_dir: Vec3) -> Option<GirthSample> {
    let view_dir = view_dir.normalized()?;
    let (u, v) = section_basis(view_dir)?;
    let radius = estimate_local_radius(mesh, center, u, v) * SAMPLE_RADIUS_FACTOR;

    let mut points: Vec<Vec3> = (0..GIRTH_RAYS)
        .filter_map(|i| {
            let angle = i as f64 / GIRTH_RAYS as f64 * std::f64::consts::TAU;
            let start = center + (u * angle.cos() + v * angle.sin()) * radius;
            pick_mesh(mesh, Ray::new(start, center - start), PickOptions::default())
        })
        .map(|hit| hit.point)
        .collect();

    if points.len() < MIN_GIRTH_HITS {
        return Some(GirthSample::TooFewHits { hits: points.len() });
    }

    let angle_of = |p: Vec3| {
        let d = p - center;
        d.dot(v).atan2(d.dot(u))
    };
    points.sort_by(|a, b| stable_total_cmp_f64(angle_of(*a), angle_of(*b)));
    let perimeter = closed_perimeter(&points);
    Some(GirthSample::Section(CrossSection { points, perimeter }))
}

/// Length of the closed polygon through `points`.
pub fn closed_perimeter(points: &[Vec3]) -> f64 {
    let n = points.len();
    (0..n).map(|i| points[i].distance(points[(i + 1) % n])).sum()
}

/// Open tube along +z: `segments` sides of the given radius, z in [-1, 2].
///
/// Vertices are rotated off the axes so sample rays avoid triangle edges.
#[cfg(test)]
pub(crate) fn tube(segments: u32, radius: f64) -> TriangleMesh {
    let n = segments;
    let ring = |z: f64| {
        (0..n).map(move |k| {
            let a = (k as f64 + 0.37) / n as f64 * std::f64::consts::TAU;
            Vec3::new(radius * a.cos(), radius * a.sin(), z)
        })
    };
    let positions: Vec<Vec3> = ring(-1.0).chain(ring(2.0)).collect();
    let mut indices = Vec::with_capacity(6 * n as usize);
    for k in 0..n {
        let (a, b) = (k, (k + 1) % n);
        let (c, d) = (n + k, n + (k + 1) % n);
        indices.extend_from_slice(&[a, b, d, a, d, c]);
    }
    TriangleMesh::indexed(positions, indices)
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_LOCAL_RADIUS, GIRTH_RAYS, GirthSample, closed_perimeter, cross_section,
        estimate_local_radius, section_basis, tube,
    };
    use foundation::math::Vec3;
    use scene::TriangleMesh;

    const DOWN: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: -1.0,
    };

    fn flat_square() -> TriangleMesh {
        TriangleMesh::indexed(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn basis_is_orthonormal_and_perpendicular_to_view() {
        for view in [DOWN, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.6, 0.0, 0.8)] {
            let (u, v) = section_basis(view).expect("basis");
            assert!((u.length() - 1.0).abs() < 1e-12);
            assert!((v.length() - 1.0).abs() < 1e-12);
            assert!(u.dot(v).abs() < 1e-12);
            assert!(u.dot(view).abs() < 1e-12);
            assert!(v.dot(view).abs() < 1e-12);
        }
    }

    #[test]
    fn local_radius_reads_the_far_wall() {
        let mesh = tube(64, 1.0);
        let (u, v) = section_basis(DOWN).expect("basis");
        let r = estimate_local_radius(&mesh, Vec3::ZERO, u, v);
        assert!((r - 1.0).abs() < 0.01, "radius {r}");
    }

    #[test]
    fn local_radius_falls_back_when_nothing_is_hit() {
        let (u, v) = section_basis(DOWN).expect("basis");
        let r = estimate_local_radius(&flat_square(), Vec3::ZERO, u, v);
        assert_eq!(r, DEFAULT_LOCAL_RADIUS);
    }

    #[test]
    fn tube_section_approaches_the_circumference() {
        let mesh = tube(64, 1.0);
        let Some(GirthSample::Section(section)) = cross_section(&mesh, Vec3::ZERO, DOWN) else {
            panic!("expected a section");
        };
        assert_eq!(section.points.len(), GIRTH_RAYS);
        assert!((section.perimeter - std::f64::consts::TAU).abs() < 0.05);
        for p in &section.points {
            assert!(p.z.abs() < 1e-9);
        }
        let closed = section.closed_points();
        assert_eq!(closed.first(), closed.last());
    }

    #[test]
    fn rays_in_the_surface_plane_are_too_few() {
        let sample = cross_section(&flat_square(), Vec3::ZERO, DOWN);
        assert_eq!(sample, Some(GirthSample::TooFewHits { hits: 0 }));
        assert_eq!(cross_section(&flat_square(), Vec3::ZERO, Vec3::ZERO), None);
    }

    #[test]
    fn perimeter_closes_the_loop() {
        let square = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ];
        assert_eq!(closed_perimeter(&square), 8.0);
        assert_eq!(closed_perimeter(&[]), 0.0);
    }
}
