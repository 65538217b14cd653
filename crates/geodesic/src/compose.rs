//! Point-to-point and multi-waypoint queries over a built [`Graph`].

use foundation::math::Vec3;

use crate::error::GeodesicError;
use crate::graph::Graph;
use crate::locate::nearest_vertex;
use crate::solver::shortest_path;

/// A polyline on the mesh surface in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePath {
    pub points: Vec<Vec3>,
    /// `f64::INFINITY` when any leg is unreachable.
    pub length: f64,
}

impl SurfacePath {
    pub fn unreachable() -> Self {
        Self {
            points: Vec::new(),
            length: f64::INFINITY,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.length.is_finite()
    }
}

/// Snaps `a` and `b` to their nearest graph vertices and joins them.
///
/// Endpoints of the returned polyline are graph vertices, not the raw query
/// points.
pub fn surface_path(graph: &Graph, a: Vec3, b: Vec3) -> Result<SurfacePath, GeodesicError> {
    if !a.is_finite() || !b.is_finite() {
        return Err(GeodesicError::NonFinitePoint);
    }
    let start = nearest_vertex(graph, a).ok_or(GeodesicError::EmptyMesh)?;
    let goal = nearest_vertex(graph, b).ok_or(GeodesicError::EmptyMesh)?;

    let sp = shortest_path(graph, start, goal)?;
    if !sp.is_reachable() {
        return Ok(SurfacePath::unreachable());
    }
    let points = sp
        .path
        .iter()
        .filter_map(|&i| graph.vertex(i))
        .collect();
    Ok(SurfacePath {
        points,
        length: sp.length,
    })
}

/// Joins consecutive waypoints with [`surface_path`] and stitches the legs.
///
/// The length is the sum of leg lengths, so one unreachable leg makes the
/// whole polyline infinite; the reachable legs' points are still returned.
pub fn surface_polyline(graph: &Graph, waypoints: &[Vec3]) -> Result<SurfacePath, GeodesicError> {
    if waypoints.len() < 2 {
        return Err(GeodesicError::TooFewWaypoints {
            count: waypoints.len(),
        });
    }
    let mut out = SurfacePath {
        points: Vec::new(),
        length: 0.0,
    };
    for pair in waypoints.windows(2) {
        let leg = surface_path(graph, pair[0], pair[1])?;
        stitch(&mut out.points, leg.points);
        out.length += leg.length;
    }
    Ok(out)
}

/// Appends `leg`, dropping its first point when it repeats the current tail.
fn stitch(acc: &mut Vec<Vec3>, leg: Vec<Vec3>) {
    let mut leg = leg.into_iter().peekable();
    if let (Some(last), Some(first)) = (acc.last(), leg.peek()) {
        if last == first {
            leg.next();
        }
    }
    acc.extend(leg);
}
