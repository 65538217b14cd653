/// Precondition violations surfaced by the engine.
///
/// Unreachable paths are not errors: they come back as a
/// [`crate::SurfacePath`] with infinite length and no points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeodesicError {
    /// The mesh has no vertices or no triangles.
    EmptyMesh,
    /// A mesh without an index list must hold whole triangles.
    UnindexedVertexCount { vertex_count: usize },
    IndexCountNotTriangles { index_count: usize },
    IndexOutOfRange { index: u32, vertex_count: usize },
    /// A polyline query needs at least two waypoints.
    TooFewWaypoints { count: usize },
    VertexOutOfRange { index: usize, vertex_count: usize },
    NonFinitePoint,
    /// The mesh id is stale or was never registered.
    UnknownMesh,
}

impl std::fmt::Display for GeodesicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeodesicError::EmptyMesh => write!(f, "mesh has no vertices or triangles"),
            GeodesicError::UnindexedVertexCount { vertex_count } => write!(
                f,
                "non-indexed mesh vertex count {vertex_count} is not a multiple of 3"
            ),
            GeodesicError::IndexCountNotTriangles { index_count } => {
                write!(f, "index count {index_count} is not a multiple of 3")
            }
            GeodesicError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "triangle index {index} out of range for {vertex_count} vertices"
            ),
            GeodesicError::TooFewWaypoints { count } => {
                write!(f, "surface polyline needs at least 2 waypoints, got {count}")
            }
            GeodesicError::VertexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "graph vertex {index} out of range for {vertex_count} vertices"
            ),
            GeodesicError::NonFinitePoint => write!(f, "query point is not finite"),
            GeodesicError::UnknownMesh => write!(f, "unknown or stale mesh id"),
        }
    }
}

impl std::error::Error for GeodesicError {}
