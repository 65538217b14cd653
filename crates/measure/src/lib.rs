//! Measurement tools layered on the geodesic engine: straight and on-surface
//! distances, cross-section girth, metric formatting, and mark export.

pub mod export;
pub mod girth;
pub mod session;
pub mod units;

pub use export::marks_to_csv;
pub use session::*;
pub use units::*;

use geodesic::GeodesicError;

#[derive(Debug, Clone, PartialEq)]
pub enum MeasureError {
    Geodesic(GeodesicError),
    /// Surface modes and picking need a live target mesh.
    NoTargetMesh,
    ModeInactive,
    NoMarks,
    /// Girth sampling is oriented by the view; a bare point is not enough.
    NeedsViewDirection,
}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureError::Geodesic(e) => write!(f, "surface query failed: {e}"),
            MeasureError::NoTargetMesh => write!(f, "no target mesh selected"),
            MeasureError::ModeInactive => write!(f, "no measure mode active"),
            MeasureError::NoMarks => write!(f, "no marks to export"),
            MeasureError::NeedsViewDirection => {
                write!(f, "girth needs a finite, non-zero view direction")
            }
        }
    }
}

impl std::error::Error for MeasureError {}

impl From<GeodesicError> for MeasureError {
    fn from(e: GeodesicError) -> Self {
        MeasureError::Geodesic(e)
    }
}
