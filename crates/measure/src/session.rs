use std::str::FromStr;

use foundation::math::Vec3;
use geodesic::{GeodesicError, GraphCache, SurfacePath};
use scene::picking::{PickOptions, Ray, pick_mesh};
use scene::{MeshId, MeshRegistry, TriangleMesh};
use serde::Serialize;
use tracing::debug;

use crate::MeasureError;
use crate::export::marks_to_csv;
use crate::girth::{GirthSample, cross_section};
use crate::units::{LengthUnits, format_length};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureMode {
    /// Navigation only; marks are rejected.
    #[default]
    None,
    /// Straight line between two marks.
    Distance,
    /// Straight segments through every mark.
    Polyline,
    /// On-surface path between two marks.
    SurfaceDistance,
    /// On-surface path through every mark.
    SurfacePath,
    /// Cross-section perimeter around one center mark.
    Girth,
}

impl MeasureMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MeasureMode::None => "none",
            MeasureMode::Distance => "distance",
            MeasureMode::Polyline => "polyline",
            MeasureMode::SurfaceDistance => "surface-distance",
            MeasureMode::SurfacePath => "surface-path",
            MeasureMode::Girth => "girth",
        }
    }

    /// Pair modes measure exactly two marks; a third starts a new pair.
    fn is_pair(self) -> bool {
        matches!(self, MeasureMode::Distance | MeasureMode::SurfaceDistance)
    }

    fn on_surface(self) -> bool {
        matches!(self, MeasureMode::SurfaceDistance | MeasureMode::SurfacePath)
    }
}

impl FromStr for MeasureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(MeasureMode::None),
            "distance" => Ok(MeasureMode::Distance),
            "polyline" => Ok(MeasureMode::Polyline),
            "surface-distance" => Ok(MeasureMode::SurfaceDistance),
            "surface-path" => Ok(MeasureMode::SurfacePath),
            "girth" => Ok(MeasureMode::Girth),
            other => Err(format!("unknown measure mode: {other}")),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MarkKind {
    Pick,
    /// Center of a girth section.
    Center,
}

impl MarkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkKind::Pick => "pick",
            MarkKind::Center => "center",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mark {
    pub point: Vec3,
    pub kind: MarkKind,
}

/// A completed measurement, in model units.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub mode: MeasureMode,
    /// Polyline to draw: the marks themselves for straight modes, the snapped
    /// surface path otherwise.
    pub points: Vec<Vec3>,
    pub length_units: f64,
}

impl Measurement {
    pub fn report(&self, units: LengthUnits) -> MeasurementReport {
        let length_meters = units.to_meters(self.length_units);
        MeasurementReport {
            mode: self.mode,
            points: self.points.iter().map(|p| p.to_array()).collect(),
            length_units: self.length_units,
            length_meters,
            display: format_length(length_meters),
        }
    }
}

/// Serializable view of a [`Measurement`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementReport {
    pub mode: MeasureMode,
    pub points: Vec<[f64; 3]>,
    pub length_units: f64,
    pub length_meters: f64,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkOutcome {
    /// Recorded; the mode needs more marks.
    Pending,
    Measured(Measurement),
    /// Recorded, but the surface query found no path between the marks.
    NoSurfacePath,
    /// Center recorded, but too few girth rays hit the mesh.
    TooFewSamples { hits: usize },
    /// The pick ray missed the target mesh; nothing was recorded.
    Missed,
}

/// Interactive measurement state for one viewer.
#[derive(Debug, Default)]
pub struct MeasureSession {
    mode: MeasureMode,
    marks: Vec<Mark>,
    target: Option<MeshId>,
    units: LengthUnits,
    last_length_units: Option<f64>,
}

impl MeasureSession {
    pub fn new(units: LengthUnits) -> Self {
        Self {
            units,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> MeasureMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MeasureMode) {
        self.mode = mode;
        self.marks.clear();
    }

    pub fn target_mesh(&self) -> Option<MeshId> {
        self.target
    }

    pub fn set_target_mesh(&mut self, id: Option<MeshId>) {
        self.target = id;
        self.marks.clear();
    }

    pub fn units(&self) -> LengthUnits {
        self.units
    }

    pub fn set_units(&mut self, units: LengthUnits) {
        self.units = units;
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Drops the marks and the last measured length.
    pub fn clear(&mut self) {
        self.marks.clear();
        self.last_length_units = None;
    }

    /// Length of the last successful measurement, in model units.
    pub fn last_length_units(&self) -> Option<f64> {
        self.last_length_units
    }

    /// Last length formatted in metric units.
    pub fn readout(&self) -> Option<String> {
        self.last_length_units
            .map(|l| format_length(self.units.to_meters(l)))
    }

    pub fn export_csv(&self) -> Result<String, MeasureError> {
        marks_to_csv(&self.marks)
    }

    /// Casts `ray` against the target mesh and adds the hit as a mark.
    pub async fn pick_mark(
        &mut self,
        ray: Ray,
        registry: &MeshRegistry,
        cache: &mut GraphCache,
    ) -> Result<MarkOutcome, MeasureError> {
        if self.mode == MeasureMode::None {
            return Err(MeasureError::ModeInactive);
        }
        let mesh = self.target_in(registry)?;
        let Some(hit) = pick_mesh(mesh, ray, PickOptions::default()) else {
            return Ok(MarkOutcome::Missed);
        };
        match self.mode {
            // The pick ray doubles as the view direction.
            MeasureMode::Girth => self.add_girth_center(hit.point, ray.dir, registry),
            _ => self.add_mark(hit.point, registry, cache).await,
        }
    }

    /// Records `point` and measures once the mode has enough marks.
    ///
    /// Surface modes need a live target mesh; its graph is built on first use.
    /// The mark is kept only when the call succeeds.
    pub async fn add_mark(
        &mut self,
        point: Vec3,
        registry: &MeshRegistry,
        cache: &mut GraphCache,
    ) -> Result<MarkOutcome, MeasureError> {
        let mode = self.mode;
        match mode {
            MeasureMode::None => return Err(MeasureError::ModeInactive),
            MeasureMode::Girth => return Err(MeasureError::NeedsViewDirection),
            _ => {}
        }
        let target = match mode.on_surface() {
            true => {
                self.target_in(registry)?;
                self.target
            }
            false => None,
        };

        let kept = match mode.is_pair() && self.marks.len() >= 2 {
            true => 0,
            false => self.marks.len(),
        };
        let mut waypoints: Vec<Vec3> = self.marks[..kept].iter().map(|m| m.point).collect();
        waypoints.push(point);

        let enough = match mode.is_pair() {
            true => waypoints.len() == 2,
            false => waypoints.len() >= 2,
        };
        let outcome = match (enough, target) {
            (false, _) => MarkOutcome::Pending,
            (true, Some(id)) => {
                let path = cache.surface_polyline(registry, id, &waypoints).await?;
                match drawable(path) {
                    Some(path) => MarkOutcome::Measured(Measurement {
                        mode,
                        points: path.points,
                        length_units: path.length,
                    }),
                    None => {
                        debug!(marks = waypoints.len(), "no surface path between marks");
                        MarkOutcome::NoSurfacePath
                    }
                }
            }
            (true, None) => MarkOutcome::Measured(Measurement {
                mode,
                length_units: straight_length(&waypoints),
                points: waypoints,
            }),
        };

        self.marks.truncate(kept);
        self.marks.push(Mark {
            point,
            kind: MarkKind::Pick,
        });
        self.record(&outcome);
        Ok(outcome)
    }

    /// Measures the girth around `center`, sampled in the plane
    /// perpendicular to `view_dir`. Replaces any previous center.
    pub fn add_girth_center(
        &mut self,
        center: Vec3,
        view_dir: Vec3,
        registry: &MeshRegistry,
    ) -> Result<MarkOutcome, MeasureError> {
        if self.mode != MeasureMode::Girth {
            return Err(MeasureError::ModeInactive);
        }
        let mesh = self.target_in(registry)?;
        if !center.is_finite() {
            return Err(GeodesicError::NonFinitePoint.into());
        }
        let sample = cross_section(mesh, center, view_dir).ok_or(MeasureError::NeedsViewDirection)?;

        let outcome = match sample {
            GirthSample::Section(section) => MarkOutcome::Measured(Measurement {
                mode: MeasureMode::Girth,
                points: section.closed_points(),
                length_units: section.perimeter,
            }),
            GirthSample::TooFewHits { hits } => {
                debug!(hits, "girth section has too few samples");
                MarkOutcome::TooFewSamples { hits }
            }
        };

        self.marks.clear();
        self.marks.push(Mark {
            point: center,
            kind: MarkKind::Center,
        });
        self.record(&outcome);
        Ok(outcome)
    }

    fn record(&mut self, outcome: &MarkOutcome) {
        if let MarkOutcome::Measured(m) = outcome {
            debug!(
                mode = m.mode.as_str(),
                length = m.length_units,
                "measurement updated"
            );
            self.last_length_units = Some(m.length_units);
        }
    }

    fn target_in<'a>(&self, registry: &'a MeshRegistry) -> Result<&'a TriangleMesh, MeasureError> {
        self.target
            .and_then(|id| registry.get(id))
            .ok_or(MeasureError::NoTargetMesh)
    }
}

fn drawable(path: SurfacePath) -> Option<SurfacePath> {
    (path.is_reachable() && path.points.len() > 1).then_some(path)
}

fn straight_length(points: &[Vec3]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
