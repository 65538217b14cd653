use scene::TriangleMesh;

/// Default weld distance, in mesh local units.
pub const DEFAULT_WELD_TOLERANCE: f64 = 1e-4;

/// How near-coincident vertices are merged before the graph is built.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WeldTolerance {
    /// Use the vertex buffer as-is.
    Disabled,
    /// Fixed distance in local units.
    Absolute(f64),
    /// Fraction of the local bounding-box diagonal.
    Relative(f64),
}

impl Default for WeldTolerance {
    fn default() -> Self {
        WeldTolerance::Absolute(DEFAULT_WELD_TOLERANCE)
    }
}

impl WeldTolerance {
    /// Concrete local-space distance for `mesh`, or `None` when welding is off.
    pub fn resolve(&self, mesh: &TriangleMesh) -> Option<f64> {
        match *self {
            WeldTolerance::Disabled => None,
            WeldTolerance::Absolute(tol) => Some(tol),
            WeldTolerance::Relative(fraction) => {
                let diagonal = mesh.local_bounds().map(|b| b.diagonal()).unwrap_or(0.0);
                Some(fraction * diagonal)
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct GeodesicConfig {
    pub weld: WeldTolerance,
}

impl GeodesicConfig {
    pub fn new(weld: WeldTolerance) -> Self {
        Self { weld }
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_WELD_TOLERANCE, WeldTolerance};
    use crate::test_meshes::unit_cube;
    use foundation::math::Affine3;

    #[test]
    fn default_is_absolute() {
        assert_eq!(
            WeldTolerance::default().resolve(&unit_cube()),
            Some(DEFAULT_WELD_TOLERANCE)
        );
        assert_eq!(WeldTolerance::Disabled.resolve(&unit_cube()), None);
    }

    #[test]
    fn relative_scales_with_local_bounds_only() {
        let mesh = unit_cube().with_transform(Affine3::from_scale(100.0));
        let tol = WeldTolerance::Relative(0.5).resolve(&mesh).expect("tolerance");
        assert!((tol - 0.5 * 3f64.sqrt()).abs() < 1e-12);
    }
}
