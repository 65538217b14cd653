//! Argument and environment helpers shared by the `relic` binary.

use foundation::math::Vec3;
use geodesic::{GeodesicConfig, WeldTolerance};
use measure::MeasureMode;

pub const WELD_TOLERANCE_ENV: &str = "RELIC_WELD_TOLERANCE";
pub const WELD_RELATIVE_ENV: &str = "RELIC_WELD_RELATIVE";

/// Geodesic config from the process environment.
pub fn geodesic_config_from_env() -> Result<GeodesicConfig, String> {
    let tolerance = std::env::var(WELD_TOLERANCE_ENV).ok();
    let relative = std::env::var(WELD_RELATIVE_ENV).ok();
    geodesic_config_from_values(tolerance.as_deref(), relative.as_deref())
}

/// `tolerance` is an absolute weld distance or `off`; `relative` is a
/// fraction of the bounding-box diagonal. `off` wins, then `relative`.
pub fn geodesic_config_from_values(
    tolerance: Option<&str>,
    relative: Option<&str>,
) -> Result<GeodesicConfig, String> {
    let tolerance = tolerance.map(str::trim).filter(|s| !s.is_empty());
    let relative = relative.map(str::trim).filter(|s| !s.is_empty());

    let weld = match (tolerance, relative) {
        (Some(t), _) if t.eq_ignore_ascii_case("off") => WeldTolerance::Disabled,
        (_, Some(r)) => WeldTolerance::Relative(positive(WELD_RELATIVE_ENV, r)?),
        (Some(t), None) => WeldTolerance::Absolute(positive(WELD_TOLERANCE_ENV, t)?),
        (None, None) => WeldTolerance::default(),
    };
    Ok(GeodesicConfig::new(weld))
}

fn positive(key: &str, raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!("{key} must be a positive number, got {raw:?}")),
    }
}

/// Parses `x,y,z`.
pub fn parse_point(raw: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got {raw:?}"));
    };
    let coord = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("bad coordinate {s:?} in {raw:?}"))
    };
    Ok(Vec3::new(coord(*x)?, coord(*y)?, coord(*z)?))
}

/// Rejects a point count `mode` cannot measure.
pub fn check_point_count(mode: MeasureMode, count: usize) -> Result<(), String> {
    let fits = match mode {
        MeasureMode::None => return Err("--mode none does not measure".to_string()),
        MeasureMode::Distance | MeasureMode::SurfaceDistance => count == 2,
        MeasureMode::Polyline | MeasureMode::SurfacePath => count >= 2,
        MeasureMode::Girth => count == 1,
    };
    if fits {
        return Ok(());
    }
    let wanted = match mode {
        MeasureMode::Girth => "exactly 1 point",
        MeasureMode::Polyline | MeasureMode::SurfacePath => "at least 2 points",
        _ => "exactly 2 points",
    };
    Err(format!("{} takes {wanted}, got {count}", mode.as_str()))
}

pub fn to_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{check_point_count, geodesic_config_from_values, parse_point, to_hex};
    use foundation::math::Vec3;
    use geodesic::WeldTolerance;
    use measure::MeasureMode;

    #[test]
    fn weld_config_precedence() {
        let weld = |t, r| geodesic_config_from_values(t, r).unwrap().weld;
        assert_eq!(weld(None, None), WeldTolerance::default());
        assert_eq!(weld(Some("0.01"), None), WeldTolerance::Absolute(0.01));
        assert_eq!(weld(Some("OFF"), Some("0.001")), WeldTolerance::Disabled);
        assert_eq!(weld(Some("0.01"), Some("0.001")), WeldTolerance::Relative(0.001));
        assert_eq!(weld(Some("  "), None), WeldTolerance::default());
    }

    #[test]
    fn weld_config_rejects_bad_numbers() {
        assert!(geodesic_config_from_values(Some("-1"), None).is_err());
        assert!(geodesic_config_from_values(Some("abc"), None).is_err());
        assert!(geodesic_config_from_values(None, Some("NaN")).is_err());
    }

    #[test]
    fn points_parse_from_triples() {
        assert_eq!(parse_point("1, 2.5,-3").unwrap(), Vec3::new(1.0, 2.5, -3.0));
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("1,2,3,4").is_err());
        assert!(parse_point("1,x,3").is_err());
        assert!(parse_point("1,inf,3").is_err());
    }

    #[test]
    fn point_count_must_fit_the_mode() {
        assert!(check_point_count(MeasureMode::SurfaceDistance, 2).is_ok());
        assert!(check_point_count(MeasureMode::SurfacePath, 5).is_ok());
        assert!(check_point_count(MeasureMode::Girth, 1).is_ok());
        assert_eq!(
            check_point_count(MeasureMode::Distance, 3).unwrap_err(),
            "distance takes exactly 2 points, got 3"
        );
        assert_eq!(
            check_point_count(MeasureMode::SurfaceDistance, 4).unwrap_err(),
            "surface-distance takes exactly 2 points, got 4"
        );
        assert_eq!(
            check_point_count(MeasureMode::Polyline, 1).unwrap_err(),
            "polyline takes at least 2 points, got 1"
        );
        assert!(check_point_count(MeasureMode::Girth, 2).is_err());
        assert!(check_point_count(MeasureMode::None, 2).is_err());
    }

    #[test]
    fn hex_is_lowercase() {
        assert_eq!(to_hex(&[0x00, 0xab, 0x7f]), "00ab7f");
    }
}
