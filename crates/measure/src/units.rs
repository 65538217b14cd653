use foundation::bounds::Aabb3;

/// Scale between model units and meters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LengthUnits {
    pub meters_per_unit: f64,
}

impl Default for LengthUnits {
    fn default() -> Self {
        Self {
            meters_per_unit: 1.0,
        }
    }
}

impl LengthUnits {
    /// Falls back to 1 m/unit for zero, negative or non-finite scales.
    pub fn new(meters_per_unit: f64) -> Self {
        if meters_per_unit.is_finite() && meters_per_unit > 0.0 {
            Self { meters_per_unit }
        } else {
            Self::default()
        }
    }

    pub fn to_meters(&self, length_units: f64) -> f64 {
        length_units * self.meters_per_unit
    }
}

/// Human-readable metric length: `m` from 1 m, `cm` from 1 cm, else `mm`.
pub fn format_length(meters: f64) -> String {
    match split_length(meters) {
        (value, "") => value,
        (value, unit) => format!("{value} {unit}"),
    }
}

fn split_length(meters: f64) -> (String, &'static str) {
    if !meters.is_finite() {
        return ("n/a".to_string(), "");
    }
    let abs = meters.abs();
    if abs >= 1.0 {
        (trim_fixed(meters, 3), "m")
    } else if abs >= 0.01 {
        (trim_fixed(meters * 100.0, 2), "cm")
    } else {
        (trim_fixed(meters * 1000.0, 1), "mm")
    }
}

/// Fixed-point with trailing zeros (and a bare point) removed.
fn trim_fixed(x: f64, decimals: usize) -> String {
    let s = format!("{x:.decimals$}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// `W × H × D` of a model-space box; a shared unit is written once.
pub fn format_extents(bounds: &Aabb3, units: LengthUnits) -> String {
    let dims = bounds.size().to_array().map(|d| split_length(units.to_meters(d)));
    if dims[0].1 == dims[1].1 && dims[1].1 == dims[2].1 && !dims[0].1.is_empty() {
        return format!("{} × {} × {} {}", dims[0].0, dims[1].0, dims[2].0, dims[0].1);
    }
    dims.iter()
        .map(|(v, u)| if u.is_empty() { v.clone() } else { format!("{v} {u}") })
        .collect::<Vec<_>>()
        .join(" × ")
}

#[cfg(test)]
mod tests {
    use super::{LengthUnits, format_extents, format_length};
    use foundation::bounds::Aabb3;

    #[test]
    fn picks_unit_by_magnitude() {
        assert_eq!(format_length(1.0), "1 m");
        assert_eq!(format_length(12.3456), "12.346 m");
        assert_eq!(format_length(0.5), "50 cm");
        assert_eq!(format_length(0.0123), "1.23 cm");
        assert_eq!(format_length(0.01), "1 cm");
        assert_eq!(format_length(0.00456), "4.6 mm");
        assert_eq!(format_length(0.0), "0 mm");
        assert_eq!(format_length(-2.5), "-2.5 m");
    }

    #[test]
    fn non_finite_lengths_are_not_formatted_as_numbers() {
        assert_eq!(format_length(f64::INFINITY), "n/a");
        assert_eq!(format_length(f64::NAN), "n/a");
    }

    #[test]
    fn units_scale_and_fall_back() {
        assert_eq!(LengthUnits::new(0.5).to_meters(3.0), 1.5);
        assert_eq!(LengthUnits::new(0.0), LengthUnits::default());
        assert_eq!(LengthUnits::new(f64::NAN).meters_per_unit, 1.0);
    }

    #[test]
    fn extents_share_a_common_unit() {
        let b = Aabb3::new([0.0, 0.0, 0.0], [200.0, 150.0, 40.0]);
        assert_eq!(format_extents(&b, LengthUnits::new(0.001)), "20 × 15 × 4 cm");
        let b = Aabb3::new([0.0, 0.0, 0.0], [2.0, 0.5, 0.004]);
        assert_eq!(format_extents(&b, LengthUnits::default()), "2 m × 50 cm × 4 mm");
    }
}
