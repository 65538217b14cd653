use crate::MeasureError;
use crate::session::Mark;

pub const CSV_HEADER: &str = "idx,x,y,z,type";

/// Marks as CSV rows `idx,x,y,z,type`, newline separated, no trailing newline.
pub fn marks_to_csv(marks: &[Mark]) -> Result<String, MeasureError> {
    if marks.is_empty() {
        return Err(MeasureError::NoMarks);
    }
    let mut rows = Vec::with_capacity(marks.len() + 1);
    rows.push(CSV_HEADER.to_string());
    for (i, m) in marks.iter().enumerate() {
        rows.push(format!(
            "{i},{},{},{},{}",
            m.point.x,
            m.point.y,
            m.point.z,
            m.kind.as_str()
        ));
    }
    Ok(rows.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::marks_to_csv;
    use crate::MeasureError;
    use crate::session::{Mark, MarkKind};
    use foundation::math::Vec3;

    #[test]
    fn writes_header_and_rows() {
        let marks = [
            Mark {
                point: Vec3::new(0.0, 1.5, -2.0),
                kind: MarkKind::Pick,
            },
            Mark {
                point: Vec3::new(0.25, 0.0, 3.0),
                kind: MarkKind::Pick,
            },
        ];
        assert_eq!(
            marks_to_csv(&marks).unwrap(),
            "idx,x,y,z,type\n0,0,1.5,-2,pick\n1,0.25,0,3,pick"
        );
    }

    #[test]
    fn empty_export_is_an_error() {
        assert!(matches!(marks_to_csv(&[]), Err(MeasureError::NoMarks)));
    }
}
