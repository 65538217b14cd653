use super::Vec3;

/// Local-to-world transform: a 3x3 linear part followed by a translation.
///
/// `linear` is row-major, so `world = linear * local + translation`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine3 {
    pub linear: [[f64; 3]; 3],
    pub translation: Vec3,
}

impl Default for Affine3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine3 {
    pub fn identity() -> Self {
        Self {
            linear: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: Vec3::ZERO,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    pub fn from_scale(s: f64) -> Self {
        Self {
            linear: [[s, 0.0, 0.0], [0.0, s, 0.0], [0.0, 0.0, s]],
            translation: Vec3::ZERO,
        }
    }

    /// Builds from a column-major 4x4 matrix (WebGL / three.js `matrixWorld.elements`).
    ///
    /// The projective row is ignored.
    pub fn from_cols_array(m: &[f64; 16]) -> Self {
        Self {
            linear: [[m[0], m[4], m[8]], [m[1], m[5], m[9]], [m[2], m[6], m[10]]],
            translation: Vec3::new(m[12], m[13], m[14]),
        }
    }

    /// Row-major 3x4 layout: three rows of `[a, b, c, t]`.
    pub fn from_rows_3x4(m: &[f64; 12]) -> Self {
        Self {
            linear: [[m[0], m[1], m[2]], [m[4], m[5], m[6]], [m[8], m[9], m[10]]],
            translation: Vec3::new(m[3], m[7], m[11]),
        }
    }

    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let r = &self.linear;
        Vec3::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z,
        )
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.transform_vector(p) + self.translation
    }
}
