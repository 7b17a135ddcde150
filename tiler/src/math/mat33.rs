use crate::math::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat33(pub [f32; 9]);

impl Mat33 {
    pub fn identity() -> Mat33 {
        Mat33([
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0,
        ])
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.0;
        m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6]) + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    /// Inverse via the adjugate. Singular matrices fall back to identity.
    pub fn inverse(&self) -> Mat33 {
        let det = self.determinant();
        if det.abs() < 1e-12 {
            return Mat33::identity();
        }
        let m = &self.0;
        let inv_det = 1.0 / det;
        Mat33([
            (m[4] * m[8] - m[5] * m[7]) * inv_det,
            (m[2] * m[7] - m[1] * m[8]) * inv_det,
            (m[1] * m[5] - m[2] * m[4]) * inv_det,
            (m[5] * m[6] - m[3] * m[8]) * inv_det,
            (m[0] * m[8] - m[2] * m[6]) * inv_det,
            (m[2] * m[3] - m[0] * m[5]) * inv_det,
            (m[3] * m[7] - m[4] * m[6]) * inv_det,
            (m[1] * m[6] - m[0] * m[7]) * inv_det,
            (m[0] * m[4] - m[1] * m[3]) * inv_det,
        ])
    }

    pub fn transpose(&self) -> Mat33 {
        let m = &self.0;
        Mat33([
            m[0], m[3], m[6], //
            m[1], m[4], m[7], //
            m[2], m[5], m[8],
        ])
    }

    /// Matrix that maps model-space normals to world space: (M^-1)^T.
    pub fn normal_matrix(&self) -> Mat33 {
        self.inverse().transpose()
    }
}

// Vec3 = Mat33 * Vec3
impl std::ops::Mul<Vec3> for Mat33 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3 {
            x: m[0] * v.x + m[1] * v.y + m[2] * v.z,
            y: m[3] * v.x + m[4] * v.y + m[5] * v.z,
            z: m[6] * v.x + m[7] * v.y + m[8] * v.z,
        }
    }
}
