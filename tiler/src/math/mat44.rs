use crate::math::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat44(pub [f32; 16]);

impl Mat44 {
    pub fn identity() -> Mat44 {
        Mat44([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn scale_uniform(s: f32) -> Mat44 {
        Mat44([
            s, 0.0, 0.0, 0.0, //
            0.0, s, 0.0, 0.0, //
            0.0, 0.0, s, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn translate(t: Vec3) -> Mat44 {
        Mat44([
            1.0, 0.0, 0.0, t.x, //
            0.0, 1.0, 0.0, t.y, //
            0.0, 0.0, 1.0, t.z, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotate_yz(angle: f32) -> Mat44 {
        let (sin, cos) = angle.sin_cos();
        Mat44([
            1.0, 0.0, 0.0, 0.0, //
            0.0, cos, -sin, 0.0, //
            0.0, sin, cos, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotate_zx(angle: f32) -> Mat44 {
        let (sin, cos) = angle.sin_cos();
        Mat44([
            cos, 0.0, sin, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            -sin, 0.0, cos, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    // Z: [-1, 1]
    // near -> -1
    // far  -> +1
    pub fn perspective(near: f32, far: f32, fov_y: f32, aspect_ratio: f32) -> Mat44 {
        let f = 1.0 / (fov_y / 2.0).tan();
        let nf = far - near;
        Mat44([
            f / aspect_ratio, 0.0, 0.0, 0.0, //
            0.0, f, 0.0, 0.0, //
            0.0, 0.0, -(far + near) / nf, -2.0 * far * near / nf, //
            0.0, 0.0, -1.0, 0.0,
        ])
    }

    /// Right-handed view matrix looking from `eye` towards `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat44 {
        let forward = (target - eye).normalized();
        let side = cross(forward, up).normalized();
        let up = cross(side, forward);
        Mat44([
            side.x, side.y, side.z, -dot(side, eye), //
            up.x, up.y, up.z, -dot(up, eye), //
            -forward.x, -forward.y, -forward.z, dot(forward, eye), //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn as_mat33(&self) -> Mat33 {
        let m = &self.0;
        Mat33([
            m[0], m[1], m[2], //
            m[4], m[5], m[6], //
            m[8], m[9], m[10],
        ])
    }
}

// Vec4 = Mat44 * Vec4
impl std::ops::Mul<Vec4> for Mat44 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        let m = &self.0;
        Vec4 {
            x: m[0] * v.x + m[1] * v.y + m[2] * v.z + m[3] * v.w,
            y: m[4] * v.x + m[5] * v.y + m[6] * v.z + m[7] * v.w,
            z: m[8] * v.x + m[9] * v.y + m[10] * v.z + m[11] * v.w,
            w: m[12] * v.x + m[13] * v.y + m[14] * v.z + m[15] * v.w,
        }
    }
}

// Mat44 = Mat44 * Mat44
impl std::ops::Mul for Mat44 {
    type Output = Mat44;
    fn mul(self, other: Mat44) -> Mat44 {
        let mut result = [0.0f32; 16];
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result[4 * i + j] += self.0[4 * i + k] * other.0[4 * k + j];
                }
            }
        }
        Mat44(result)
    }
}
