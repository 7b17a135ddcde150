use crate::math::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn clamped(self, min: f32, max: f32) -> Vec4 {
        Vec4 {
            x: self.x.clamp(min, max),
            y: self.y.clamp(min, max),
            z: self.z.clamp(min, max),
            w: self.w.clamp(min, max),
        }
    }

    pub fn xy(self) -> Vec2 {
        Vec2 { x: self.x, y: self.y }
    }

    pub fn xyz(self) -> Vec3 {
        Vec3 { x: self.x, y: self.y, z: self.z }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl_vector_ops!(Vec4 { x, y, z, w });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swizzles() {
        let v = Vec4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.xy(), Vec2::new(1.0, 2.0));
        assert_eq!(v.xyz(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn clamped_and_finite() {
        let v = Vec4::new(-1.0, 0.5, 2.0, 1.0);
        assert_eq!(v.clamped(0.0, 1.0), Vec4::new(0.0, 0.5, 1.0, 1.0));
        assert!(v.is_finite());
        assert!(!Vec4::new(f32::NAN, 0.0, 0.0, 1.0).is_finite());
        assert!(!(v / 0.0).is_finite());
    }

    #[test]
    fn dot_product() {
        let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let b = Vec4::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(dot(a, b), 70.0);
    }
}
