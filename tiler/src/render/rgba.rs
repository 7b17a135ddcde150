use crate::math::Vec4;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Zeroable, Pod)]
pub struct RGBA {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RGBA {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_u32(&self) -> u32 {
        bytemuck::cast(*self)
    }

    pub fn from_u32(packed: u32) -> Self {
        bytemuck::cast(packed)
    }

    /// Converts a [0, 1] color to 8 bits per channel; out-of-range and NaN channels are clamped.
    pub fn from_vec4(color: Vec4) -> Self {
        let c = color.clamped(0.0, 1.0) * 255.0;
        // NaN survives clamp(), `as u8` maps it to 0
        RGBA::new(c.x.round() as u8, c.y.round() as u8, c.z.round() as u8, c.w.round() as u8)
    }

    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(self.r as f32, self.g as f32, self.b as f32, self.a as f32) / 255.0
    }
}
