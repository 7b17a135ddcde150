use crate::math::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        dot(self, self).sqrt()
    }
}

impl_vector_ops!(Vec2 { x, y });

/// Z component of the 3D cross product of two 2D vectors, i.e. a.x * b.y - a.y * b.x.
/// Positive when `b` is counter-clockwise from `a` in a Y-up frame.
pub fn cross2(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}
