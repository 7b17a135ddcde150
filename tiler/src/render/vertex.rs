use crate::math::*;

/// A vertex as it flows through the pipeline.
///
/// The same type carries every stage: model space on input, clip space after the
/// vertex shader, and screen space after perspective division and viewport mapping.
/// Each stage produces a new value instead of mutating the previous one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Model: (x, y, z, 1). Clip: homogeneous. Screen: (x_px, y_px, z_ndc, 1/w).
    pub position: Vec4,
    pub world_position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
    pub color: Vec4,

    /// Clip-space position cached by the vertex stage for frustum culling.
    pub clip_position: Vec4,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2, color: Vec4) -> Self {
        Self { position: position.as_point4(), normal, tex_coord, color, ..Default::default() }
    }

    /// Reciprocal of clip-space w, valid for screen-space vertices only.
    pub fn inv_w(&self) -> f32 {
        self.position.w
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec4::new(0.0, 0.0, 0.0, 1.0),
            world_position: Vec3::new(0.0, 0.0, 0.0),
            normal: Vec3::new(0.0, 0.0, 0.0),
            tex_coord: Vec2::new(0.0, 0.0),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            clip_position: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}
