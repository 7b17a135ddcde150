use super::*;
use crate::RenderError;
use crate::math::*;
use rayon::prelude::*;

/// Clip-space w at or below this is treated as a vertex at or behind the eye.
pub const MIN_CLIP_W: f32 = 1e-5;

/// Clip -> (NDC x, NDC y, NDC z, 1/w).
///
/// A vertex at or behind the eye cannot be divided by its w. It is parked at the center of the
/// far plane instead, so triangles made only of such vertices degenerate and get culled.
pub fn perspective_divide(v: Vec4) -> Vec4 {
    if !(v.w > MIN_CLIP_W) || !v.is_finite() {
        return Vec4::new(0.0, 0.0, 1.0, 1.0);
    }
    let inv_w = 1.0 / v.w;
    Vec4::new(v.x * inv_w, v.y * inv_w, (v.z * inv_w).clamp(-1.0, 1.0), inv_w)
}

/// Runs the vertex shader over every model vertex and maps the results to screen space.
///
/// The output is parallel to `vertices`. Each vertex keeps its clip-space position in
/// `clip_position` for frustum culling during setup.
pub fn transform_vertices(
    vertices: &[Vertex],
    shader: &dyn Shader,
    viewport_scale: ViewportScale,
) -> Result<Vec<Vertex>, RenderError> {
    let mut transformed = Vec::new();
    transformed.try_reserve_exact(vertices.len()).map_err(|_| RenderError::OutOfMemory {
        what: "transformed vertices",
        bytes: vertices.len().saturating_mul(size_of::<Vertex>()),
    })?;

    transformed.par_extend(vertices.par_iter().map(|input| {
        let clip = shader.vertex(input);
        Vertex {
            position: viewport_scale.apply(perspective_divide(clip.position)),
            clip_position: clip.position,
            ..clip
        }
    }));
    Ok(transformed)
}
