/// Counters collected during one render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles_submitted: usize,

    /// Triangles that survived culling.
    pub triangles_rasterized: usize,
    pub culled_frustum: usize,
    pub culled_backface: usize,
    pub culled_degenerate: usize,
    pub culled_offscreen: usize,

    /// Triangle references over all tile bins, zero for the per-triangle renderer.
    pub tile_references: usize,

    /// Fragment shader invocations. Wireframe overlay pixels skip the shader and are not counted.
    pub fragments_shaded: u64,

    /// Fragments skipped because their face references a missing material.
    pub fragments_dropped: u64,
}

impl RenderStats {
    pub fn triangles_culled(&self) -> usize {
        self.culled_frustum + self.culled_backface + self.culled_degenerate + self.culled_offscreen
    }
}
