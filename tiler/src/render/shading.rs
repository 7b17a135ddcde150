use super::*;
use crate::math::*;

/// Weights below this count as "on an edge" for the wireframe overlay.
pub const WIREFRAME_WIDTH: f32 = 0.02;

/// A face that references a material the model doesn't have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMaterial {
    pub face: u32,
    pub material: u32,
}

/// Per-worker fragment bookkeeping, merged after the parallel region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FragmentCounters {
    pub shaded: u64,
    pub dropped: u64,
    pub first_invalid: Option<InvalidMaterial>,
}

impl FragmentCounters {
    pub fn drop_fragment(&mut self, triangle: &TriangleSetup) {
        self.dropped += 1;
        self.first_invalid.get_or_insert(InvalidMaterial { face: triangle.face, material: triangle.material });
    }

    pub fn merge(self, other: FragmentCounters) -> FragmentCounters {
        FragmentCounters {
            shaded: self.shaded + other.shaded,
            dropped: self.dropped + other.dropped,
            first_invalid: self.first_invalid.or(other.first_invalid),
        }
    }
}

/// Read-only state shared by every worker to turn covered pixels into colors.
pub struct ShadingContext<'a> {
    pub model: &'a Model,

    /// Screen-space vertices, parallel to the model's vertices.
    pub vertices: &'a [Vertex],
    pub shader: &'a dyn Shader,

    /// Packed color written instead of shading near triangle edges.
    pub wireframe: Option<u32>,
}

impl ShadingContext<'_> {
    pub fn material(&self, triangle: &TriangleSetup) -> Option<&Material> {
        self.model.material(triangle.material)
    }

    /// Builds the fragment of `triangle` at pixel (x, y) and shades it.
    ///
    /// `weights` are the first two perspective-corrected barycentric weights, the third is
    /// implied. Returns `None` and counts the fragment as dropped when the material is missing.
    pub fn shade(
        &self,
        counters: &mut FragmentCounters,
        triangle: &TriangleSetup,
        x: u16,
        y: u16,
        depth: f32,
        weights: [f32; 2],
    ) -> Option<u32> {
        let Some(material) = self.material(triangle) else {
            counters.drop_fragment(triangle);
            return None;
        };

        let w = [weights[0], weights[1], 1.0 - weights[0] - weights[1]];
        if let Some(color) = self.wireframe {
            if w.iter().any(|&w| w < WIREFRAME_WIDTH) {
                return Some(color);
            }
        }
        counters.shaded += 1;

        let [v0, v1, v2] = triangle.indices.map(|i| &self.vertices[i as usize]);
        let fragment = Fragment {
            x,
            y,
            depth,
            world_position: barycentric(v0.world_position, v1.world_position, v2.world_position, w),
            normal: barycentric(v0.normal, v1.normal, v2.normal, w),
            tex_coord: barycentric(v0.tex_coord, v1.tex_coord, v2.tex_coord, w),
            color: barycentric(v0.color, v1.color, v2.color, w),
            material,
        };
        Some(RGBA::from_vec4(self.shader.fragment(&fragment)).to_u32())
    }
}

/// Emits the per-render log lines and folds the fragment counters into `stats`.
pub(crate) fn finish_stats(kind: RendererKind, mut stats: RenderStats, counters: FragmentCounters) -> RenderStats {
    stats.fragments_shaded = counters.shaded;
    stats.fragments_dropped = counters.dropped;
    if let Some(invalid) = counters.first_invalid {
        log::error!(
            "{} fragments dropped: face {} references missing material {}",
            counters.dropped,
            invalid.face,
            invalid.material
        );
    }
    log::debug!("{:?} render: {:?}", kind, stats);
    stats
}
