use super::*;
use crate::RenderError;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    /// Triangles are split between workers, each rendering into a private full-screen buffer.
    PerTriangle,

    /// Triangles are binned into screen tiles, tiles are shaded in parallel.
    Tiled,

    /// Like `Tiled`, but resolves visibility per tile before shading only the visible pixels.
    TiledDeferred,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub kind: RendererKind,

    /// Worker count, hardware parallelism if `None`.
    pub threads: Option<usize>,

    /// Edge of the square screen tiles, in pixels.
    pub tile_size: u16,

    /// Depth test before shading. Only affects `RendererKind::Tiled`.
    pub early_z: bool,
    pub cull_mode: CullMode,

    /// Packed RGBA written where nothing is visible.
    pub clear_color: u32,

    /// Depth written where nothing is visible, and the far limit of the depth test.
    pub clear_depth: f32,

    /// Overlay triangle edges with this packed color.
    pub wireframe: Option<u32>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::Tiled,
            threads: None,
            tile_size: 64,
            early_z: true,
            cull_mode: CullMode::CW,
            clear_color: RGBA::new(0, 0, 0, 255).to_u32(),
            clear_depth: 1.0,
            wireframe: None,
        }
    }
}

impl RendererConfig {
    pub const MAX_TILE_SIZE: u16 = 1024;

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.tile_size == 0 || self.tile_size > Self::MAX_TILE_SIZE {
            return Err(RenderError::InvalidConfig(format!(
                "tile size must be within 1..={}, got {}",
                Self::MAX_TILE_SIZE,
                self.tile_size
            )));
        }
        if self.threads == Some(0) {
            return Err(RenderError::InvalidConfig("thread count must be positive".to_string()));
        }
        if self.clear_depth.is_nan() {
            return Err(RenderError::InvalidConfig("clear depth is NaN".to_string()));
        }
        Ok(())
    }
}

pub trait Renderer {
    /// Renders `model` with `shader` into `framebuffer`.
    ///
    /// Every pixel of the color target, and of the depth target if present, is written:
    /// either with the visible surface or with the clear values.
    fn render(
        &mut self,
        model: &Model,
        shader: &dyn Shader,
        framebuffer: &mut Framebuffer,
    ) -> Result<RenderStats, RenderError>;

    fn config(&self) -> &RendererConfig;
}

pub fn create_renderer(config: RendererConfig) -> Result<Box<dyn Renderer>, RenderError> {
    config.validate()?;
    Ok(match config.kind {
        RendererKind::PerTriangle => Box::new(PerTriangleRenderer::new(config)?),
        RendererKind::Tiled => Box::new(TiledRenderer::new(config)?),
        RendererKind::TiledDeferred => Box::new(TiledDeferredRenderer::new(config)?),
    })
}

pub(crate) fn build_thread_pool(config: &RendererConfig) -> Result<rayon::ThreadPool, RenderError> {
    config.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.unwrap_or(0))
        .thread_name(|index| format!("tiler-worker-{index}"))
        .build()?;
    Ok(pool)
}

/// Geometry of one render call after the vertex stage and triangle setup.
pub(crate) struct Frame {
    pub width: u16,
    pub height: u16,

    /// Screen-space vertices, parallel to the model's vertices.
    pub vertices: Vec<Vertex>,

    /// Surviving triangles in face order.
    pub triangles: Vec<TriangleSetup>,
    pub stats: RenderStats,
}

impl Frame {
    pub fn screen_rect(&self) -> PixelRect {
        PixelRect { x0: 0, y0: 0, x1: self.width as i32 - 1, y1: self.height as i32 - 1 }
    }
}

/// Runs the vertex stage and triangle setup. Must be called from within the renderer's pool.
pub(crate) fn prepare_frame(
    model: &Model,
    shader: &dyn Shader,
    width: u16,
    height: u16,
    cull_mode: CullMode,
) -> Result<Frame, RenderError> {
    let viewport_scale = ViewportScale::new(Viewport::new(0, 0, width, height));
    let vertices = transform_vertices(model.vertices(), shader, viewport_scale)?;

    let faces = model.faces();
    let mut setups = Vec::new();
    setups.try_reserve_exact(faces.len()).map_err(|_| RenderError::OutOfMemory {
        what: "triangle setup",
        bytes: faces.len().saturating_mul(size_of::<Result<TriangleSetup, Culled>>()),
    })?;
    setups.par_extend(
        faces
            .par_iter()
            .enumerate()
            .map(|(index, face)| TriangleSetup::new(index as u32, face, &vertices, cull_mode, width, height)),
    );

    let mut stats = RenderStats { triangles_submitted: faces.len(), ..Default::default() };
    let mut triangles = Vec::new();
    let survivors = setups.iter().filter(|setup| setup.is_ok()).count();
    triangles.try_reserve_exact(survivors).map_err(|_| RenderError::OutOfMemory {
        what: "triangles",
        bytes: survivors.saturating_mul(size_of::<TriangleSetup>()),
    })?;
    for setup in setups {
        match setup {
            Ok(triangle) => triangles.push(triangle),
            Err(Culled::Frustum) => stats.culled_frustum += 1,
            Err(Culled::BackFace) => stats.culled_backface += 1,
            Err(Culled::Degenerate) => stats.culled_degenerate += 1,
            Err(Culled::OffScreen) => stats.culled_offscreen += 1,
        }
    }
    stats.triangles_rasterized = triangles.len();

    Ok(Frame { width, height, vertices, triangles, stats })
}
