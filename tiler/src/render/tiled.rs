use super::*;
use crate::RenderError;
use crate::render::buffer::try_alloc;
use rayon::prelude::*;

/// Tile-local color and depth, reused by a worker across the tiles it processes.
struct TileScratch {
    color: Vec<u32>,
    depth: Vec<f32>,
}

impl TileScratch {
    fn new(tile_size: u16) -> Result<Self, RenderError> {
        let pixels = tile_size as usize * tile_size as usize;
        Ok(Self { color: try_alloc(pixels, 0, "tile color")?, depth: try_alloc(pixels, 0.0, "tile depth")? })
    }
}

/// Forward tile renderer: bins triangles into screen tiles and renders the tiles in parallel,
/// shading fragments in bin order with either an early or a late depth test.
pub struct TiledRenderer {
    config: RendererConfig,
    pool: rayon::ThreadPool,
}

impl TiledRenderer {
    pub fn new(config: RendererConfig) -> Result<Self, RenderError> {
        let pool = build_thread_pool(&config)?;
        Ok(Self { config, pool })
    }
}

impl Renderer for TiledRenderer {
    fn render(
        &mut self,
        model: &Model,
        shader: &dyn Shader,
        framebuffer: &mut Framebuffer,
    ) -> Result<RenderStats, RenderError> {
        let (width, height) = framebuffer.validate()?;
        let config = &self.config;
        let (stats, counters) = self.pool.install(|| -> Result<_, RenderError> {
            let mut frame = prepare_frame(model, shader, width, height, config.cull_mode)?;
            let grid = TileGrid::new(width, height, config.tile_size);
            let bins = TileBins::build(&grid, &frame.triangles)?;
            frame.stats.tile_references = bins.total();

            let context = ShadingContext { model, vertices: &frame.vertices, shader, wireframe: config.wireframe };
            let mut tiles = framebuffer.tiles(config.tile_size)?;
            let counters = tiles
                .par_iter_mut()
                .enumerate()
                .map_init(
                    || TileScratch::new(config.tile_size),
                    |scratch, (index, tile)| {
                        let scratch = scratch.as_mut().map_err(|e| e.clone())?;
                        let rect = grid.tile_rect(index);
                        let counters = render_tile(&context, config, scratch, rect, bins.bin(index), &frame.triangles, tile);
                        Ok::<_, RenderError>(counters)
                    },
                )
                .try_reduce(FragmentCounters::default, |a, b| Ok(a.merge(b)))?;
            Ok((frame.stats, counters))
        })?;

        Ok(finish_stats(config.kind, stats, counters))
    }

    fn config(&self) -> &RendererConfig {
        &self.config
    }
}

fn render_tile(
    context: &ShadingContext,
    config: &RendererConfig,
    scratch: &mut TileScratch,
    rect: PixelRect,
    bin: &[u32],
    triangles: &[TriangleSetup],
    tile: &mut FramebufferTile,
) -> FragmentCounters {
    let tile_width = rect.width();
    let pixels = tile_width * rect.height();
    let color = &mut scratch.color[..pixels];
    let depth = &mut scratch.depth[..pixels];
    color.fill(config.clear_color);
    depth.fill(config.clear_depth);

    let mut counters = FragmentCounters::default();
    for &triangle_index in bin {
        let triangle = &triangles[triangle_index as usize];
        triangle.rasterize(&rect, |batch| {
            for c in batch {
                let local = (c.y as i32 - rect.y0) as usize * tile_width + (c.x as i32 - rect.x0) as usize;
                if config.early_z && !depth_passes(c.depth, depth[local]) {
                    continue;
                }
                let w = perspective_correct(c.weights, triangle.inv_w);
                let Some(shaded) = context.shade(&mut counters, triangle, c.x, c.y, c.depth, [w[0], w[1]]) else {
                    continue;
                };
                // late-Z: the fragment has been shaded either way
                if !config.early_z && !depth_passes(c.depth, depth[local]) {
                    continue;
                }
                depth[local] = c.depth;
                color[local] = shaded;
            }
        });
    }

    tile.color_buffer.copy_from(color, tile_width);
    if let Some(depth_buffer) = tile.depth_buffer.as_mut() {
        depth_buffer.copy_from(depth, tile_width);
    }
    counters
}
