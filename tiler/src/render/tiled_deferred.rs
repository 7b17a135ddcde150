use super::*;
use crate::RenderError;
use crate::render::buffer::try_alloc;
use rayon::prelude::*;

const NO_WINNER: u32 = u32::MAX;

/// Tile-local visibility state. `winner` indexes the tile's bin, `weights` caches the first two
/// perspective-corrected barycentric weights of the winner (the third is implied).
struct TileScratch {
    color: Vec<u32>,
    depth: Vec<f32>,
    winner: Vec<u32>,
    weights: Vec<[f32; 2]>,
}

impl TileScratch {
    fn new(tile_size: u16) -> Result<Self, RenderError> {
        let pixels = tile_size as usize * tile_size as usize;
        Ok(Self {
            color: try_alloc(pixels, 0, "tile color")?,
            depth: try_alloc(pixels, 0.0, "tile depth")?,
            winner: try_alloc(pixels, NO_WINNER, "tile winners")?,
            weights: try_alloc(pixels, [0.0; 2], "tile weights")?,
        })
    }
}

/// Tile-based deferred renderer: a depth-only pass finds the visible triangle of every pixel,
/// then each visible pixel is shaded exactly once.
pub struct TiledDeferredRenderer {
    config: RendererConfig,
    pool: rayon::ThreadPool,
}

impl TiledDeferredRenderer {
    pub fn new(config: RendererConfig) -> Result<Self, RenderError> {
        let pool = build_thread_pool(&config)?;
        Ok(Self { config, pool })
    }
}

impl Renderer for TiledDeferredRenderer {
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
    let winner = &mut scratch.winner[..pixels];
    let weights = &mut scratch.weights[..pixels];
    depth.fill(config.clear_depth);
    winner.fill(NO_WINNER);

    let mut counters = FragmentCounters::default();

    // Pass A: depth only
    for (bin_index, &triangle_index) in bin.iter().enumerate() {
        let triangle = &triangles[triangle_index as usize];
        let has_material = context.material(triangle).is_some();
        triangle.rasterize(&rect, |batch| {
            for c in batch {
                let local = (c.y as i32 - rect.y0) as usize * tile_width + (c.x as i32 - rect.x0) as usize;
                if !depth_passes(c.depth, depth[local]) {
                    continue;
                }
                if !has_material {
                    counters.drop_fragment(triangle);
                    continue;
                }
                let w = perspective_correct(c.weights, triangle.inv_w);
                depth[local] = c.depth;
                winner[local] = bin_index as u32;
                weights[local] = [w[0], w[1]];
            }
        });
    }

    // Pass B: shade the winners
    for local in 0..pixels {
        color[local] = config.clear_color;
        if winner[local] == NO_WINNER {
            continue;
        }
        let triangle = &triangles[bin[winner[local] as usize] as usize];
        let x = (rect.x0 + (local % tile_width) as i32) as u16;
        let y = (rect.y0 + (local / tile_width) as i32) as u16;
        if let Some(shaded) = context.shade(&mut counters, triangle, x, y, depth[local], weights[local]) {
            color[local] = shaded;
        }
    }

    tile.color_buffer.copy_from(color, tile_width);
    if let Some(depth_buffer) = tile.depth_buffer.as_mut() {
        depth_buffer.copy_from(depth, tile_width);
    }
    counters
}
