use super::*;
use crate::RenderError;
use crate::render::buffer::try_alloc;
use rayon::prelude::*;

/// Private full-screen targets of one worker.
#[derive(Default)]
struct Arena {
    color: Vec<u32>,
    depth: Vec<f32>,
}

/// Splits the triangle list into one contiguous run per worker. Each worker renders its run
/// into a private arena; a final pass keeps the nearest arena sample for every pixel.
pub struct PerTriangleRenderer {
    config: RendererConfig,
    pool: rayon::ThreadPool,
    arenas: Vec<Arena>,
}

impl PerTriangleRenderer {
    pub fn new(config: RendererConfig) -> Result<Self, RenderError> {
        let pool = build_thread_pool(&config)?;
        Ok(Self { config, pool, arenas: Vec::new() })
    }

    fn prepare_arenas(&mut self, pixels: usize) -> Result<(), RenderError> {
        let workers = self.pool.current_num_threads().max(1);
        self.arenas.resize_with(workers, Arena::default);
        for arena in &mut self.arenas {
            if arena.depth.len() != pixels {
                // drop the old storage first so that resizing never holds two copies
                *arena = Arena::default();
                arena.color = try_alloc(pixels, 0u32, "per-thread color arena")?;
                arena.depth = try_alloc(pixels, f32::INFINITY, "per-thread depth arena")?;
            } else {
                arena.depth.fill(f32::INFINITY);
            }
        }
        Ok(())
    }
}

impl Renderer for PerTriangleRenderer {
    fn render(
        &mut self,
        model: &Model,
        shader: &dyn Shader,
        framebuffer: &mut Framebuffer,
    ) -> Result<RenderStats, RenderError> {
        let (width, height) = framebuffer.validate()?;
        let pixels = width as usize * height as usize;
        self.prepare_arenas(pixels)?;

        let config = &self.config;
        let arenas = &mut self.arenas;
        let (stats, counters) = self.pool.install(|| -> Result<_, RenderError> {
            let frame = prepare_frame(model, shader, width, height, config.cull_mode)?;
            let context = ShadingContext { model, vertices: &frame.vertices, shader, wireframe: config.wireframe };
            let screen = frame.screen_rect();

            if !frame.triangles.is_empty() && frame.triangles.len() < arenas.len() {
                log::warn!(
                    "{} workers for {} triangles, some arenas stay empty",
                    arenas.len(),
                    frame.triangles.len()
                );
            }
            let run = frame.triangles.len().div_ceil(arenas.len()).max(1);
            let counters = arenas
                .par_iter_mut()
                .enumerate()
                .map(|(worker, arena)| {
                    let mut counters = FragmentCounters::default();
                    let start = (worker * run).min(frame.triangles.len());
                    let end = (start + run).min(frame.triangles.len());
                    for triangle in &frame.triangles[start..end] {
                        triangle.rasterize(&screen, |batch| {
                            for c in batch {
                                let index = c.y as usize * width as usize + c.x as usize;
                                if !depth_passes(c.depth, arena.depth[index]) {
                                    continue;
                                }
                                let w = perspective_correct(c.weights, triangle.inv_w);
                                if let Some(color) = context.shade(&mut counters, triangle, c.x, c.y, c.depth, [w[0], w[1]])
                                {
                                    arena.depth[index] = c.depth;
                                    arena.color[index] = color;
                                }
                            }
                        });
                    }
                    counters
                })
                .reduce(FragmentCounters::default, FragmentCounters::merge);

            resolve(arenas, framebuffer, config, width as usize);
            Ok((frame.stats, counters))
        })?;

        Ok(finish_stats(config.kind, stats, counters))
    }

    fn config(&self) -> &RendererConfig {
        &self.config
    }
}

/// Nearest sample over all arenas for pixel `index`; arenas are scanned in worker order,
/// so on a tie the earlier triangle run wins.
fn nearest(arenas: &[Arena], index: usize, config: &RendererConfig) -> (u32, f32) {
    let mut best = (config.clear_color, config.clear_depth);
    for arena in arenas {
        if depth_passes(arena.depth[index], best.1) {
            best = (arena.color[index], arena.depth[index]);
        }
    }
    best
}

fn resolve(arenas: &[Arena], framebuffer: &mut Framebuffer, config: &RendererConfig, width: usize) {
    let Some(color) = framebuffer.color_buffer.as_deref_mut() else {
        return;
    };
    let color_rows = color.elems.par_chunks_mut(color.stride).take(color.height);
    match framebuffer.depth_buffer.as_deref_mut() {
        Some(depth) => {
            let depth_rows = depth.elems.par_chunks_mut(depth.stride).take(depth.height);
            color_rows.zip(depth_rows).enumerate().for_each(|(y, (color_row, depth_row))| {
                let pixels = color_row[..width].iter_mut().zip(&mut depth_row[..width]);
                for (x, (pixel_color, pixel_depth)) in pixels.enumerate() {
                    (*pixel_color, *pixel_depth) = nearest(arenas, y * width + x, config);
                }
            });
        }
        None => {
            color_rows.enumerate().for_each(|(y, row)| {
                for (x, pixel) in row[..width].iter_mut().enumerate() {
                    *pixel = nearest(arenas, y * width + x, config).0;
                }
            });
        }
    }
}
