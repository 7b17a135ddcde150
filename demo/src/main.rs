mod io;
mod scene;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tiler::math::*;
use tiler::render::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum RendererArg {
    PerTriangle,
    Tiled,
    TiledDeferred,
}

impl From<RendererArg> for RendererKind {
    fn from(arg: RendererArg) -> Self {
        match arg {
            RendererArg::PerTriangle => RendererKind::PerTriangle,
            RendererArg::Tiled => RendererKind::Tiled,
            RendererArg::TiledDeferred => RendererKind::TiledDeferred,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum CullArg {
    None,
    Cw,
    Ccw,
}

impl From<CullArg> for CullMode {
    fn from(arg: CullArg) -> Self {
        match arg {
            CullArg::None => CullMode::None,
            CullArg::Cw => CullMode::CW,
            CullArg::Ccw => CullMode::CCW,
        }
    }
}

/// Renders a turntable animation of a scene offscreen and saves the last frame.
#[derive(Parser, Debug)]
#[command(name = "demo", version, about = "Offscreen software rasterizer demo")]
struct Args {
    /// Visibility strategy
    #[arg(short, long, value_enum, default_value_t = RendererArg::Tiled)]
    renderer: RendererArg,

    #[arg(long, default_value_t = 1280)]
    width: u16,

    #[arg(long, default_value_t = 720)]
    height: u16,

    #[arg(long, default_value_t = 64)]
    tile_size: u16,

    /// Shade every fragment before the depth test (tiled renderer only)
    #[arg(long)]
    no_early_z: bool,

    /// Worker threads, all cores if omitted
    #[arg(short, long)]
    threads: Option<usize>,

    #[arg(long, value_enum, default_value_t = CullArg::Cw)]
    cull: CullArg,

    /// Wavefront OBJ to render instead of the built-in cube grid
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Cubes per side of the built-in scene
    #[arg(long, default_value_t = 4)]
    cubes: u32,

    #[arg(short, long, default_value_t = 60)]
    frames: u32,

    /// Overlay triangle edges
    #[arg(long)]
    wireframe: bool,

    /// PNG file receiving the last frame
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn uniforms(frame: u32, aspect_ratio: f32) -> Uniforms {
    let eye = Vec3::new(0.0, 1.2, 3.0);
    let angle = frame as f32 * 0.03;
    Uniforms {
        model: Mat44::rotate_zx(angle),
        view: Mat44::look_at(eye, Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        projection: Mat44::perspective(0.1, 20.0, std::f32::consts::FRAC_PI_3, aspect_ratio),
        camera_position: eye,
        lights: vec![
            Light::Directional { direction: Vec3::new(-0.4, -1.0, -0.6).normalized(), color: Vec3::splat(0.8) },
            Light::Point { position: Vec3::new(2.0, 2.0, 2.0), color: Vec3::new(0.3, 0.3, 0.4) },
        ],
    }
}

fn save_png(path: &Path, color: &Buffer<u32>) -> Result<()> {
    let image = image::RgbaImage::from_raw(color.width as u32, color.height as u32, color.as_u8_slice().to_vec())
        .context("color buffer does not match the image size")?;
    image.save(path).with_context(|| format!("failed to save {}", path.display()))?;
    info!("saved {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    if args.width == 0 || args.height == 0 {
        bail!("frame size must be positive, got {}x{}", args.width, args.height);
    }

    let model = match &args.obj {
        Some(path) => io::load_obj(path)?,
        None => scene::cubes(args.cubes)?,
    };
    info!("scene: {} vertices, {} triangles", model.vertices().len(), model.faces().len());

    let config = RendererConfig {
        kind: args.renderer.into(),
        threads: args.threads,
        tile_size: args.tile_size,
        early_z: !args.no_early_z,
        cull_mode: args.cull.into(),
        clear_color: RGBA::new(24, 24, 32, 255).to_u32(),
        wireframe: args.wireframe.then(|| RGBA::new(255, 255, 255, 255).to_u32()),
        ..Default::default()
    };
    let mut renderer = create_renderer(config).context("failed to create the renderer")?;
    info!("renderer: {:?}", renderer.config());

    let (width, height) = (args.width as usize, args.height as usize);
    let mut color = Buffer::<u32>::try_new(width, height, 0)?;
    let mut depth = Buffer::<f32>::try_new(width, height, 0.0)?;
    let aspect_ratio = width as f32 / height as f32;

    let mut total = std::time::Duration::ZERO;
    for frame in 0..args.frames.max(1) {
        let shader = PhongShader::new(uniforms(frame, aspect_ratio));
        let mut framebuffer = Framebuffer { color_buffer: Some(&mut color), depth_buffer: Some(&mut depth) };
        let started = Instant::now();
        let stats = renderer.render(&model, &shader, &mut framebuffer)?;
        let elapsed = started.elapsed();
        total += elapsed;
        info!(
            "frame {frame}: {:.2}ms, {} rasterized, {} culled, {} fragments shaded",
            elapsed.as_secs_f64() * 1000.0,
            stats.triangles_rasterized,
            stats.triangles_culled(),
            stats.fragments_shaded
        );
    }
    let frames = args.frames.max(1);
    info!("average: {:.2}ms over {frames} frames", total.as_secs_f64() * 1000.0 / frames as f64);

    if let Some(path) = &args.output {
        save_png(path, &color)?;
    }
    Ok(())
}
