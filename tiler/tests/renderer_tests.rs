use tiler::math::*;
use tiler::render::*;
use tiler::RenderError;

const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
const GREEN: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);
const BLUE: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use rstest::rstest;
    use std::path::Path;

    struct Target {
        color: Buffer<u32>,
        depth: Buffer<f32>,
    }

    fn config(kind: RendererKind) -> RendererConfig {
        RendererConfig { kind, threads: Some(3), tile_size: 16, cull_mode: CullMode::None, ..Default::default() }
    }

    fn clear_color() -> u32 {
        RendererConfig::default().clear_color
    }

    // Vertex in NDC, the identity shader keeps it there.
    fn ndc(x: f32, y: f32, z: f32, color: Vec4) -> Vertex {
        Vertex::new(Vec3::new(x, y, z), Vec3::default(), Vec2::default(), color)
    }

    // Vertex at a pixel position of a 64x64 target.
    fn screen(x: f32, y: f32, z: f32, color: Vec4) -> Vertex {
        ndc((x - 32.0) / 32.0, (32.0 - y) / 32.0, z, color)
    }

    fn flat_triangles(triangles: &[([(f32, f32); 3], f32, Vec4)], material: u32) -> Model {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for (points, z, color) in triangles {
            let base = vertices.len() as u32;
            vertices.extend(points.iter().map(|&(x, y)| screen(x, y, *z, *color)));
            faces.push(Face::new(base, base + 1, base + 2, material));
        }
        Model::new(vertices, faces, vec![Material::default()]).unwrap()
    }

    fn render_with(
        renderer: &mut dyn Renderer,
        model: &Model,
        shader: &dyn Shader,
        size: (usize, usize),
    ) -> (Target, RenderStats) {
        let mut target = Target {
            color: Buffer::try_new(size.0, size.1, 0xDEADBEEF).unwrap(),
            depth: Buffer::try_new(size.0, size.1, -7.0).unwrap(),
        };
        let stats = renderer
            .render(
                model,
                shader,
                &mut Framebuffer { color_buffer: Some(&mut target.color), depth_buffer: Some(&mut target.depth) },
            )
            .unwrap();
        (target, stats)
    }

    fn render(config: RendererConfig, model: &Model) -> (Target, RenderStats) {
        let mut renderer = create_renderer(config).unwrap();
        render_with(renderer.as_mut(), model, &VertexColorShader::default(), (64, 64))
    }

    fn save_actual(result: &Buffer<u32>, name: &str) {
        let path = Path::new(env!("CARGO_TARGET_TMPDIR")).join(format!("{name}.actual.png"));
        let raw_rgba: Vec<u8> = result.elems.iter().flat_map(|&pixel| pixel.to_le_bytes()).collect();
        let img: ImageBuffer<Rgba<u8>, _> =
            ImageBuffer::from_raw(result.width as u32, result.height as u32, raw_rgba).unwrap();
        img.save(&path).unwrap();
        eprintln!("saved {}", path.display());
    }

    fn assert_same_image(actual: &Buffer<u32>, expected: &Buffer<u32>, name: &str) {
        let equal = actual.elems == expected.elems;
        if !equal {
            save_actual(actual, name);
            save_actual(expected, &format!("{name}.expected"));
        }
        assert!(equal, "{name}: images differ");
    }

    fn count_not(buffer: &Buffer<u32>, value: u32) -> usize {
        buffer.elems.iter().filter(|&&pixel| pixel != value).count()
    }

    #[rstest]
    fn single_triangle(#[values(RendererKind::PerTriangle, RendererKind::Tiled, RendererKind::TiledDeferred)] kind: RendererKind) {
        let model = flat_triangles(&[([(10.0, 10.0), (20.0, 10.0), (10.0, 20.0)], 0.5, RED)], 0);
        let (target, stats) = render(config(kind), &model);

        let red = RGBA::new(255, 0, 0, 255).to_u32();
        for y in 0..64 {
            for x in 0..64 {
                // the hypotenuse is a bottom-right edge, pixel centers on it stay outside
                let inside = x >= 10 && y >= 10 && x + y <= 28;
                let expected = if inside { red } else { clear_color() };
                assert_eq!(target.color.at(x, y), expected, "pixel ({x}, {y})");
                if inside {
                    assert!((target.depth.at(x, y) - 0.5).abs() < 1e-6);
                } else {
                    assert_eq!(target.depth.at(x, y), 1.0);
                }
            }
        }
        assert_eq!(stats.triangles_submitted, 1);
        assert_eq!(stats.triangles_rasterized, 1);
        assert_eq!(stats.fragments_dropped, 0);
    }

    #[rstest]
    fn occlusion_ignores_submission_order(
        #[values(RendererKind::PerTriangle, RendererKind::Tiled, RendererKind::TiledDeferred)] kind: RendererKind,
        #[values(true, false)] near_first: bool,
        #[values(true, false)] early_z: bool,
    ) {
        let footprint = [(4.0, 4.0), (60.0, 8.0), (12.0, 58.0)];
        let near = (footprint, 0.2, GREEN);
        let far = (footprint, 0.8, BLUE);
        let triangles = if near_first { [near, far] } else { [far, near] };
        let model = flat_triangles(&triangles, 0);
        let (target, stats) = render(RendererConfig { early_z, ..config(kind) }, &model);

        let green = RGBA::new(0, 255, 0, 255).to_u32();
        let covered = count_not(&target.color, clear_color());
        assert!(covered > 1000);
        assert!(target.color.elems.iter().all(|&pixel| pixel == green || pixel == clear_color()));
        assert_eq!(target.color.at(20, 20), green);
        assert!((target.depth.at(20, 20) - 0.2).abs() < 1e-6);
        assert_eq!(stats.triangles_rasterized, 2);
    }

    #[rstest]
    fn offscreen_triangles_leave_target_clear(
        #[values(RendererKind::PerTriangle, RendererKind::Tiled, RendererKind::TiledDeferred)] kind: RendererKind,
    ) {
        let beyond_right = [ndc(1.2, 0.0, 0.0, RED), ndc(1.8, 0.0, 0.0, RED), ndc(1.2, 0.5, 0.0, RED)];
        let touching_right = [ndc(1.0, 0.0, 0.0, RED), ndc(1.5, 0.0, 0.0, RED), ndc(1.0, 0.5, 0.0, RED)];
        let vertices: Vec<Vertex> = beyond_right.into_iter().chain(touching_right).collect();
        let model = Model::new(vertices, vec![Face::new(0, 1, 2, 0), Face::new(3, 4, 5, 0)], vec![]).unwrap();
        let (target, stats) = render(config(kind), &model);

        assert!(target.color.elems.iter().all(|&pixel| pixel == clear_color()));
        assert!(target.depth.elems.iter().all(|&depth| depth == 1.0));
        assert_eq!(stats.culled_frustum, 1);
        assert_eq!(stats.culled_offscreen, 1);
        assert_eq!(stats.triangles_rasterized, 0);
        assert_eq!(stats.fragments_shaded, 0);
    }

    // Unit cube faces, counter-clockwise when seen from outside.
    fn cube(transform: Mat44, colors: [Vec4; 2], vertices: &mut Vec<Vertex>, faces: &mut Vec<Face>) {
        #[rustfmt::skip]
        let quads = [
            [(-1.0, -1.0, 1.0), (1.0, -1.0, 1.0), (1.0, 1.0, 1.0), (-1.0, 1.0, 1.0)],
            [(1.0, -1.0, -1.0), (-1.0, -1.0, -1.0), (-1.0, 1.0, -1.0), (1.0, 1.0, -1.0)],
            [(1.0, -1.0, 1.0), (1.0, -1.0, -1.0), (1.0, 1.0, -1.0), (1.0, 1.0, 1.0)],
            [(-1.0, -1.0, -1.0), (-1.0, -1.0, 1.0), (-1.0, 1.0, 1.0), (-1.0, 1.0, -1.0)],
            [(-1.0, 1.0, 1.0), (1.0, 1.0, 1.0), (1.0, 1.0, -1.0), (-1.0, 1.0, -1.0)],
            [(-1.0, -1.0, -1.0), (1.0, -1.0, -1.0), (1.0, -1.0, 1.0), (-1.0, -1.0, 1.0)],
        ];
        for quad in quads {
            let base = vertices.len() as u32;
            for (i, (x, y, z)) in quad.into_iter().enumerate() {
                let position = (transform * Vec4::new(x, y, z, 1.0)).xyz();
                vertices.push(Vertex::new(position, Vec3::default(), Vec2::default(), colors[i % 2]));
            }
            faces.push(Face::new(base, base + 1, base + 2, 0));
            faces.push(Face::new(base, base + 2, base + 3, 0));
        }
    }

    // Four rotated cubes far enough apart not to intersect, seen in perspective.
    fn cubes_scene() -> (Model, VertexColorShader) {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        let placements = [
            (Vec3::new(0.0, 0.0, 0.0), 0.4, [RED, GREEN]),
            (Vec3::new(1.3, 0.5, -2.5), 0.7, [BLUE, GREEN]),
            (Vec3::new(-1.5, -0.6, 2.0), 1.1, [GREEN, RED]),
            (Vec3::new(-1.8, 1.3, -3.5), 2.3, [BLUE, RED]),
        ];
        for (offset, angle, colors) in placements {
            let transform = Mat44::translate(offset)
                * Mat44::rotate_zx(angle)
                * Mat44::rotate_yz(angle * 0.5)
                * Mat44::scale_uniform(0.7);
            cube(transform, colors, &mut vertices, &mut faces);
        }
        let model = Model::new(vertices, faces, vec![Material::default()]).unwrap();
        let view = Mat44::look_at(Vec3::new(0.0, 0.5, 5.0), Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let projection = Mat44::perspective(0.5, 20.0, std::f32::consts::FRAC_PI_3, 4.0 / 3.0);
        (model, VertexColorShader::new(projection * view))
    }

    #[rstest]
    #[case(RendererConfig { kind: RendererKind::Tiled, early_z: false, ..Default::default() }, "tiled_late_z")]
    #[case(RendererConfig { kind: RendererKind::TiledDeferred, ..Default::default() }, "tiled_deferred")]
    #[case(RendererConfig { kind: RendererKind::PerTriangle, threads: Some(4), ..Default::default() }, "per_triangle")]
    #[case(RendererConfig { kind: RendererKind::Tiled, tile_size: 24, threads: Some(2), ..Default::default() }, "tiled_24")]
    #[case(RendererConfig { kind: RendererKind::TiledDeferred, tile_size: 100, ..Default::default() }, "deferred_100")]
    fn variants_agree(#[case] config: RendererConfig, #[case] name: &str) {
        let (model, shader) = cubes_scene();
        let size = (160, 120);
        let mut reference = create_renderer(RendererConfig::default()).unwrap();
        let (expected, expected_stats) = render_with(reference.as_mut(), &model, &shader, size);
        let mut renderer = create_renderer(config).unwrap();
        let (actual, stats) = render_with(renderer.as_mut(), &model, &shader, size);

        assert!(count_not(&expected.color, clear_color()) > 1500);
        assert_same_image(&actual.color, &expected.color, name);
        assert_eq!(actual.depth.elems, expected.depth.elems);
        assert_eq!(stats.triangles_rasterized, expected_stats.triangles_rasterized);
        assert!(stats.culled_backface > 0);
    }

    #[rstest]
    fn rendering_is_idempotent(
        #[values(RendererKind::PerTriangle, RendererKind::Tiled, RendererKind::TiledDeferred)] kind: RendererKind,
    ) {
        let (model, shader) = cubes_scene();
        let mut renderer = create_renderer(RendererConfig { kind, ..Default::default() }).unwrap();
        let (first, first_stats) = render_with(renderer.as_mut(), &model, &shader, (96, 80));
        let (second, second_stats) = render_with(renderer.as_mut(), &model, &shader, (96, 80));
        assert_same_image(&second.color, &first.color, "idempotent");
        assert_eq!(first.depth.elems, second.depth.elems);
        assert_eq!(first_stats, second_stats);
    }

    #[rstest]
    #[case(RendererKind::TiledDeferred, true, true, 1)]
    #[case(RendererKind::TiledDeferred, true, false, 1)]
    #[case(RendererKind::Tiled, false, true, 5)]
    #[case(RendererKind::Tiled, false, false, 5)]
    #[case(RendererKind::Tiled, true, true, 5)]
    #[case(RendererKind::Tiled, true, false, 1)]
    #[case(RendererKind::PerTriangle, true, true, 5)]
    fn shading_invocations(
        #[case] kind: RendererKind,
        #[case] early_z: bool,
        #[case] back_to_front: bool,
        #[case] shaded_per_pixel: u64,
    ) {
        let footprint = [(2.0, 2.0), (62.0, 2.0), (2.0, 62.0)];
        let mut layers: Vec<_> = [0.9, 0.7, 0.5, 0.3, 0.1].into_iter().map(|z| (footprint, z, RED)).collect();
        if !back_to_front {
            layers.reverse();
        }
        let model = flat_triangles(&layers, 0);
        let config = RendererConfig { early_z, threads: Some(1), ..config(kind) };
        let (target, stats) = render(config, &model);

        let visible = count_not(&target.color, clear_color()) as u64;
        assert!(visible > 1500);
        assert_eq!(stats.fragments_shaded, visible * shaded_per_pixel);
    }

    #[rstest]
    fn missing_material_drops_fragments(
        #[values(RendererKind::PerTriangle, RendererKind::Tiled, RendererKind::TiledDeferred)] kind: RendererKind,
    ) {
        let vertices = vec![
            screen(4.0, 4.0, 0.2, GREEN),
            screen(40.0, 4.0, 0.2, GREEN),
            screen(4.0, 40.0, 0.2, GREEN),
            screen(4.0, 4.0, 0.6, BLUE),
            screen(40.0, 4.0, 0.6, BLUE),
            screen(4.0, 40.0, 0.6, BLUE),
        ];
        // the near triangle references material 3, which doesn't exist
        let faces = vec![Face::new(0, 1, 2, 3), Face::new(3, 4, 5, 0)];
        let model = Model::new(vertices, faces, vec![Material::default()]).unwrap();
        let (target, stats) = render(config(kind), &model);

        let blue = RGBA::new(0, 0, 255, 255).to_u32();
        assert!(stats.fragments_dropped > 0);
        assert_eq!(target.color.at(10, 10), blue);
        assert!(target.color.elems.iter().all(|&pixel| pixel == blue || pixel == clear_color()));
    }

    #[rstest]
    fn back_faces_are_culled(
        #[values(RendererKind::PerTriangle, RendererKind::Tiled, RendererKind::TiledDeferred)] kind: RendererKind,
    ) {
        // clockwise on screen
        let model = flat_triangles(&[([(10.0, 10.0), (20.0, 10.0), (10.0, 20.0)], 0.5, RED)], 0);
        let (target, stats) = render(RendererConfig { cull_mode: CullMode::CW, ..config(kind) }, &model);
        assert_eq!(stats.culled_backface, 1);
        assert_eq!(count_not(&target.color, clear_color()), 0);
    }

    #[test]
    fn wireframe_outlines_triangles() {
        let model = flat_triangles(&[([(2.0, 2.0), (62.0, 2.0), (2.0, 62.0)], 0.5, RED)], 0);
        let white = RGBA::new(255, 255, 255, 255).to_u32();
        let (target, _) = render(RendererConfig { wireframe: Some(white), ..config(RendererKind::Tiled) }, &model);
        assert_eq!(target.color.at(2, 30), white);
        assert_eq!(target.color.at(30, 2), white);
        assert_eq!(target.color.at(20, 20), RGBA::new(255, 0, 0, 255).to_u32());
    }

    #[test]
    fn phong_scene_renders_lit_pixels() {
        let (model, _) = cubes_scene();
        let shader = PhongShader::new(Uniforms {
            view: Mat44::look_at(Vec3::new(0.0, 0.5, 5.0), Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            projection: Mat44::perspective(0.5, 20.0, std::f32::consts::FRAC_PI_3, 4.0 / 3.0),
            camera_position: Vec3::new(0.0, 0.5, 5.0),
            lights: vec![Light::Point { position: Vec3::new(2.0, 3.0, 4.0), color: Vec3::splat(1.0) }],
            ..Default::default()
        });
        let mut renderer = create_renderer(RendererConfig::default()).unwrap();
        let (target, stats) = render_with(renderer.as_mut(), &model, &shader, (160, 120));
        assert!(stats.fragments_shaded > 0);
        assert!(count_not(&target.color, clear_color()) > 1500);
    }

    #[test]
    fn framebuffer_errors() {
        let model = flat_triangles(&[([(10.0, 10.0), (20.0, 10.0), (10.0, 20.0)], 0.5, RED)], 0);
        let shader = VertexColorShader::default();
        let mut renderer = create_renderer(config(RendererKind::Tiled)).unwrap();

        let result = renderer.render(&model, &shader, &mut Framebuffer::default());
        assert_eq!(result, Err(RenderError::MissingColorBuffer));

        let mut color = Buffer::<u32>::new(64, 64);
        let mut depth = Buffer::<f32>::new(32, 64);
        let mut framebuffer = Framebuffer { color_buffer: Some(&mut color), depth_buffer: Some(&mut depth) };
        let result = renderer.render(&model, &shader, &mut framebuffer);
        assert!(matches!(result, Err(RenderError::SizeMismatch { .. })));
    }

    #[test]
    fn color_only_framebuffer() {
        let model = flat_triangles(&[([(10.0, 10.0), (20.0, 10.0), (10.0, 20.0)], 0.5, RED)], 0);
        for kind in [RendererKind::PerTriangle, RendererKind::Tiled, RendererKind::TiledDeferred] {
            let mut renderer = create_renderer(config(kind)).unwrap();
            let mut color = Buffer::<u32>::new(64, 64);
            let mut framebuffer = Framebuffer { color_buffer: Some(&mut color), depth_buffer: None };
            renderer.render(&model, &VertexColorShader::default(), &mut framebuffer).unwrap();
            assert_eq!(color.at(12, 12), RGBA::new(255, 0, 0, 255).to_u32());
            assert_eq!(color.at(40, 40), clear_color());
        }
    }

    #[rstest]
    #[case(RendererConfig { tile_size: 0, ..Default::default() })]
    #[case(RendererConfig { tile_size: 4096, ..Default::default() })]
    #[case(RendererConfig { threads: Some(0), ..Default::default() })]
    fn invalid_configs_are_rejected(#[case] config: RendererConfig) {
        assert!(matches!(create_renderer(config).err(), Some(RenderError::InvalidConfig(_))));
    }

    #[rstest]
    fn equal_depth_keeps_first_submitted(
        #[values(RendererKind::PerTriangle, RendererKind::Tiled, RendererKind::TiledDeferred)] kind: RendererKind,
        #[values(1, 2, 4)] threads: usize,
    ) {
        let footprint = [(6.0, 6.0), (58.0, 10.0), (14.0, 56.0)];
        let mut triangles = vec![(footprint, 0.4, RED)];
        triangles.extend(std::iter::repeat_n((footprint, 0.4, GREEN), 4));
        let model = flat_triangles(&triangles, 0);
        let (target, stats) = render(RendererConfig { threads: Some(threads), ..config(kind) }, &model);

        let red = RGBA::new(255, 0, 0, 255).to_u32();
        assert_eq!(target.color.at(20, 20), red);
        assert!(count_not(&target.color, clear_color()) > 1000);
        assert!(target.color.elems.iter().all(|&pixel| pixel == red || pixel == clear_color()));
        assert_eq!(stats.triangles_rasterized, 5);
    }

    fn clip(x: f32, y: f32, z: f32, w: f32) -> Vertex {
        Vertex { position: Vec4::new(x, y, z, w), color: BLUE, ..Default::default() }
    }

    #[test]
    fn degenerate_clip_positions_render_identically() {
        let vertices = vec![
            // one vertex behind the eye
            clip(-0.5, -0.5, 0.0, 1.0),
            clip(0.5, -0.5, 0.0, 1.0),
            clip(0.0, 0.5, 0.0, -1.0),
            // w close to zero
            clip(-0.5, 0.5, 0.0, 1.0),
            clip(0.5, 0.5, 0.0, 1e-30),
            clip(0.0, -0.5, 0.0, 1.0),
            // infinite w
            clip(-0.8, -0.8, 0.0, 1.0),
            clip(0.8, -0.8, 0.0, f32::INFINITY),
            clip(0.0, 0.8, 0.0, 1.0),
            // NaN coordinate
            clip(f32::NAN, 0.0, 0.0, 1.0),
            clip(0.5, 0.0, 0.0, 1.0),
            clip(0.0, 0.5, 0.0, 1.0),
            // huge coordinates
            clip(-1e30, -1e30, 0.0, 1.0),
            clip(1e30, -1e30, 0.0, 1.0),
            clip(0.0, 1e30, 0.0, 1.0),
            // a regular triangle
            Vertex { color: RED, ..clip(-0.9, -0.9, 0.5, 1.0) },
            Vertex { color: RED, ..clip(-0.1, -0.9, 0.5, 1.0) },
            Vertex { color: RED, ..clip(-0.9, -0.1, 0.5, 1.0) },
        ];
        let faces = (0..6).map(|i| Face::new(i * 3, i * 3 + 1, i * 3 + 2, 0)).collect();
        let model = Model::new(vertices, faces, vec![Material::default()]).unwrap();

        let render_padded = |kind: RendererKind| {
            let (width, height, stride) = (50, 37, 53);
            let mut color = Buffer { width, height, stride, elems: vec![0xDEADBEEFu32; stride * height] };
            let mut depth = Buffer { width, height, stride, elems: vec![-7.0f32; stride * height] };
            let mut renderer = create_renderer(config(kind)).unwrap();
            let mut framebuffer = Framebuffer { color_buffer: Some(&mut color), depth_buffer: Some(&mut depth) };
            renderer.render(&model, &VertexColorShader::default(), &mut framebuffer).unwrap();
            (color, depth)
        };

        let (expected_color, expected_depth) = render_padded(RendererKind::PerTriangle);
        assert!(expected_depth.rows().flatten().all(|depth| !depth.is_nan()));
        assert!(expected_color.rows().flatten().any(|&pixel| pixel == RGBA::new(255, 0, 0, 255).to_u32()));
        for kind in [RendererKind::Tiled, RendererKind::TiledDeferred] {
            let (color, depth) = render_padded(kind);
            assert_same_image(&color, &expected_color, &format!("degenerate_clip_positions_{kind:?}"));
            assert!(depth.elems.iter().zip(&expected_depth.elems).all(|(a, b)| a.to_bits() == b.to_bits()));
        }
    }
}
