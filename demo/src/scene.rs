use anyhow::Result;
use tiler::math::*;
use tiler::render::*;

const CHECKER_SIZE: u32 = 64;
const CHECKER_CELL: u32 = 8;

fn checker_texture(a: [u8; 3], b: [u8; 3]) -> Result<std::sync::Arc<Texture>> {
    let mut texels = Vec::with_capacity((CHECKER_SIZE * CHECKER_SIZE * 3) as usize);
    for y in 0..CHECKER_SIZE {
        for x in 0..CHECKER_SIZE {
            let odd = (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 1;
            texels.extend_from_slice(if odd { &a } else { &b });
        }
    }
    let source = TextureSource { texels: &texels, width: CHECKER_SIZE, height: CHECKER_SIZE, format: TextureFormat::RGB };
    Ok(Texture::new(&source)?)
}

// Outward normal, then the two in-plane axes spanning the face counter-clockwise.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0)),
    (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
    (Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
    (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
    (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
    (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
];

fn push_cube(vertices: &mut Vec<Vertex>, faces: &mut Vec<Face>, center: Vec3, half: f32, material: u32) {
    for (normal, u, v) in CUBE_FACES {
        let base = vertices.len() as u32;
        for (s, t) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = center + (normal + u * s + v * t) * half;
            let uv = Vec2::new((s + 1.0) * 0.5, (1.0 - t) * 0.5);
            vertices.push(Vertex::new(position, normal, uv, Vec4::new(1.0, 1.0, 1.0, 1.0)));
        }
        faces.push(Face::new(base, base + 1, base + 2, material));
        faces.push(Face::new(base, base + 2, base + 3, material));
    }
}

/// A grid of `n` x `n` textured cubes on the XZ plane, fitting into [-1, 1].
pub fn cubes(n: u32) -> Result<Model> {
    let n = n.max(1);
    let warm = Material {
        diffuse: Vec3::splat(1.0),
        diffuse_texture: Some(checker_texture([230, 120, 40], [250, 230, 200])?),
        ..Default::default()
    };
    let cold = Material {
        diffuse: Vec3::splat(1.0),
        specular: Vec3::splat(0.6),
        shininess: 64.0,
        diffuse_texture: Some(checker_texture([40, 90, 200], [200, 220, 250])?),
        ..Default::default()
    };

    let step = 2.0 / n as f32;
    let half = step * 0.3;
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    for i in 0..n {
        for j in 0..n {
            let center = Vec3::new(-1.0 + step * (i as f32 + 0.5), 0.0, -1.0 + step * (j as f32 + 0.5));
            push_cube(&mut vertices, &mut faces, center, half, (i + j) % 2);
        }
    }
    Ok(Model::new(vertices, faces, vec![warm, cold])?)
}
