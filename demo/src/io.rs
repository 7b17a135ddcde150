use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::path::Path;
use tiler::math::*;
use tiler::render::*;
use wavefront_obj::obj;

fn position(object: &obj::Object, index: usize) -> Result<Vec3> {
    let v = object.vertices.get(index).ok_or_else(|| anyhow!("vertex index {index} out of range"))?;
    Ok(Vec3::new(v.x as f32, v.y as f32, v.z as f32))
}

fn tex_coord(object: &obj::Object, index: Option<usize>) -> Result<Vec2> {
    let Some(index) = index else {
        return Ok(Vec2::default());
    };
    let t = object.tex_vertices.get(index).ok_or_else(|| anyhow!("texture index {index} out of range"))?;
    Ok(Vec2::new(t.u as f32, 1.0 - t.v as f32))
}

fn normal(object: &obj::Object, index: Option<usize>) -> Result<Option<Vec3>> {
    let Some(index) = index else {
        return Ok(None);
    };
    let n = object.normals.get(index).ok_or_else(|| anyhow!("normal index {index} out of range"))?;
    Ok(Some(Vec3::new(n.x as f32, n.y as f32, n.z as f32)))
}

/// Loads the triangles of every object in a Wavefront OBJ file.
///
/// Each distinct material name gets a default material, and the geometry is recentered and
/// scaled to fit into [-1, 1] so that any file can be framed by the same camera.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Model> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let set = obj::parse(text).map_err(|e| anyhow!("{}:{}: {}", path.display(), e.line_number, e.message))?;

    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    let mut materials = Vec::new();
    let mut material_indices = HashMap::new();
    for object in &set.objects {
        for geometry in &object.geometry {
            let name = geometry.material_name.clone().unwrap_or_default();
            let material = *material_indices.entry(name).or_insert_with(|| {
                materials.push(Material::default());
                materials.len() as u32 - 1
            });
            for shape in &geometry.shapes {
                let &obj::Primitive::Triangle(a, b, c) = &shape.primitive else {
                    continue;
                };
                let corners = [a, b, c];
                let positions = [position(object, a.0)?, position(object, b.0)?, position(object, c.0)?];
                let face_normal = cross(positions[1] - positions[0], positions[2] - positions[0]).normalized();
                let base = vertices.len() as u32;
                for (corner, position) in corners.iter().zip(positions) {
                    let normal = normal(object, corner.2)?.unwrap_or(face_normal);
                    let uv = tex_coord(object, corner.1)?;
                    vertices.push(Vertex::new(position, normal, uv, Vec4::new(1.0, 1.0, 1.0, 1.0)));
                }
                faces.push(Face::new(base, base + 1, base + 2, material));
            }
        }
    }
    if faces.is_empty() {
        return Err(anyhow!("{} contains no triangles", path.display()));
    }

    fit_to_unit_cube(&mut vertices);
    log::info!("loaded {}: {} triangles, {} materials", path.display(), faces.len(), materials.len());
    Ok(Model::new(vertices, faces, materials)?)
}

fn fit_to_unit_cube(vertices: &mut [Vertex]) {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for v in vertices.iter() {
        let p = v.position;
        min = Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
        max = Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
    }
    let center = (min + max) * 0.5;
    let extent = max - min;
    let size = extent.x.max(extent.y).max(extent.z);
    let scale = if size > 0.0 { 2.0 / size } else { 1.0 };
    for v in vertices.iter_mut() {
        v.position = ((v.position.xyz() - center) * scale).as_point4();
    }
}
