use super::*;
use crate::RenderError;
use crate::math::*;
use std::sync::Arc;

/// Surface description shared read-only by every worker during a render.
#[derive(Clone, Debug)]
pub struct Material {
    pub shininess: f32,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub ambient_texture: Option<Arc<Texture>>,
    pub diffuse_texture: Option<Arc<Texture>>,
    pub specular_texture: Option<Arc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shininess: 32.0,
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(0.2),
            ambient_texture: None,
            diffuse_texture: None,
            specular_texture: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    /// Indices into `Model::vertices`; the winding decides front/back after projection.
    pub indices: [u32; 3],

    /// Index into `Model::materials`.
    pub material: u32,
}

impl Face {
    pub fn new(i0: u32, i1: u32, i2: u32, material: u32) -> Self {
        Self { indices: [i0, i1, i2], material }
    }
}

/// Indexed triangle list. Immutable once built, so renders can read it from any thread.
#[derive(Clone, Debug, Default)]
pub struct Model {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    materials: Vec<Material>,
}

impl Model {
    /// Builds a model, checking that every face indexes existing vertices.
    ///
    /// Material references are deliberately not checked here: a face pointing at a missing
    /// material still renders, its fragments are dropped and reported at shading time.
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>, materials: Vec<Material>) -> Result<Self, RenderError> {
        for (face_index, face) in faces.iter().enumerate() {
            if let Some(&index) = face.indices.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(RenderError::InvalidFaceIndex { face: face_index, index, count: vertices.len() });
            }
        }
        Ok(Self { vertices, faces, materials })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, index: u32) -> Option<&Material> {
        self.materials.get(index as usize)
    }
}
