use super::*;
use crate::math::*;

/// Everything a fragment program gets to see about one covered pixel.
#[derive(Clone, Copy, Debug)]
pub struct Fragment<'a> {
    pub x: u16,
    pub y: u16,

    /// Post-projection depth, NDC z in [-1, 1].
    pub depth: f32,
    pub world_position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
    pub color: Vec4,
    pub material: &'a Material,
}

/// Programmable stages of the pipeline.
///
/// Both functions are called concurrently from the render workers, so implementations
/// read their uniform state without mutating it.
pub trait Shader: Send + Sync {
    /// Model-space vertex in, clip-space vertex out.
    fn vertex(&self, input: &Vertex) -> Vertex;

    /// Color of one fragment, [0, 1] per channel.
    fn fragment(&self, fragment: &Fragment) -> Vec4;
}

/// Transforms positions with a single matrix and outputs the interpolated vertex color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexColorShader {
    pub transform: Mat44,
}

impl VertexColorShader {
    pub fn new(transform: Mat44) -> Self {
        Self { transform }
    }
}

impl Default for VertexColorShader {
    fn default() -> Self {
        Self { transform: Mat44::identity() }
    }
}

impl Shader for VertexColorShader {
    fn vertex(&self, input: &Vertex) -> Vertex {
        Vertex { position: self.transform * input.position, world_position: input.position.xyz(), ..*input }
    }

    fn fragment(&self, fragment: &Fragment) -> Vec4 {
        fragment.color
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    /// Parallel light travelling along `direction`.
    Directional { direction: Vec3, color: Vec3 },

    /// Light emitted from `position` in all directions, without falloff.
    Point { position: Vec3, color: Vec3 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Uniforms {
    pub model: Mat44,
    pub view: Mat44,
    pub projection: Mat44,
    pub camera_position: Vec3,
    pub lights: Vec<Light>,
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            model: Mat44::identity(),
            view: Mat44::identity(),
            projection: Mat44::identity(),
            camera_position: Vec3::new(0.0, 0.0, 0.0),
            lights: vec![Light::Directional { direction: Vec3::new(0.0, 0.0, -1.0), color: Vec3::splat(1.0) }],
        }
    }
}

/// Blinn-Phong lighting: ambient + diffuse * max(N.L, 0) + specular * max(N.H, 0)^shininess,
/// modulated by the vertex color. Material textures replace the matching reflectance.
#[derive(Clone, Debug)]
pub struct PhongShader {
    uniforms: Uniforms,
    model_view_projection: Mat44,
    normal_matrix: Mat33,
}

impl PhongShader {
    pub fn new(uniforms: Uniforms) -> Self {
        let model_view_projection = uniforms.projection * uniforms.view * uniforms.model;
        let normal_matrix = uniforms.model.as_mat33().normal_matrix();
        Self { uniforms, model_view_projection, normal_matrix }
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }
}

fn reflectance(factor: Vec3, texture: &Option<std::sync::Arc<Texture>>, uv: Vec2) -> Vec3 {
    match texture {
        Some(texture) => texture.sample_bilinear(uv).xyz(),
        None => factor,
    }
}

impl Shader for PhongShader {
    fn vertex(&self, input: &Vertex) -> Vertex {
        Vertex {
            position: self.model_view_projection * input.position,
            world_position: (self.uniforms.model * input.position).xyz(),
            normal: (self.normal_matrix * input.normal).normalized(),
            ..*input
        }
    }

    fn fragment(&self, fragment: &Fragment) -> Vec4 {
        let material = fragment.material;
        let uv = fragment.tex_coord;
        let ambient = reflectance(material.ambient, &material.ambient_texture, uv);
        let diffuse = reflectance(material.diffuse, &material.diffuse_texture, uv);
        let specular = reflectance(material.specular, &material.specular_texture, uv);

        let n = fragment.normal.normalized();
        let v = (self.uniforms.camera_position - fragment.world_position).normalized();
        let mut lit = ambient;
        for light in &self.uniforms.lights {
            let (l, light_color) = match *light {
                Light::Directional { direction, color } => (-direction.normalized(), color),
                Light::Point { position, color } => ((position - fragment.world_position).normalized(), color),
            };
            let n_dot_l = dot(n, l);
            if n_dot_l <= 0.0 {
                continue;
            }
            let h = (l + v).normalized();
            let n_dot_h = dot(n, h).max(0.0);
            lit += light_color * (diffuse * n_dot_l + specular * n_dot_h.powf(material.shininess));
        }

        let alpha = match &material.diffuse_texture {
            Some(texture) => texture.sample_bilinear(uv).w,
            None => 1.0,
        };
        let c = fragment.color;
        Vec4::new(lit.x * c.x, lit.y * c.y, lit.z * c.z, alpha * c.w)
    }
}
