use super::*;
use crate::math::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling, all triangles are rendered.
    None,

    /// Cull clockwise-wound triangles (positive screen-space cross product).
    CW,

    /// Cull counter-clockwise-wound triangles.
    CCW,
}

/// Twice the screen-space area, in pixels, below which a triangle is considered degenerate.
pub const DEGENERATE_AREA_X_2: f32 = 1e-6;

/// Reason a triangle never reaches rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Culled {
    Frustum,
    BackFace,
    Degenerate,
    OffScreen,
}

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub fn is_empty(&self) -> bool {
        self.x0 > self.x1 || self.y0 > self.y1
    }

    pub fn intersect(&self, other: &PixelRect) -> PixelRect {
        PixelRect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    pub fn width(&self) -> usize {
        if self.is_empty() { 0 } else { (self.x1 - self.x0 + 1) as usize }
    }

    pub fn height(&self) -> usize {
        if self.is_empty() { 0 } else { (self.y1 - self.y0 + 1) as usize }
    }
}

/// Half-plane test for one triangle edge, positive inside the triangle.
///
/// The edge is stored with its endpoints in a canonical order, so two triangles sharing an
/// edge evaluate bit-identical raw values that differ only by `sign`. Together with the
/// top-left rule this leaves no gaps and no double coverage along shared edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeFunction {
    origin: Vec2,
    delta: Vec2,
    sign: f32,
    top_left: bool,
}

impl EdgeFunction {
    /// Edge from `a` to `b` of a triangle whose doubled signed area has the sign `orientation`.
    pub fn new(a: Vec2, b: Vec2, orientation: f32) -> Self {
        let (origin, end, flip) = if (a.x, a.y) <= (b.x, b.y) { (a, b, 1.0) } else { (b, a, -1.0) };
        let delta = end - origin;
        let sign = flip * orientation;

        // inward-pointing gradient of the normalized function
        let gx = -delta.y * sign;
        let gy = delta.x * sign;
        let top_left = gx > 0.0 || (gx == 0.0 && gy > 0.0);
        Self { origin, delta, sign, top_left }
    }

    /// Value in the canonical orientation, before applying `sign`.
    pub fn raw(&self, x: f32, y: f32) -> f32 {
        self.delta.x * (y - self.origin.y) - self.delta.y * (x - self.origin.x)
    }

    /// d(raw)/dx
    pub fn raw_dx(&self) -> f32 {
        -self.delta.y
    }

    pub fn sign(&self) -> f32 {
        self.sign
    }

    pub fn eval(&self, x: f32, y: f32) -> f32 {
        self.sign * self.raw(x, y)
    }

    pub fn is_top_left(&self) -> bool {
        self.top_left
    }

    /// Top-left fill rule: points exactly on the edge belong to the triangle only for top and left edges.
    pub fn passes(&self, value: f32) -> bool {
        value > 0.0 || (value == 0.0 && self.top_left)
    }
}

/// A triangle that survived culling, ready for coverage tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleSetup {
    /// Index of the source face in the model.
    pub face: u32,
    pub indices: [u32; 3],
    pub material: u32,

    /// Screen-space vertex positions.
    pub p: [Vec2; 3],

    /// NDC depth per vertex.
    pub z: [f32; 3],
    pub inv_w: [f32; 3],

    /// Twice the signed screen-space area.
    pub area_x_2: f32,
    pub inv_area: f32,

    /// E12, E20, E01: edge `i` is opposite to vertex `i` and yields its barycentric weight.
    pub edges: [EdgeFunction; 3],

    /// Pixel bounds clamped to the target.
    pub bounds: PixelRect,
}

/// True if all three clip-space vertices are outside the same clip plane.
pub fn outside_frustum(clip: &[Vec4; 3]) -> bool {
    let all = |outside: fn(&Vec4) -> bool| clip.iter().all(outside);
    all(|v| v.x > v.w)
        || all(|v| v.x < -v.w)
        || all(|v| v.y > v.w)
        || all(|v| v.y < -v.w)
        || all(|v| v.z > v.w)
        || all(|v| v.z < -v.w)
}

impl TriangleSetup {
    /// Builds the triangle for `face` from screen-space `vertices` of a `width` x `height` target.
    /// Face indices must be valid, which `Model::new` guarantees.
    pub fn new(
        face_index: u32,
        face: &Face,
        vertices: &[Vertex],
        cull_mode: CullMode,
        width: u16,
        height: u16,
    ) -> Result<TriangleSetup, Culled> {
        let v = face.indices.map(|i| &vertices[i as usize]);

        if outside_frustum(&[v[0].clip_position, v[1].clip_position, v[2].clip_position]) {
            return Err(Culled::Frustum);
        }

        let p = v.map(|v| v.position.xy());
        let area_x_2 = cross2(p[1] - p[0], p[2] - p[0]);
        match cull_mode {
            CullMode::CW if area_x_2 > 0.0 => return Err(Culled::BackFace),
            CullMode::CCW if area_x_2 < 0.0 => return Err(Culled::BackFace),
            _ => {}
        }
        if !(area_x_2.abs() >= DEGENERATE_AREA_X_2) || !area_x_2.is_finite() {
            return Err(Culled::Degenerate);
        }

        let min_x = p[0].x.min(p[1].x).min(p[2].x);
        let max_x = p[0].x.max(p[1].x).max(p[2].x);
        let min_y = p[0].y.min(p[1].y).min(p[2].y);
        let max_y = p[0].y.max(p[1].y).max(p[2].y);
        // clamp in float space first, huge coordinates would saturate the casts anyway
        let bounds = PixelRect {
            x0: min_x.floor().max(0.0) as i32,
            y0: min_y.floor().max(0.0) as i32,
            x1: max_x.floor().min(width as f32 - 1.0) as i32,
            y1: max_y.floor().min(height as f32 - 1.0) as i32,
        };
        if bounds.is_empty() {
            return Err(Culled::OffScreen);
        }

        let orientation = area_x_2.signum();
        Ok(TriangleSetup {
            face: face_index,
            indices: face.indices,
            material: face.material,
            p,
            z: v.map(|v| v.position.z),
            inv_w: v.map(|v| v.inv_w()),
            area_x_2,
            inv_area: 1.0 / area_x_2.abs(),
            edges: [
                EdgeFunction::new(p[1], p[2], orientation),
                EdgeFunction::new(p[2], p[0], orientation),
                EdgeFunction::new(p[0], p[1], orientation),
            ],
            bounds,
        })
    }
}
