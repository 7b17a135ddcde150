use super::*;
use arrayvec::ArrayVec;

/// Pixels are tested in horizontal runs of this many, aligned to multiples of it in x.
pub const BATCH_WIDTH: usize = 8;

/// A candidate must be nearer than the stored depth by more than this to replace it.
pub const DEPTH_EPSILON: f32 = 1e-8;

/// A covered pixel of one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverage {
    pub x: u16,
    pub y: u16,

    /// Screen-space (not perspective-corrected) barycentric weights.
    pub weights: [f32; 3],

    /// NDC depth interpolated with the screen-space weights.
    pub depth: f32,
}

/// Depth test shared by all renderers. Ties within `DEPTH_EPSILON` keep the stored value,
/// so the first triangle submitted wins.
#[inline]
pub fn depth_passes(depth: f32, stored: f32) -> bool {
    depth < stored - DEPTH_EPSILON
}

#[inline]
pub fn interpolate_depth(weights: [f32; 3], z: [f32; 3]) -> f32 {
    weights[0] * z[0] + weights[1] * z[1] + weights[2] * z[2]
}

/// Converts screen-space weights to weights that interpolate linearly in clip space.
/// Falls back to the screen-space weights if the interpolated 1/w is not positive.
#[inline]
pub fn perspective_correct(weights: [f32; 3], inv_w: [f32; 3]) -> [f32; 3] {
    let w0 = weights[0] * inv_w[0];
    let w1 = weights[1] * inv_w[1];
    let w2 = weights[2] * inv_w[2];
    let w_inv = w0 + w1 + w2;
    if !(w_inv > 0.0) || !w_inv.is_finite() {
        return weights;
    }
    [w0 / w_inv, w1 / w_inv, w2 / w_inv]
}

// Normalized edge values of one aligned batch, stepped incrementally from the batch start.
// covers() and rasterize() both go through here so they agree bit for bit.
#[inline]
fn batch_values(edge: &EdgeFunction, batch_x: i32, py: f32) -> [f32; BATCH_WIDTH] {
    let mut raw = edge.raw(batch_x as f32 + 0.5, py);
    let dx = edge.raw_dx();
    let mut values = [0.0; BATCH_WIDTH];
    for v in values.iter_mut() {
        *v = edge.sign() * raw;
        raw += dx;
    }
    values
}

#[inline]
fn batch_start(x: i32) -> i32 {
    x - x.rem_euclid(BATCH_WIDTH as i32)
}

impl TriangleSetup {
    /// Tests the center of pixel (x, y).
    pub fn covers(&self, x: i32, y: i32) -> Option<Coverage> {
        let batch_x = batch_start(x);
        let lane = (x - batch_x) as usize;
        let py = y as f32 + 0.5;
        let e = self.edges.each_ref().map(|edge| batch_values(edge, batch_x, py)[lane]);
        if !(0..3).all(|i| self.edges[i].passes(e[i])) {
            return None;
        }
        let weights = e.map(|e| e * self.inv_area);
        Some(Coverage { x: x as u16, y: y as u16, weights, depth: interpolate_depth(weights, self.z) })
    }

    /// Visits every covered pixel inside `rect` (in addition to the triangle's own bounds),
    /// row by row, handing them over in batches of at most `BATCH_WIDTH`.
    pub fn rasterize(&self, rect: &PixelRect, mut emit: impl FnMut(&[Coverage])) {
        let area = self.bounds.intersect(rect);
        if area.is_empty() {
            return;
        }

        let mut batch = ArrayVec::<Coverage, BATCH_WIDTH>::new();
        for y in area.y0..=area.y1 {
            let py = y as f32 + 0.5;
            let mut batch_x = batch_start(area.x0);
            while batch_x <= area.x1 {
                let e0 = batch_values(&self.edges[0], batch_x, py);
                let e1 = batch_values(&self.edges[1], batch_x, py);
                let e2 = batch_values(&self.edges[2], batch_x, py);
                for lane in 0..BATCH_WIDTH {
                    let x = batch_x + lane as i32;
                    if x < area.x0 || x > area.x1 {
                        continue;
                    }
                    if self.edges[0].passes(e0[lane]) && self.edges[1].passes(e1[lane]) && self.edges[2].passes(e2[lane])
                    {
                        let weights = [e0[lane] * self.inv_area, e1[lane] * self.inv_area, e2[lane] * self.inv_area];
                        batch.push(Coverage {
                            x: x as u16,
                            y: y as u16,
                            weights,
                            depth: interpolate_depth(weights, self.z),
                        });
                    }
                }
                if !batch.is_empty() {
                    emit(&batch);
                    batch.clear();
                }
                batch_x += BATCH_WIDTH as i32;
            }
        }
    }
}
