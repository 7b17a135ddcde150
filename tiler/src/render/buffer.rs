use crate::RenderError;
use bytemuck::{Pod, Zeroable};

/// Row-major 2D storage, used for the caller-owned color and depth targets.
pub struct Buffer<T> {
    /// Width of usable elements in the buffer
    pub width: usize,

    /// Height of usable elements in the buffer
    pub height: usize,

    /// Number of elements between the rows
    pub stride: usize,

    /// The actual elements in the buffer
    pub elems: Vec<T>,
}

impl<T: Copy + Zeroable + Pod> Buffer<T> {
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width;
        let elems = vec![T::zeroed(); stride * height];
        Self { width, height, stride, elems }
    }

    /// Same as `new`, but reports allocation failure instead of aborting.
    pub fn try_new(width: usize, height: usize, value: T) -> Result<Self, RenderError> {
        let elems = try_alloc(width * height, value, "pixel buffer")?;
        Ok(Self { width, height, stride: width, elems })
    }

    pub fn at(&self, x: usize, y: usize) -> T {
        assert!(x < self.width, "x out of bounds: {} >= {}", x, self.width);
        assert!(y < self.height, "y out of bounds: {} >= {}", y, self.height);
        self.elems[y * self.stride + x]
    }

    pub fn at_mut(&mut self, x: usize, y: usize) -> &mut T {
        assert!(x < self.width, "x out of bounds: {} >= {}", x, self.width);
        assert!(y < self.height, "y out of bounds: {} >= {}", y, self.height);
        &mut self.elems[y * self.stride + x]
    }

    pub fn as_u8_slice(&self) -> &[u8] {
        bytemuck::cast_slice(&self.elems)
    }

    pub fn fill(&mut self, with: T) {
        self.elems.fill(with);
    }

    /// Iterates over the usable part of every row, skipping the stride padding.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.elems.chunks(self.stride.max(1)).map(|row| &row[..self.width]).take(self.height)
    }
}

/// Allocates `len` copies of `value` without aborting the process on exhaustion.
pub fn try_alloc<T: Clone>(len: usize, value: T, what: &'static str) -> Result<Vec<T>, RenderError> {
    let mut elems = Vec::new();
    elems
        .try_reserve_exact(len)
        .map_err(|_| RenderError::OutOfMemory { what, bytes: len.saturating_mul(size_of::<T>()) })?;
    elems.resize(len, value);
    Ok(elems)
}
