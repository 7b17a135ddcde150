use super::Buffer;
use std::marker::PhantomData;

/// Mutable view of a rectangular region of a row-major `Buffer`.
///
/// Regions handed out by `Buffer::regions_mut` never overlap, so each one can be
/// written from its own worker thread without any synchronization.
pub struct BufferRegionMut<'a, T> {
    /// X offset of the region inside the buffer, in elements
    pub origin_x: u16,

    /// Y offset of the region inside the buffer, in elements
    pub origin_y: u16,

    /// Logical width of the region
    pub width: u16,

    /// Logical height of the region
    pub height: u16,

    /// Number of elements between the rows of the underlying buffer
    stride: usize,

    /// Pointer to the first element of the region
    ptr: *mut T,

    /// Marker for lifetime
    _marker: PhantomData<&'a mut T>,
}

// Regions are disjoint by construction, see `Buffer::regions_mut`.
unsafe impl<T: Send> Send for BufferRegionMut<'_, T> {}

impl<'a, T: Copy> BufferRegionMut<'a, T> {
    /// Returns a mutable reference to the element at region-local (x, y).
    /// Panics if (x, y) is out of the region's bounds.
    pub fn get(&mut self, x: usize, y: usize) -> &mut T {
        if x >= self.width as usize || y >= self.height as usize {
            panic!(
                "BufferRegionMut index out of bounds: ({}, {}) not in (0..{}, 0..{})",
                x, y, self.width, self.height
            );
        }
        // safe because bounds were checked and the region owns these elements
        unsafe { &mut *self.ptr.add(y * self.stride + x) }
    }

    /// Mutable slice over one row of the region.
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height as usize, "row out of bounds: {} >= {}", y, self.height);
        unsafe { std::slice::from_raw_parts_mut(self.ptr.add(y * self.stride), self.width as usize) }
    }

    /// Copies a tightly packed tile (`src_stride` elements per row) into the region.
    pub fn copy_from(&mut self, src: &[T], src_stride: usize) {
        let width = self.width as usize;
        for y in 0..self.height as usize {
            let start = y * src_stride;
            self.row_mut(y).copy_from_slice(&src[start..start + width]);
        }
    }
}

impl<T> Buffer<T> {
    /// Splits the buffer into disjoint `tile_width` x `tile_height` regions in row-major tile order.
    /// Regions on the right and bottom borders are clipped to the buffer size.
    pub fn regions_mut(&mut self, tile_width: u16, tile_height: u16) -> Vec<BufferRegionMut<'_, T>> {
        assert!(tile_width > 0 && tile_height > 0);
        assert!(self.width <= u16::MAX as usize && self.height <= u16::MAX as usize);
        assert!(self.elems.len() >= self.stride * self.height);
        assert!(self.stride >= self.width);

        let width = self.width as u16;
        let height = self.height as u16;
        let tiles_x = width.div_ceil(tile_width);
        let tiles_y = height.div_ceil(tile_height);
        let stride = self.stride;
        let base = self.elems.as_mut_ptr();

        let mut regions = Vec::with_capacity(tiles_x as usize * tiles_y as usize);
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let origin_x = tx * tile_width;
                let origin_y = ty * tile_height;
                regions.push(BufferRegionMut {
                    origin_x,
                    origin_y,
                    width: (width - origin_x).min(tile_width),
                    height: (height - origin_y).min(tile_height),
                    stride,
                    ptr: unsafe { base.add(origin_y as usize * stride + origin_x as usize) },
                    _marker: PhantomData,
                });
            }
        }
        regions
    }
}
