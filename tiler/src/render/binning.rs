use super::*;
use crate::RenderError;
use crate::render::buffer::try_alloc;

/// Square tiles covering a `width` x `height` target, numbered in row-major order.
/// Tiles on the right and bottom borders are clipped to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u16,
    height: u16,
    tile_size: u16,
    tiles_x: u16,
    tiles_y: u16,
}

impl TileGrid {
    pub fn new(width: u16, height: u16, tile_size: u16) -> Self {
        assert!(tile_size > 0);
        Self { width, height, tile_size, tiles_x: width.div_ceil(tile_size), tiles_y: height.div_ceil(tile_size) }
    }

    pub fn tile_size(&self) -> u16 {
        self.tile_size
    }

    pub fn tiles_x(&self) -> usize {
        self.tiles_x as usize
    }

    pub fn tiles_y(&self) -> usize {
        self.tiles_y as usize
    }

    pub fn len(&self) -> usize {
        self.tiles_x() * self.tiles_y()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tile_rect(&self, index: usize) -> PixelRect {
        let size = self.tile_size as i32;
        let x0 = (index % self.tiles_x()) as i32 * size;
        let y0 = (index / self.tiles_x()) as i32 * size;
        PixelRect {
            x0,
            y0,
            x1: (x0 + size).min(self.width as i32) - 1,
            y1: (y0 + size).min(self.height as i32) - 1,
        }
    }

    /// Tiles overlapped by `rect` as inclusive (x0, y0, x1, y1) tile coordinates; `rect` must be on screen.
    fn overlapped(&self, rect: &PixelRect) -> (usize, usize, usize, usize) {
        let size = self.tile_size as usize;
        let last_x = self.tiles_x() - 1;
        let last_y = self.tiles_y() - 1;
        (
            (rect.x0 as usize / size).min(last_x),
            (rect.y0 as usize / size).min(last_y),
            (rect.x1 as usize / size).min(last_x),
            (rect.y1 as usize / size).min(last_y),
        )
    }
}

/// Per-tile lists of triangle references, stored back to back in one allocation.
///
/// A reference is the index of the triangle in the setup list handed to `build`, which carries
/// its vertex indices and material. Within a bin, references keep submission order.
#[derive(Debug, Default)]
pub struct TileBins {
    offsets: Vec<u32>,
    entries: Vec<u32>,
}

impl TileBins {
    /// Two passes over the triangles: count references per tile, then fill the exactly sized storage.
    pub fn build(grid: &TileGrid, triangles: &[TriangleSetup]) -> Result<TileBins, RenderError> {
        let mut offsets = try_alloc(grid.len() + 1, 0u32, "tile bin offsets")?;

        for triangle in triangles {
            let (tx0, ty0, tx1, ty1) = grid.overlapped(&triangle.bounds);
            for ty in ty0..=ty1 {
                for tx in tx0..=tx1 {
                    offsets[ty * grid.tiles_x() + tx + 1] += 1;
                }
            }
        }
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }

        let total = offsets[grid.len()] as usize;
        let mut entries = try_alloc(total, 0u32, "tile bins")?;
        let mut cursors = try_alloc(grid.len(), 0u32, "tile bin cursors")?;
        cursors.copy_from_slice(&offsets[..grid.len()]);
        for (index, triangle) in triangles.iter().enumerate() {
            let (tx0, ty0, tx1, ty1) = grid.overlapped(&triangle.bounds);
            for ty in ty0..=ty1 {
                for tx in tx0..=tx1 {
                    let cursor = &mut cursors[ty * grid.tiles_x() + tx];
                    entries[*cursor as usize] = index as u32;
                    *cursor += 1;
                }
            }
        }

        log::debug!("binned {} triangles into {} tiles, {} references", triangles.len(), grid.len(), total);
        Ok(TileBins { offsets, entries })
    }

    pub fn bin(&self, tile: usize) -> &[u32] {
        &self.entries[self.offsets[tile] as usize..self.offsets[tile + 1] as usize]
    }

    /// Number of triangle references over all tiles.
    pub fn total(&self) -> usize {
        self.entries.len()
    }
}
