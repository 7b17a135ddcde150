use super::*;
use crate::RenderError;

/// Render targets borrowed from the caller for one render call.
#[derive(Default)]
pub struct Framebuffer<'a> {
    pub color_buffer: Option<&'a mut Buffer<u32>>,

    /// Optional; receives NDC depth of the visible surface, or the clear depth.
    pub depth_buffer: Option<&'a mut Buffer<f32>>,
}

/// One tile worth of render targets, disjoint from every other tile of the same framebuffer.
pub struct FramebufferTile<'a> {
    pub color_buffer: BufferRegionMut<'a, u32>,
    pub depth_buffer: Option<BufferRegionMut<'a, f32>>,
}

fn check_layout<T>(buffer: &Buffer<T>, what: &'static str) -> Result<(), RenderError> {
    let required = buffer.stride.saturating_mul(buffer.height);
    if buffer.stride < buffer.width || buffer.elems.len() < required {
        return Err(RenderError::BufferTooSmall { what, len: buffer.elems.len(), required });
    }
    Ok(())
}

impl Framebuffer<'_> {
    pub fn width(&self) -> usize {
        self.color_buffer.as_ref().map_or(0, |buffer| buffer.width)
    }

    pub fn height(&self) -> usize {
        self.color_buffer.as_ref().map_or(0, |buffer| buffer.height)
    }

    /// Checks that the targets can be rendered into and returns their size.
    pub fn validate(&self) -> Result<(u16, u16), RenderError> {
        let Some(color) = self.color_buffer.as_ref() else {
            return Err(RenderError::MissingColorBuffer);
        };
        let (width, height) = (color.width, color.height);
        if width == 0 || height == 0 || width > u16::MAX as usize || height > u16::MAX as usize {
            return Err(RenderError::UnsupportedFramebufferSize { width, height });
        }
        check_layout(color, "color")?;

        if let Some(depth) = self.depth_buffer.as_ref() {
            if depth.width != width || depth.height != height {
                return Err(RenderError::SizeMismatch {
                    width,
                    height,
                    depth_width: depth.width,
                    depth_height: depth.height,
                });
            }
            check_layout(depth, "depth")?;
        }
        Ok((width as u16, height as u16))
    }

    /// Splits a validated framebuffer into `tile_size` square tiles in row-major order.
    pub fn tiles(&mut self, tile_size: u16) -> Result<Vec<FramebufferTile<'_>>, RenderError> {
        self.validate()?;
        let Some(color) = self.color_buffer.as_deref_mut() else {
            return Err(RenderError::MissingColorBuffer);
        };
        let color_regions = color.regions_mut(tile_size, tile_size);
        let tiles = match self.depth_buffer.as_deref_mut() {
            Some(depth) => color_regions
                .into_iter()
                .zip(depth.regions_mut(tile_size, tile_size))
                .map(|(color_buffer, depth_buffer)| FramebufferTile { color_buffer, depth_buffer: Some(depth_buffer) })
                .collect(),
            None => color_regions
                .into_iter()
                .map(|color_buffer| FramebufferTile { color_buffer, depth_buffer: None })
                .collect(),
        };
        Ok(tiles)
    }
}
