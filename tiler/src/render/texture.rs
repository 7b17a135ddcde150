use super::RGBA;
use crate::RenderError;
use crate::math::*;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Grayscale,
    RGB,
    RGBA,
}

pub struct TextureSource<'a> {
    pub texels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// RGBA8 texture with repeat addressing. Texel (0, 0) is the top-left corner, at uv = (0, 0).
#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<RGBA>,
}

impl Texture {
    pub fn new(source: &TextureSource) -> Result<Arc<Self>, RenderError> {
        if source.width == 0 || source.height == 0 {
            return Err(RenderError::InvalidTexture(format!("empty {}x{} texture", source.width, source.height)));
        }
        let bpp = bytes_per_pixel(source.format);
        let expected = source.width as usize * source.height as usize * bpp;
        if source.texels.len() != expected {
            return Err(RenderError::InvalidTexture(format!(
                "{}x{} {:?} texture needs {} bytes, got {}",
                source.width,
                source.height,
                source.format,
                expected,
                source.texels.len()
            )));
        }

        let texels = source
            .texels
            .chunks_exact(bpp)
            .map(|t| match source.format {
                TextureFormat::Grayscale => RGBA::new(t[0], t[0], t[0], 255),
                TextureFormat::RGB => RGBA::new(t[0], t[1], t[2], 255),
                TextureFormat::RGBA => RGBA::new(t[0], t[1], t[2], t[3]),
            })
            .collect();

        Ok(Arc::new(Texture { width: source.width, height: source.height, texels }))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn texel(&self, x: i64, y: i64) -> Vec4 {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.texels[y * self.width as usize + x].to_vec4()
    }

    pub fn sample_nearest(&self, uv: Vec2) -> Vec4 {
        let tx = (uv.x * self.width as f32).floor();
        let ty = (uv.y * self.height as f32).floor();
        if !tx.is_finite() || !ty.is_finite() {
            return self.texel(0, 0);
        }
        self.texel(tx as i64, ty as i64)
    }

    pub fn sample_bilinear(&self, uv: Vec2) -> Vec4 {
        let tx = uv.x * self.width as f32 - 0.5;
        let ty = uv.y * self.height as f32 - 0.5;
        if !tx.is_finite() || !ty.is_finite() {
            return self.texel(0, 0);
        }
        let x0 = tx.floor();
        let y0 = ty.floor();
        let fx = tx - x0;
        let fy = ty - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);
        let top = self.texel(x0, y0) * (1.0 - fx) + self.texel(x0 + 1, y0) * fx;
        let bottom = self.texel(x0, y0 + 1) * (1.0 - fx) + self.texel(x0 + 1, y0 + 1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}

fn bytes_per_pixel(fmt: TextureFormat) -> usize {
    match fmt {
        TextureFormat::RGBA => 4,
        TextureFormat::RGB => 3,
        TextureFormat::Grayscale => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_2x2() -> Arc<Texture> {
        let texels = [0u8, 255, 255, 0];
        Texture::new(&TextureSource { texels: &texels, width: 2, height: 2, format: TextureFormat::Grayscale }).unwrap()
    }

    #[test]
    fn bake_formats() {
        let rgb = [10u8, 20, 30];
        let texture = Texture::new(&TextureSource { texels: &rgb, width: 1, height: 1, format: TextureFormat::RGB }).unwrap();
        assert_eq!(texture.texels, vec![RGBA::new(10, 20, 30, 255)]);

        let gray = [42u8];
        let texture =
            Texture::new(&TextureSource { texels: &gray, width: 1, height: 1, format: TextureFormat::Grayscale })
                .unwrap();
        assert_eq!(texture.texels, vec![RGBA::new(42, 42, 42, 255)]);
    }

    #[test]
    fn rejects_mismatched_source() {
        let texels = [0u8; 5];
        let result = Texture::new(&TextureSource { texels: &texels, width: 2, height: 1, format: TextureFormat::RGB });
        assert!(matches!(result, Err(RenderError::InvalidTexture(_))));
        let result = Texture::new(&TextureSource { texels: &[], width: 0, height: 1, format: TextureFormat::RGB });
        assert!(matches!(result, Err(RenderError::InvalidTexture(_))));
    }

    #[test]
    fn nearest_wraps() {
        let texture = checker_2x2();
        assert_eq!(texture.sample_nearest(Vec2::new(0.25, 0.25)).x, 0.0);
        assert_eq!(texture.sample_nearest(Vec2::new(0.75, 0.25)).x, 1.0);
        assert_eq!(texture.sample_nearest(Vec2::new(1.25, 0.25)).x, 0.0);
        assert_eq!(texture.sample_nearest(Vec2::new(-0.25, 0.25)).x, 1.0);
        assert_eq!(texture.sample_nearest(Vec2::new(0.25, 0.75)).x, 1.0);
    }

    #[test]
    fn bilinear_blends_neighbours() {
        let texture = checker_2x2();
        // Texel centers reproduce the texel exactly.
        assert!((texture.sample_bilinear(Vec2::new(0.25, 0.25)).x - 0.0).abs() < 1e-6);
        assert!((texture.sample_bilinear(Vec2::new(0.75, 0.25)).x - 1.0).abs() < 1e-6);
        // Halfway between two texels horizontally.
        assert!((texture.sample_bilinear(Vec2::new(0.5, 0.25)).x - 0.5).abs() < 1e-6);
        assert!(texture.sample_bilinear(Vec2::new(f32::NAN, 0.0)).is_finite());
    }
}
