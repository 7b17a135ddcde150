use crate::math::Vec4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub xmin: u16,
    pub ymin: u16,
    pub xmax: u16,
    pub ymax: u16,
}

impl Viewport {
    pub fn new(xmin: u16, ymin: u16, xmax: u16, ymax: u16) -> Viewport {
        Viewport { xmin, ymin, xmax, ymax }
    }

    pub fn width(&self) -> u16 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> u16 {
        self.ymax - self.ymin
    }
}

/// NDC -> screen mapping. X grows to the right, Y is flipped so that screen row 0 is NDC y = +1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportScale {
    xa: f32,
    xc: f32, // x' = x * xa + xc
    ya: f32,
    yc: f32, // y' = y * ya + yc
}

impl ViewportScale {
    pub fn new(viewport: Viewport) -> Self {
        let dx = viewport.width() as f32;
        let dy = viewport.height() as f32;
        ViewportScale {
            xa: dx * 0.5,                          //
            xc: (viewport.xmin as f32) + dx * 0.5, //
            ya: dy * -0.5,                         //
            yc: (viewport.ymin as f32) + dy * 0.5, //
        }
    }

    /// Maps x and y; depth and 1/w pass through untouched.
    pub fn apply(&self, v: Vec4) -> Vec4 {
        Vec4::new(v.x * self.xa + self.xc, v.y * self.ya + self.yc, v.z, v.w)
    }
}
