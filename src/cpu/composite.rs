// CPU reference of displacement_composite.wgsl, field space (uv y-up)
use glam::{Vec2, Vec4};

use crate::cpu::field::DisplacementField;
use crate::params::ViewportState;

/// Offset scale per color channel, strongest on red.
pub const RED_SHIFT: f32 = 0.02;
pub const GREEN_SHIFT: f32 = 0.015;
pub const BLUE_SHIFT: f32 = 0.01;

/// Linear RGBA pixels, row 0 at the bottom so `uv` maps directly.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Vec4>,
}

impl SourceImage {
    pub fn new(width: usize, height: usize, pixels: Vec<Vec4>) -> Option<Self> {
        (width > 0 && height > 0 && pixels.len() == width * height).then_some(Self { width, height, pixels })
    }

    /// `f(x, y)` with y counted from the bottom row. None for an empty size.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> Vec4) -> Option<Self> {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    // nearest texel, clamp to edge
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        // pub fields can still describe an empty image
        if self.width == 0 || self.height == 0 || self.pixels.len() < self.width * self.height {
            return Vec4::ZERO;
        }
        let texel = |t: f32, len: usize| -> usize {
            let c = (t * len as f32).floor();
            if c.is_nan() { 0 } else { (c.max(0.0) as usize).min(len - 1) }
        };
        let x = texel(uv.x, self.width);
        let y = texel(uv.y, self.height);
        self.pixels[x + self.width * y]
    }
}

/// Scale that fits the image inside the viewport without stretching.
pub fn aspect_ratio(viewport: Vec2, image: Vec2) -> Vec2 {
    let out_aspect = viewport.x / viewport.y;
    let img_aspect = image.x / image.y;
    Vec2::new((out_aspect / img_aspect).min(1.0), (img_aspect / out_aspect).min(1.0))
}

/// Output uv to centered image uv.
pub fn remap_uv(uv_out: Vec2, ratio: Vec2) -> Vec2 {
    uv_out * ratio + (Vec2::ONE - ratio) * 0.5
}

pub fn composite_pixel(uv_out: Vec2, ratio: Vec2, field: &DisplacementField, image: &SourceImage) -> Vec4 {
    let uv = remap_uv(uv_out, ratio);
    let offset = field.sample(uv);

    let r = image.sample(uv - RED_SHIFT * offset).x;
    let g = image.sample(uv - GREEN_SHIFT * offset).y;
    let b = image.sample(uv - BLUE_SHIFT * offset).z;
    Vec4::new(r, g, b, 1.0)
}

/// Full frame at the viewport's pixel size, sampled at pixel centers.
/// Returned rows go bottom to top, like `SourceImage`.
pub fn render(field: &DisplacementField, image: &SourceImage, viewport: ViewportState) -> Vec<Vec4> {
    let w = viewport.width.max(0.0) as usize;
    let h = viewport.height.max(0.0) as usize;
    let ratio = aspect_ratio(viewport.size(), image.size());

    let mut out = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let uv_out = Vec2::new((x as f32 + 0.5) / w as f32, (y as f32 + 0.5) / h as f32);
            out.push(composite_pixel(uv_out, ratio, field, image));
        }
    }
    out
}
