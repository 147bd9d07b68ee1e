//! Spatially varying colour lookups used by materials.

use std::path::Path;
use std::sync::Arc;

use crate::bitmap::Bitmap;
use crate::perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};
use crate::Color;
use lumen_math::{Interval, Vec3};
use rand::RngCore;

/// Colour shown where an image texture has no pixels to sample.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(1.0, 0.0, 1.0);

/// A colour as a function of surface coordinates and hit point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// Constant colour.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// 3D checkerboard alternating between two child textures.
///
/// The cell is chosen by the parity of `floor(p / scale)` summed over all
/// three axes, so the pattern is solid rather than painted on the surface.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let x = (self.inv_scale * p.x).floor() as i64;
        let y = (self.inv_scale * p.y).floor() as i64;
        let z = (self.inv_scale * p.z).floor() as i64;

        if (x + y + z).rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Texture sampled from a decoded bitmap (nearest pixel).
pub struct ImageTexture {
    image: Bitmap,
}

impl ImageTexture {
    pub fn from_bitmap(image: Bitmap) -> Self {
        Self { image }
    }

    /// Load the image at `path`. A failed load is logged and leaves the
    /// texture empty, which renders as [`MISSING_TEXTURE_COLOR`].
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let image = match Bitmap::load(path) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Could not load image texture {}: {}", path.display(), e);
                Bitmap::default()
            }
        };

        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if self.image.height() == 0 {
            return MISSING_TEXTURE_COLOR;
        }

        // Image rows run top to bottom, v runs bottom to top
        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v);

        let i = (u * self.image.width() as f32) as i64;
        let j = (v * self.image.height() as f32) as i64;
        let pixel = self.image.pixel(i, j);

        let color_scale = 1.0 / 255.0;
        Color::new(
            color_scale * pixel[0] as f32,
            color_scale * pixel[1] as f32,
            color_scale * pixel[2] as f32,
        )
    }
}

/// Marble-like procedural texture built on Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let s = self.scale * p;
        let phase = s.z + 10.0 * self.noise.turbulence(s, DEFAULT_TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + phase.sin())
    }
}
