//! Decoded RGBA8 bitmaps for image textures.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while loading a bitmap.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Bitmap size mismatch: {width}x{height} needs {expected} bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Bytes per pixel of every bitmap (RGBA8).
pub const BYTES_PER_PIXEL: usize = 4;

/// Returned for every lookup into an empty bitmap.
const MAGENTA: [u8; 4] = [255, 0, 255, 255];

/// A row-major RGBA8 image, or an empty placeholder when loading failed.
#[derive(Clone, Debug, Default)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap raw RGBA8 bytes (row-major, top row first).
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> TextureResult<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Decode an image file into RGBA8.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::debug!("Loaded bitmap: {} ({}x{})", path.display(), width, height);

        Self::from_rgba8(width, height, rgba.into_raw())
    }

    /// Width in pixels, 0 when nothing is loaded.
    pub fn width(&self) -> u32 {
        if self.data.is_empty() {
            0
        } else {
            self.width
        }
    }

    /// Height in pixels, 0 when nothing is loaded.
    pub fn height(&self) -> u32 {
        if self.data.is_empty() {
            0
        } else {
            self.height
        }
    }

    /// RGBA bytes of the pixel at `(x, y)`, with coordinates clamped to the image.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 4] {
        if self.data.is_empty() {
            return MAGENTA;
        }

        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let idx = (y * self.width as usize + x) * BYTES_PER_PIXEL;

        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_one() -> Bitmap {
        Bitmap::from_rgba8(2, 1, vec![10, 20, 30, 255, 40, 50, 60, 255]).unwrap()
    }

    #[test]
    fn test_pixel_lookup_and_clamp() {
        let bmp = two_by_one();
        assert_eq!(bmp.width(), 2);
        assert_eq!(bmp.height(), 1);

        assert_eq!(bmp.pixel(0, 0), [10, 20, 30, 255]);
        assert_eq!(bmp.pixel(1, 0), [40, 50, 60, 255]);
        // Out of range coordinates clamp to the border
        assert_eq!(bmp.pixel(5, 3), [40, 50, 60, 255]);
        assert_eq!(bmp.pixel(-4, -1), [10, 20, 30, 255]);
    }

    #[test]
    fn test_empty_bitmap_is_magenta() {
        let bmp = Bitmap::default();
        assert_eq!(bmp.width(), 0);
        assert_eq!(bmp.height(), 0);
        assert_eq!(bmp.pixel(0, 0), MAGENTA);
    }

    #[test]
    fn test_size_mismatch() {
        let err = Bitmap::from_rgba8(2, 2, vec![0; 4]).unwrap_err();
        assert!(matches!(err, TextureError::SizeMismatch { expected: 16, actual: 4, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Bitmap::load("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, TextureError::ImageError(image::ImageError::IoError(_))));
    }

    #[test]
    fn test_undecodable_file() {
        let path = std::env::temp_dir().join("lumen_bitmap_garbage.png");
        std::fs::write(&path, b"not a png").unwrap();

        let err = Bitmap::load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, TextureError::ImageError(_)));
    }
}
