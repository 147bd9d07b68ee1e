//! Bucket-based tile scheduling.
//!
//! The image is cut into square tiles (buckets) that are rendered
//! independently, each with its own seeded generator, and ordered from the
//! image center outward.

use crate::renderer::{color_to_rgba, pack_rgba, render_pixel};
use crate::{Camera, Hittable};
use rand::RngCore;

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Generator seed for this bucket.
    ///
    /// Depends only on the base seed and the bucket's corner, so the result
    /// does not change with render order or thread count.
    pub fn seed(&self, base: u64) -> u64 {
        let position = (u64::from(self.y) << 32) | u64::from(self.x);
        base ^ position.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    fn distance_to(&self, cx: f32, cy: f32) -> f32 {
        let bx = self.x as f32 + self.width as f32 / 2.0;
        let by = self.y as f32 + self.height as f32 / 2.0;
        (bx - cx).powi(2) + (by - cy).powi(2)
    }
}

/// Split a `width` x `height` image into buckets, nearest the center first.
///
/// Edge buckets are clipped to the image. A zero `bucket_size` is treated as 1.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size as usize)
        .flat_map(|y| {
            (0..width).step_by(size as usize).map(move |x| {
                Bucket::new(x, y, size.min(width - x), size.min(height - y), 0)
            })
        })
        .collect();

    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    buckets.sort_by(|a, b| a.distance_to(cx, cy).total_cmp(&b.distance_to(cx, cy)));

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Render every pixel of a bucket.
///
/// Returns packed RGBA pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
) -> Vec<u32> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(camera, world, bucket.x + local_x, bucket.y + local_y, rng);
            pixels.push(pack_rgba(color_to_rgba(color)));
        }
    }

    pixels
}

/// Pixels produced for one bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Packed RGBA in row-major order
    pub pixels: Vec<u32>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<u32>) -> Self {
        Self { bucket, pixels }
    }
}
