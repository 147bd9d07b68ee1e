//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded by the camera's max depth
//! - Emission from light materials
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction and RGBA packing

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::CameraState;
use crate::{Camera, Color, HitRecord, Hittable, Ray};
use lumen_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// Minimum hit distance for secondary rays, avoids self-intersection.
const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// What a ray sees when it escapes the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Background {
    Solid(Color),
    /// White at the horizon blending to light blue straight up
    #[default]
    SkyGradient,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::SkyGradient => sky_gradient(ray),
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Base seed; each bucket derives its own generator from it
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, bouncing off surfaces and accumulating
/// emitted light, until it escapes, is absorbed or `depth` reaches zero.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    // Out of bounces: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    if !world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY), &mut rec, rng) {
        return background.color(ray);
    }

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed
        None => emission,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let intensity = Interval::new(0.0, 0.999);
    let to_byte = |c: f32| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Pack RGBA bytes into one pixel, red in the lowest byte.
#[inline]
pub fn pack_rgba(rgba: [u8; 4]) -> u32 {
    u32::from_le_bytes(rgba)
}

/// Average `samples_per_pixel` jittered samples for pixel (x, y).
///
/// Returns linear color; the camera must be initialized.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, &camera.background, rng);
    }

    pixel_color / camera.samples_per_pixel.max(1) as f32
}

/// Row-major image of packed RGBA pixels, top row first.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.offset(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, pixel: u32) {
        let offset = self.offset(x, y);
        self.pixels[offset] = pixel;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, chunk) in result.pixels.chunks(bucket.width as usize).enumerate() {
            let start = self.offset(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + chunk.len()].copy_from_slice(chunk);
        }
    }

    /// Unpack to RGBA bytes (for saving).
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_le_bytes()).collect()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the scene with the camera, buckets running in parallel.
///
/// Re-derives the camera from its current settings first, since the public
/// image fields may have changed since the last render, and leaves it in
/// [`CameraState::Done`].
pub fn render(camera: &mut Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    camera.initialize();
    camera.set_state(CameraState::Rendering);

    let (width, height) = (camera.image_width, camera.image_height);
    let buckets = generate_buckets(width, height, config.bucket_size);
    let total = buckets.len();

    log::info!(
        "Rendering {}x{} at {} spp, depth {} ({} buckets)",
        width,
        height,
        camera.samples_per_pixel,
        camera.max_depth,
        total
    );
    let start = Instant::now();

    let completed = AtomicUsize::new(0);
    let cam: &Camera = camera;
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = StdRng::seed_from_u64(bucket.seed(config.seed));
            let pixels = render_bucket(bucket, cam, world, &mut rng);

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {}/{} done", done, total);

            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    camera.set_state(CameraState::Done);
    log::info!("Render finished in {:.2?}", start.elapsed());

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bvh, DiffuseLight, HittableList, Lambertian, Quad, Sphere, Vec3};
    use std::sync::Arc;

    fn single_sphere_world() -> HittableList {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        )));
        world
    }

    #[test]
    fn test_sky_gradient() {
        let up = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0), 0.0));
        let down = sky_gradient(&Ray::new(Vec3::ZERO, -Vec3::Y, 0.0));

        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);
        assert!((down - Color::ONE).length() < 1e-6);
        assert_eq!(Background::default(), Background::SkyGradient);
    }

    #[test]
    fn test_depth_zero_is_black() {
        let world = single_sphere_world();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 1.0, 0.0), 0.0);

        let color = ray_color(&ray, &world, 0, &Background::Solid(Color::ONE), &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_miss_returns_background() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 0.0);

        let solid = Background::Solid(Color::new(0.2, 0.3, 0.4));
        assert_eq!(ray_color(&ray, &world, 5, &solid, &mut rng), Color::new(0.2, 0.3, 0.4));

        let sky = ray_color(&ray, &world, 5, &Background::SkyGradient, &mut rng);
        assert!((sky - Color::new(0.75, 0.85, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_light_returns_emission() {
        let mut world = HittableList::new();
        world.add(Box::new(Quad::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Arc::new(DiffuseLight::new(Color::splat(4.0))),
        )));
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), -Vec3::Z, 0.0);

        let color = ray_color(&ray, &world, 1, &Background::Solid(Color::ZERO), &mut rng);
        assert_eq!(color, Color::splat(4.0));
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_packing() {
        assert_eq!(color_to_rgba(Color::new(1.0, 0.25, 0.0)), [255, 128, 0, 255]);
        assert_eq!(color_to_rgba(Color::new(50.0, -2.0, 0.0)), [255, 0, 0, 255]);
        assert_eq!(pack_rgba([1, 2, 3, 255]), 0xFF03_0201);
    }

    #[test]
    fn test_image_buffer_layout() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, pack_rgba([9, 8, 7, 255]));

        assert_eq!(image.get(2, 1), 0xFF07_0809);
        let bytes = image.to_rgba_bytes();
        assert_eq!(bytes.len(), 3 * 2 * 4);
        assert_eq!(&bytes[20..24], &[9, 8, 7, 255]);
    }

    #[test]
    fn test_render_single_sphere() {
        let world = single_sphere_world();
        let background = Color::splat(0.25);
        let mut camera = Camera::new()
            .with_resolution(32, 32)
            .with_quality(1, 1)
            .with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(90.0, 0.0, 3.0)
            .with_background(Background::Solid(background));

        let config = RenderConfig {
            seed: 3,
            bucket_size: 8,
        };
        let image = render(&mut camera, &world, &config);

        assert_eq!(camera.state(), CameraState::Done);
        assert_eq!(image.pixels.len(), 32 * 32);

        // With one bounce the scattered ray gathers nothing
        let sphere_pixel = pack_rgba([0, 0, 0, 255]);
        let background_pixel = pack_rgba(color_to_rgba(background));
        assert_eq!(image.get(16, 16), sphere_pixel);
        assert_eq!(image.get(0, 0), background_pixel);
        assert_eq!(image.get(31, 31), background_pixel);
    }

    #[test]
    fn test_render_after_settings_change() {
        let world = single_sphere_world();
        let background = Color::splat(0.25);
        let mut camera = Camera::new()
            .with_resolution(32, 32)
            .with_quality(1, 1)
            .with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(90.0, 0.0, 3.0)
            .with_background(Background::Solid(background));
        let config = RenderConfig::default();
        render(&mut camera, &world, &config);
        assert_eq!(camera.state(), CameraState::Done);

        // Shrinking through the public fields must not reuse the old pixel grid
        camera.image_width = 8;
        camera.image_height = 8;
        let image = render(&mut camera, &world, &config);
        assert_eq!(image.pixels.len(), 64);
        assert_eq!(image.get(4, 4), pack_rgba([0, 0, 0, 255]));
        assert_eq!(image.get(0, 0), pack_rgba(color_to_rgba(background)));

        // A zero sample count is raised instead of dividing into black
        let mut camera = camera.with_quality(0, 1);
        let image = render(&mut camera, &world, &config);
        assert_eq!(camera.samples_per_pixel, 1);
        assert_eq!(image.get(0, 0), pack_rgba(color_to_rgba(background)));
    }

    #[test]
    fn test_render_is_reproducible() {
        let mut rng = StdRng::seed_from_u64(5);
        let world = Bvh::new(single_sphere_world(), &mut rng);
        let mut camera = Camera::new()
            .with_resolution(24, 16)
            .with_quality(4, 4)
            .with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(60.0, 0.0, 3.0);

        let config = RenderConfig {
            seed: 11,
            bucket_size: 5,
        };
        let first = render(&mut camera, &world, &config);
        let second = render(&mut camera, &world, &config);

        assert_eq!(first.pixels, second.pixels);
        assert!(first.pixels.iter().all(|p| p >> 24 == 0xFF));
    }
}
