//! Camera for ray generation.

use crate::renderer::Background;
use crate::sampling::{gen_f32, random_in_unit_disk, sample_square};
use crate::Ray;
use lumen_math::Vec3;
use rand::RngCore;

/// Lifecycle of a camera across a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    /// Configuration may still change; derived values are stale.
    Uninitialized,
    /// Derived values are current; rays can be generated.
    Initialized,
    /// A render using this camera is in progress.
    Rendering,
    /// The last render finished.
    Done,
}

/// Camera configuration plus the viewport values derived from it.
#[derive(Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Variation angle of rays through each pixel
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    /// Radiance of rays that escape the scene
    pub background: Background,

    state: CameraState,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 10,
            max_depth: 10,
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Background::SkyGradient,
            state: CameraState::Uninitialized,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self.state = CameraState::Uninitialized;
        self
    }

    /// Set the width and derive the height from an aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, width: u32, aspect_ratio: f32) -> Self {
        self.image_width = width;
        self.image_height = ((width as f32 / aspect_ratio) as u32).max(1);
        self.state = CameraState::Uninitialized;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self.state = CameraState::Uninitialized;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.state = CameraState::Uninitialized;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self.state = CameraState::Uninitialized;
        self
    }

    /// Set what escaping rays see.
    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self.state = CameraState::Uninitialized;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CameraState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: CameraState) {
        self.state = state;
    }

    /// Derive the viewport from the configuration.
    ///
    /// Must run before [`Camera::get_ray`]; the render entry points call it.
    pub fn initialize(&mut self) {
        self.image_width = self.image_width.max(1);
        self.image_height = self.image_height.max(1);
        if self.samples_per_pixel == 0 {
            log::warn!("samples_per_pixel was 0, using 1");
            self.samples_per_pixel = 1;
        }

        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Viewport edges; v runs down the image
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        self.state = CameraState::Initialized;
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The ray passes through a random point of the pixel's footprint, starts
    /// on the defocus disk when depth of field is enabled and carries a random
    /// time in `[0, 1)`.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Center of pixel (i, j) on the focus plane.
    pub fn pixel_center(&self, i: u32, j: u32) -> Vec3 {
        self.pixel00_loc + (i as f32) * self.pixel_delta_u + (j as f32) * self.pixel_delta_v
    }

    /// Camera position (valid after initialize).
    pub fn center(&self) -> Vec3 {
        self.center
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
