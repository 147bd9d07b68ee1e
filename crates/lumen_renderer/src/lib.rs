//! Lumen renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for physically-based rendering: spheres,
//! quads, boxes, instancing transforms and participating media, grouped
//! under a bounding volume hierarchy and shaded with diffuse, metal,
//! dielectric, isotropic and emissive materials.

pub mod sampling;

mod bitmap;
mod bucket;
mod bvh;
mod camera;
mod constant_medium;
mod hittable;
mod material;
mod perlin;
mod quad;
mod renderer;
mod sphere;
mod texture;
mod transform;

pub use bitmap::{Bitmap, TextureError, TextureResult};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::Bvh;
pub use camera::{Camera, CameraState};
pub use constant_medium::ConstantMedium;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};
pub use quad::{Cuboid, Quad};
pub use renderer::{
    color_to_rgba, linear_to_gamma, pack_rgba, ray_color, render, render_pixel, Background,
    ImageBuffer, RenderConfig,
};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use transform::{RotateY, Translate};

/// Re-export math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};
