//! Homogeneous participating medium (fog, smoke) inside a convex boundary.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    material::Isotropic,
    sampling::gen_f32,
    texture::Texture,
    Color, Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Offset used to find the exit point past the entry point.
const EXIT_EPSILON: f32 = 0.0001;

/// Volume of constant density bounded by another hittable.
///
/// The boundary is assumed convex: only the first entry and exit crossings
/// along a ray are considered.
pub struct ConstantMedium {
    boundary: Box<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Box<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self::with_phase_function(boundary, density, Arc::new(Isotropic::new(albedo)))
    }

    pub fn with_texture(boundary: Box<dyn Hittable>, density: f32, albedo: Arc<dyn Texture>) -> Self {
        Self::with_phase_function(boundary, density, Arc::new(Isotropic::with_texture(albedo)))
    }

    fn with_phase_function(
        boundary: Box<dyn Hittable>,
        density: f32,
        phase_function: Arc<dyn Material>,
    ) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function,
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let mut rec1 = HitRecord::default();
        let mut rec2 = HitRecord::default();

        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut rec1, rng) {
            return false;
        }

        if !self
            .boundary
            .hit(ray, Interval::new(rec1.t + EXIT_EPSILON, f32::INFINITY), &mut rec2, rng)
        {
            return false;
        }

        let mut t_enter = rec1.t.max(ray_t.min);
        let t_exit = rec2.t.min(ray_t.max);

        if t_enter >= t_exit {
            return false;
        }

        if t_enter < 0.0 {
            t_enter = 0.0;
        }

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        // 1 - [0, 1) keeps the logarithm finite
        let hit_distance = self.neg_inv_density * (1.0 - gen_f32(rng)).ln();

        if hit_distance > distance_inside_boundary {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);

        // Scattering is isotropic, so normal and facing are arbitrary
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.material = &*self.phase_function;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
