//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// A sphere primitive, optionally moving linearly over the shutter interval.
pub struct Sphere {
    /// Center at time 0 (origin) and displacement by time 1 (direction)
    center: Ray,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center: Ray::new(center, Vec3::ZERO, 0.0),
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere that moves from `center0` at time 0 to `center1` at time 1.
    pub fn moving(center0: Vec3, center1: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center: Ray::new(center0, center1 - center0, 0.0),
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from -Y, phi: angle around Y from -X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let current_center = self.center.at(ray.time());
        let oc = current_center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - current_center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
        rec.material = &*self.material;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5)))
    }

    fn hit(sphere: &Sphere, ray: &Ray, ray_t: Interval) -> Option<(f32, Vec3, bool, f32, f32)> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();
        sphere
            .hit(ray, ray_t, &mut rec, &mut rng)
            .then(|| (rec.t, rec.normal, rec.front_face, rec.u, rec.v))
    }

    #[test]
    fn test_sphere_hit_near_side() {
        let center = Vec3::new(3.0, -2.0, -7.0);
        let sphere = Sphere::new(center, 1.5, gray());

        let origin = Vec3::new(1.0, 1.0, 1.0);
        let ray = Ray::new(origin, (center - origin).normalize(), 0.0);
        let (t, normal, front_face, ..) =
            hit(&sphere, &ray, Interval::new(0.001, f32::INFINITY)).expect("should hit");

        let expected_t = origin.distance(center) - 1.5;
        assert!((t - expected_t).abs() < 1e-4);
        assert!(front_face);
        assert!(normal.dot(ray.direction()) < 0.0);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);
        assert!(hit(&sphere, &ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_sphere_far_root_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        let (t, normal, front_face, ..) =
            hit(&sphere, &ray, Interval::new(0.001, f32::INFINITY)).expect("exits the sphere");
        assert!((t - 1.0).abs() < 1e-5);
        assert!(!front_face);
        // Normal flipped to face the ray
        assert!((normal - (-Vec3::X)).length() < 1e-5);
    }

    #[test]
    fn test_sphere_interval_is_exclusive() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -2.0), 1.0, gray());
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);

        // Both roots (1 and 3) lie outside (1, 3) exactly at the bounds
        assert!(hit(&sphere, &ray, Interval::new(1.0, 3.0)).is_none());
        assert!(hit(&sphere, &ray, Interval::new(1.5, 3.5)).is_some());
        assert!(hit(&sphere, &ray, Interval::new(0.0, 0.5)).is_none());
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = Sphere::get_sphere_uv(Vec3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-6 && (v - 0.5).abs() < 1e-6);

        let (_, v) = Sphere::get_sphere_uv(Vec3::new(0.0, 1.0, 0.0));
        assert!((v - 1.0).abs() < 1e-6);

        let (_, v) = Sphere::get_sphere_uv(Vec3::new(0.0, -1.0, 0.0));
        assert!(v.abs() < 1e-6);

        let (u, _) = Sphere::get_sphere_uv(Vec3::new(0.0, 0.0, 1.0));
        assert!((u - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let sphere = Sphere::moving(Vec3::new(0.0, 0.0, -5.0), Vec3::new(4.0, 0.0, -5.0), 1.0, gray());
        let interval = Interval::new(0.001, f32::INFINITY);

        let at_start = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let at_end = Ray::new(Vec3::ZERO, -Vec3::Z, 1.0);
        assert!(hit(&sphere, &at_start, interval).is_some());
        assert!(hit(&sphere, &at_end, interval).is_none());

        let shifted = Ray::new(Vec3::new(2.0, 0.0, 0.0), -Vec3::Z, 0.5);
        let (t, normal, ..) = hit(&sphere, &shifted, interval).expect("hits at mid-shutter");
        assert!((t - 4.0).abs() < 1e-4);
        assert!((normal - Vec3::Z).length() < 1e-4);

        // Bounding box covers the whole sweep
        let bbox = sphere.bounding_box();
        assert!((bbox.x.min - (-1.0)).abs() < 1e-6);
        assert!((bbox.x.max - 5.0).abs() < 1e-6);
    }
}
