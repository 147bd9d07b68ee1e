//! Planar parallelogram primitive and the axis-aligned box built from it.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Rays closer to parallel than this are treated as missing the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A parallelogram with corner `q` and edges `u` and `v`.
///
/// Surface UVs are the `(alpha, beta)` plane coordinates of the hit point,
/// each in `[0, 1]` across the patch.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n . n)` for the unnormalized normal n = u x v
    w: Vec3,
    normal: Vec3,
    d: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        // Both diagonals, so the box is right whatever the edge signs are
        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);
        let bbox = Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox,
        }
    }

    /// Membership test in plane coordinates.
    fn is_interior(alpha: f32, beta: f32) -> bool {
        let unit_interval = Interval::new(0.0, 1.0);
        unit_interval.contains(alpha) && unit_interval.contains(beta)
    }
}

impl Hittable for Quad {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let denom = self.normal.dot(ray.direction());

        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let intersection = ray.at(t);
        let planar_hitpt_vector = intersection - self.q;
        let alpha = self.w.dot(planar_hitpt_vector.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt_vector));

        if !Self::is_interior(alpha, beta) {
            return false;
        }

        rec.t = t;
        rec.p = intersection;
        rec.u = alpha;
        rec.v = beta;
        rec.material = &*self.material;
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Axis-aligned box made of six quads, spanning two opposite corners.
pub struct Cuboid {
    sides: HittableList,
}

impl Cuboid {
    pub fn new(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        let min = a.min(b);
        let max = a.max(b);

        let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
        let dy = Vec3::new(0.0, max.y - min.y, 0.0);
        let dz = Vec3::new(0.0, 0.0, max.z - min.z);

        let faces = [
            (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
            (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
            (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
            (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
            (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
            (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
        ];

        let mut sides = HittableList::new();
        for (q, u, v) in faces {
            sides.add(Box::new(Quad::new(q, u, v, material.clone())));
        }

        Self { sides }
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        self.sides.hit(ray, ray_t, rec, rng)
    }

    fn bounding_box(&self) -> Aabb {
        self.sides.bounding_box()
    }
}
