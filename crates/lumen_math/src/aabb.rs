use crate::{Interval, Ray, Vec3};

/// Minimum thickness of any axis after padding.
const PAD_DELTA: f32 = 0.0001;

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals, padded so no axis is degenerate.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }.pad()
    }

    /// Create an AABB from two corner points.
    ///
    /// The points may be given in any order; the box is padded.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        Self::new(x, y, z)
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method. A zero direction component yields an infinite
    /// reciprocal, which the comparisons below handle without special casing.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let ax = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];

            let mut t0 = (ax.min - r.origin[axis]) * adinv;
            let mut t1 = (ax.max - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > ray_t.min {
                ray_t.min = t0;
            }
            if t1 < ray_t.max {
                ray_t.max = t1;
            }
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Return a copy where every axis thinner than the padding delta is
    /// widened symmetrically to at least that delta.
    pub fn pad(&self) -> Aabb {
        let pad_axis = |i: Interval| {
            // Empty and already thick intervals stay as they are
            if i.min > i.max || i.size() >= PAD_DELTA {
                return i;
            }

            // Far from the origin half the delta rounds away, so keep
            // widening until the stored width really reaches it.
            let mut delta = PAD_DELTA;
            let mut padded = i.expand(delta);
            while padded.size() < PAD_DELTA {
                delta *= 2.0;
                padded = i.expand(delta);
            }
            padded
        };

        Aabb {
            x: pad_axis(self.x),
            y: pad_axis(self.y),
            z: pad_axis(self.z),
        }
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    /// The eight corner points of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (n, corner) in corners.iter_mut().enumerate() {
            *corner = Vec3::new(
                if n & 1 == 0 { self.x.min } else { self.x.max },
                if n & 2 == 0 { self.y.min } else { self.y.max },
                if n & 4 == 0 { self.z.min } else { self.z.max },
            );
        }
        corners
    }

    /// Static constants
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.x, Interval::new(0.0, 10.0));
        assert_eq!(aabb.y, Interval::new(0.0, 10.0));
        assert_eq!(aabb.z, Interval::new(0.0, 10.0));
    }

    #[test]
    fn test_aabb_surrounding_is_axiswise_min_max() {
        let a = Aabb::from_points(Vec3::new(-1.0, 2.0, 0.0), Vec3::new(5.0, 3.0, 1.0));
        let b = Aabb::from_points(Vec3::new(3.0, -4.0, 0.5), Vec3::new(10.0, 2.5, 7.0));
        let u = Aabb::surrounding(&a, &b);

        for k in 0..3 {
            let (ua, aa, ba) = (u.axis_interval(k), a.axis_interval(k), b.axis_interval(k));
            assert_eq!(ua.min, aa.min.min(ba.min));
            assert_eq!(ua.max, aa.max.max(ba.max));
        }
    }

    #[test]
    fn test_aabb_surrounding_empty_is_identity() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &a), a);
    }

    #[test]
    fn test_aabb_pad() {
        // A flat box in the XZ plane at y = 0
        let flat = Aabb {
            x: Interval::new(-1.0, 1.0),
            y: Interval::new(0.0, 0.0),
            z: Interval::new(0.0, 0.0),
        };
        let padded = flat.pad();

        for k in 0..3 {
            assert!(padded.axis_interval(k).size() >= PAD_DELTA);
        }
        // Thick axes are left alone
        assert_eq!(padded.x, flat.x);

        // Constructors always pad
        let quad_box = Aabb::from_points(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        assert!(quad_box.z.size() >= PAD_DELTA);
    }

    #[test]
    fn test_aabb_pad_far_from_origin() {
        for x in [1024.0, 2000.0, 1.0e6] {
            let flat = Aabb::from_points(Vec3::new(x, 0.0, 0.0), Vec3::new(x, 1.0, 1.0));
            assert!(flat.x.size() >= PAD_DELTA, "x = {x}: size {}", flat.x.size());
            assert!(flat.x.min < x && flat.x.max > x);
        }

        // A ray crossing the plane still enters the box
        let flat = Aabb::from_points(Vec3::new(2000.0, 0.0, 0.0), Vec3::new(2000.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.5), Vec3::X, 0.0);
        assert!(flat.hit(&ray, Interval::new(0.001, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_pad_keeps_empty() {
        assert_eq!(Aabb::EMPTY.pad(), Aabb::EMPTY);
        assert_eq!(Aabb::EMPTY.translate(Vec3::ONE), Aabb::EMPTY);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box (zero x/y components produce infinite reciprocals)
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Box lies beyond the allowed interval
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_aabb_hit_diagonal() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let ray = Ray::new(Vec3::splat(-1.0), Vec3::ONE, 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));

        let ray = Ray::new(Vec3::new(-1.0, 2.5, -1.0), Vec3::ONE, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_translate() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        let translated = aabb.translate(Vec3::new(5.0, 0.0, -2.0));

        assert_eq!(translated.x, Interval::new(5.0, 6.0));
        assert_eq!(translated.y, Interval::new(0.0, 1.0));
        assert_eq!(translated.z, Interval::new(-2.0, -1.0));
    }

    #[test]
    fn test_aabb_corners() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        let corners = aabb.corners();

        assert_eq!(corners[0], Vec3::ZERO);
        assert_eq!(corners[7], Vec3::new(1.0, 2.0, 3.0));
        assert!(corners.contains(&Vec3::new(1.0, 0.0, 3.0)));
    }
}
