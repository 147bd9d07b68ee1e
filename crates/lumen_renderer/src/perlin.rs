//! Gradient (Perlin) noise.

use crate::sampling::{gen_int, random_vector};
use lumen_math::Vec3;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Default octave count for [`Perlin::turbulence`].
pub const DEFAULT_TURBULENCE_DEPTH: u32 = 7;

/// Perlin noise generator.
///
/// Tables are drawn once from the supplied generator; queries are pure
/// functions of the input point.
pub struct Perlin {
    random_vectors: Box<[Vec3; POINT_COUNT]>,
    perm_x: Box<[usize; POINT_COUNT]>,
    perm_y: Box<[usize; POINT_COUNT]>,
    perm_z: Box<[usize; POINT_COUNT]>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let mut random_vectors = Box::new([Vec3::ZERO; POINT_COUNT]);
        for v in random_vectors.iter_mut() {
            *v = random_vector(rng, -1.0, 1.0).normalize_or_zero();
        }

        Self {
            random_vectors,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smooth noise in roughly `[-1, 1]`.
    pub fn noise(&self, p: Vec3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i64;
        let j = p.y.floor() as i64;
        let k = p.z.floor() as i64;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[((i + di as i64) & 255) as usize]
                        ^ self.perm_y[((j + dj as i64) & 255) as usize]
                        ^ self.perm_z[((k + dk as i64) & 255) as usize];
                    *corner = self.random_vectors[idx];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves, each at double frequency and half weight.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum: f32 = 0.0;
        let mut temp_p = p;
        let mut weight: f32 = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

/// Fisher-Yates shuffle of `0..POINT_COUNT`.
fn generate_perm(rng: &mut dyn RngCore) -> Box<[usize; POINT_COUNT]> {
    let mut p = Box::new([0usize; POINT_COUNT]);
    for (i, slot) in p.iter_mut().enumerate() {
        *slot = i;
    }

    for i in (1..POINT_COUNT).rev() {
        let target = gen_int(rng, 0, i);
        p.swap(i, target);
    }

    p
}

/// Trilinear blend of the corner gradients, weighted by the Hermite ease curve.
fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);
    let mut accum: f32 = 0.0;

    for (i, plane) in c.iter().enumerate() {
        let fi = i as f32;
        for (j, row) in plane.iter().enumerate() {
            let fj = j as f32;
            for (k, corner) in row.iter().enumerate() {
                let fk = k as f32;
                let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * corner.dot(weight_v);
            }
        }
    }

    accum
}
