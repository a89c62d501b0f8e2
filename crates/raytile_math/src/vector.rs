//! Vector helpers layered on top of glam's `Vec3`.
//!
//! Everything here is a pure function of its inputs (plus the caller's RNG
//! for the sampling helpers). Degenerate inputs produce documented fallback
//! values instead of errors.

use crate::Vec3;
use rand::{Rng, RngCore};

/// Upper bound on rejection-sampling attempts before falling back to zero.
pub const MAX_REJECTION_ATTEMPTS: usize = 100;

/// Threshold below which every component counts as zero.
const NEAR_ZERO: f32 = 1e-8;

/// Normalize `v`, returning the zero vector when `v` has zero length.
#[inline]
pub fn unit(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > 0.0 {
        v * (1.0 / len)
    } else {
        v
    }
}

/// Linear interpolation `a*(1-t) + b*t`.
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index `etai_over_etat`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// True when every component is smaller than 1e-8 in magnitude.
#[inline]
pub fn is_near_zero(v: Vec3) -> bool {
    v.x.abs() < NEAR_ZERO && v.y.abs() < NEAR_ZERO && v.z.abs() < NEAR_ZERO
}

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform float in `[min, max)`.
#[inline]
pub fn gen_range_f32(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Vector with each component uniform in `[0, 1)`.
pub fn random_vec3(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng))
}

/// Vector with each component uniform in `[min, max)`.
pub fn random_vec3_range(rng: &mut dyn RngCore, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        gen_range_f32(rng, min, max),
        gen_range_f32(rng, min, max),
        gen_range_f32(rng, min, max),
    )
}

/// Random direction on the unit sphere.
///
/// Rejection-samples the cube `[-1, 1]^3` until a point lands inside the
/// unit ball with `1e-15 < len^2 <= 1`, then normalizes it. Gives up after
/// [`MAX_REJECTION_ATTEMPTS`] tries and returns the zero vector.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let p = random_vec3_range(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if 1e-15 < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
    Vec3::ZERO
}

/// Random point inside the unit disk in the z = 0 plane.
///
/// Same bounded rejection policy as [`random_unit_vector`].
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let p = Vec3::new(
            gen_range_f32(rng, -1.0, 1.0),
            gen_range_f32(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
    Vec3::ZERO
}
