//! Math primitives for the raytile path tracer.
//!
//! Vector algebra comes from glam; this crate adds the ray type, the
//! interval used for hit ranges, and the sampling/optics helpers the
//! renderer needs on top of `Vec3`.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{
    gen_f32, gen_range_f32, is_near_zero, lerp, random_in_unit_disk, random_unit_vector,
    random_vec3, random_vec3_range, reflect, refract, unit, MAX_REJECTION_ATTEMPTS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }
}
