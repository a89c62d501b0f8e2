//! Surface materials and the scattering model.
//!
//! Materials form a closed set, so they are a plain enum dispatched by a
//! single `match` in the per-bounce hot path.

use crate::HitRecord;
use raytile_math::{
    gen_f32, is_near_zero, random_unit_vector, reflect, refract, unit, Ray, Vec3,
};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// How light interacts with a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Diffuse surface (matte).
    Lambertian { albedo: Color },
    /// Specular reflection, roughened by `fuzz` in `[0, 1]`.
    Metal { albedo: Color, fuzz: f32 },
    /// Transparent surface (glass, water) with refraction.
    Dielectric { refraction_index: f32 },
    /// Light-emitting surface.
    ///
    /// Emission is not wired into the integrator yet, so these surfaces
    /// absorb every ray and show up black.
    Emissive,
}

/// Outcome of scattering a ray off a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scatter {
    /// The ray continues as `ray`, tinted by `attenuation`.
    Bounce { attenuation: Color, ray: Ray },
    /// The surface absorbed the ray. `ray` is what the scatter step
    /// produced before giving up; the integrator still advances along it.
    Absorbed { ray: Ray },
}

impl Scatter {
    /// The outgoing ray, regardless of whether it was absorbed.
    #[inline]
    pub fn ray(&self) -> Ray {
        match *self {
            Scatter::Bounce { ray, .. } | Scatter::Absorbed { ray } => ray,
        }
    }

    /// True when the surface absorbed the ray.
    #[inline]
    pub fn is_absorbed(&self) -> bool {
        matches!(self, Scatter::Absorbed { .. })
    }
}

impl Material {
    /// Create a new Lambertian material with the given albedo color.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian { albedo }
    }

    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Create a new Dielectric material.
    ///
    /// - `refraction_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn dielectric(refraction_index: f32) -> Self {
        assert!(
            refraction_index > 0.0,
            "refraction index must be positive, got {refraction_index}"
        );
        Material::Dielectric { refraction_index }
    }

    /// Create an emissive material.
    pub fn emissive() -> Self {
        Material::Emissive
    }

    /// Scatter an incoming ray off the surface described by `rec`.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Scatter {
        match *self {
            Material::Lambertian { albedo } => {
                let mut scatter_direction = rec.normal + random_unit_vector(rng);

                // Catch degenerate scatter direction
                if is_near_zero(scatter_direction) {
                    scatter_direction = rec.normal;
                }

                Scatter::Bounce {
                    attenuation: albedo,
                    ray: Ray::new(rec.p, scatter_direction),
                }
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction(), rec.normal);
                let scattered_dir = unit(reflected) + fuzz * random_unit_vector(rng);
                let ray = Ray::new(rec.p, scattered_dir);

                // Only scatter if the reflected ray leaves the surface
                if scattered_dir.dot(rec.normal) > 0.0 {
                    Scatter::Bounce {
                        attenuation: albedo,
                        ray,
                    }
                } else {
                    Scatter::Absorbed { ray }
                }
            }
            Material::Dielectric { refraction_index } => {
                let ratio = if rec.front_face {
                    1.0 / refraction_index
                } else {
                    refraction_index
                };

                let unit_direction = unit(ray_in.direction());
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                // Total internal reflection
                let cannot_refract = ratio * sin_theta > 1.0;

                let direction = if cannot_refract || reflectance(cos_theta, ratio) > gen_f32(rng) {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, ratio)
                };

                Scatter::Bounce {
                    attenuation: Color::ONE,
                    ray: Ray::new(rec.p, direction),
                }
            }
            Material::Emissive => Scatter::Absorbed { ray: *ray_in },
        }
    }
}

/// Schlick's approximation for reflectance.
#[inline]
pub fn reflectance(cosine: f32, refraction_index: f32) -> f32 {
    let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
