//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - Bounded iterative bouncing with configurable depth
//! - Sky gradient background
//! - Anti-aliasing via multi-sampling
//! - Gamma correction

use crate::{Camera, Color, Hittable, Scatter, Scene};
use raytile_math::{lerp, unit, Interval, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Minimum hit distance, keeps bounced rays from re-hitting their origin.
pub const SHADOW_EPSILON: f32 = 0.001;

/// Sample count and depth used while the camera is moving.
pub const INTERACTIVE_SAMPLES: u32 = 1;
pub const INTERACTIVE_DEPTH: u32 = 2;

/// Sampling quality preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityMode {
    /// One sample, two bounces: for navigating the scene.
    Interactive,
    /// Full sample/depth budget, once the view has settled.
    HighQuality,
}

/// Per-frame sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Which preset the two fields above come from
    pub mode: QualityMode,
    /// Samples used when switching to high quality
    pub high_quality_samples: u32,
    /// Depth used when switching to high quality
    pub high_quality_depth: u32,
}

impl RenderSettings {
    /// Interactive preset with the given high-quality budget kept for later.
    pub fn interactive(high_quality_samples: u32, high_quality_depth: u32) -> Self {
        Self {
            samples_per_pixel: INTERACTIVE_SAMPLES,
            max_depth: INTERACTIVE_DEPTH,
            mode: QualityMode::Interactive,
            high_quality_samples,
            high_quality_depth,
        }
    }

    /// Switch to `mode`, loading its sample/depth preset.
    pub fn set_mode(&mut self, mode: QualityMode) {
        self.mode = mode;
        match mode {
            QualityMode::Interactive => {
                self.samples_per_pixel = INTERACTIVE_SAMPLES;
                self.max_depth = INTERACTIVE_DEPTH;
            }
            QualityMode::HighQuality => {
                self.samples_per_pixel = self.high_quality_samples;
                self.max_depth = self.high_quality_depth;
            }
        }
    }

    /// Flip between the interactive and high-quality presets.
    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            QualityMode::Interactive => QualityMode::HighQuality,
            QualityMode::HighQuality => QualityMode::Interactive,
        };
        self.set_mode(next);
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::interactive(50, 50)
    }
}

/// Everything a worker reads while rendering a frame.
///
/// Borrowed immutably for the whole frame, so the scene and camera cannot
/// change while tiles are in flight.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub camera: &'a Camera,
    pub scene: &'a Scene,
    pub settings: &'a RenderSettings,
}

impl<'a> RenderContext<'a> {
    pub fn new(camera: &'a Camera, scene: &'a Scene, settings: &'a RenderSettings) -> Self {
        Self {
            camera,
            scene,
            settings,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Bounces at most `max_depth` times. A ray that escapes picks up the sky
/// gradient; one that runs out of bounces is black.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, max_depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut color = Color::ONE;
    let mut current = *ray;

    for _ in 0..max_depth {
        match world.hit(&current, Interval::new(SHADOW_EPSILON, f32::INFINITY)) {
            Some(rec) => {
                let scatter = rec.material.scatter(&current, &rec, rng);
                if let Scatter::Bounce { attenuation, .. } = scatter {
                    color *= attenuation;
                }
                // Absorbed rays keep walking along whatever the material produced
                current = scatter.ray();
            }
            None => return color * sky_gradient(&current),
        }
    }

    Color::ZERO
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = unit(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    lerp(Color::ONE, Color::new(0.5, 0.7, 1.0), a)
}

/// Apply gamma correction (gamma = 2.0) per channel; non-positive channels map to 0.
#[inline]
pub fn linear_to_gamma(linear: Color) -> Color {
    Vec3::new(
        gamma_channel(linear.x),
        gamma_channel(linear.y),
        gamma_channel(linear.z),
    )
}

#[inline]
fn gamma_channel(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a gamma-corrected color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(color.x)) as u8;
    let g = (255.0 * clamp_01(color.y)) as u8;
    let b = (255.0 * clamp_01(color.z)) as u8;
    [r, g, b, 255]
}

/// Render a single pixel with multi-sampling.
///
/// Returns the averaged, still linear color.
pub fn render_pixel(ctx: &RenderContext<'_>, x: u32, y: u32, rng: &mut dyn RngCore) -> Color {
    let samples = ctx.settings.samples_per_pixel.max(1);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = ctx.camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, ctx.scene, ctx.settings.max_depth, rng);
    }

    // Average the samples
    pixel_color / samples as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn single_sphere(material: Material) -> Scene {
        let mut scene = Scene::new().unwrap();
        scene
            .add(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, material))
            .unwrap();
        scene
    }

    #[test]
    fn test_sky_gradient_endpoints() {
        let up = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::Y));
        assert_eq!(up, Color::new(0.5, 0.7, 1.0));

        let down = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::NEG_Y));
        assert_eq!(down, Color::ONE);
    }

    #[test]
    fn test_miss_returns_sky() {
        let scene = single_sphere(Material::lambertian(Color::splat(0.5)));
        let mut rng = StdRng::seed_from_u64(1);

        let up = ray_color(&Ray::new(Vec3::ZERO, Vec3::Y), &scene, 10, &mut rng);
        assert_eq!(up, Color::new(0.5, 0.7, 1.0));

        let down = ray_color(&Ray::new(Vec3::ZERO, Vec3::NEG_Y), &scene, 10, &mut rng);
        assert_eq!(down, Color::ONE);
    }

    #[test]
    fn test_zero_depth_is_black() {
        let scene = Scene::new().unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let color = ray_color(&Ray::new(Vec3::ZERO, Vec3::Y), &scene, 0, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_emissive_renders_black() {
        let scene = single_sphere(Material::emissive());
        let mut rng = StdRng::seed_from_u64(3);
        let color = ray_color(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &scene, 8, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_mirror_tints_reflected_sky() {
        // A head-on perfect mirror sends the ray straight back at the sky
        let albedo = Color::new(0.8, 0.6, 0.4);
        let scene = single_sphere(Material::metal(albedo, 0.0));
        let mut rng = StdRng::seed_from_u64(4);

        let color = ray_color(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &scene, 4, &mut rng);
        let horizon = lerp(Color::ONE, Color::new(0.5, 0.7, 1.0), 0.5);
        assert!((color - albedo * horizon).length() < 1e-5);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(Color::ZERO), Color::ZERO);
        assert_eq!(linear_to_gamma(Color::ONE), Color::ONE);
        assert_eq!(linear_to_gamma(Color::new(-1.0, 0.25, 4.0)), Color::new(0.0, 0.5, 2.0));
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::ONE), [255, 255, 255, 255]);
        assert_eq!(color_to_rgba(Color::new(2.0, -1.0, 0.5)), [255, 0, 127, 255]);
    }

    #[test]
    fn test_quality_toggle() {
        let mut settings = RenderSettings::interactive(10, 20);
        assert_eq!((settings.samples_per_pixel, settings.max_depth), (1, 2));

        settings.toggle_mode();
        assert_eq!(settings.mode, QualityMode::HighQuality);
        assert_eq!((settings.samples_per_pixel, settings.max_depth), (10, 20));

        settings.toggle_mode();
        assert_eq!(settings.mode, QualityMode::Interactive);
        assert_eq!((settings.samples_per_pixel, settings.max_depth), (1, 2));
    }

    #[test]
    fn test_render_pixel() {
        let scene = single_sphere(Material::lambertian(Color::new(0.5, 0.5, 0.5)));
        let camera = Camera::new()
            .with_resolution(10, 10)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        let settings = RenderSettings::interactive(4, 5);
        let ctx = RenderContext::new(&camera, &scene, &settings);
        let mut rng = StdRng::seed_from_u64(42);

        // Center pixel hits the sphere; the corner sees open sky
        let center = render_pixel(&ctx, 5, 5, &mut rng);
        let corner = render_pixel(&ctx, 0, 0, &mut rng);
        assert!(center.length() < corner.length());
        assert!(corner.length() > 0.0);
    }
}
