//! The built-in demo scene: a ground plane, three feature spheres and an
//! optional field of small random spheres.

use crate::{Color, Material, Scene, SceneResult, Sphere};
use rand::rngs::StdRng;
use rand::SeedableRng;
use raytile_math::{gen_f32, gen_range_f32, random_vec3, random_vec3_range, Vec3};

/// Small spheres are kept this far from the metal feature sphere.
const FIELD_CLEARANCE: f32 = 0.9;
const FIELD_RADIUS: f32 = 0.2;

/// Demo scene options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoOptions {
    /// Scatter a 22x22 grid of small spheres around the feature spheres
    pub random_field: bool,
    /// Seed for the random field
    pub seed: u64,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            random_field: false,
            seed: 42,
        }
    }
}

/// Build the demo scene.
pub fn demo_scene(options: &DemoOptions) -> SceneResult<Scene> {
    let mut scene = Scene::new()?;

    // Ground
    scene.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::lambertian(Color::splat(0.5)),
    ))?;

    if options.random_field {
        add_random_field(&mut scene, options.seed)?;
    }

    // Three main spheres
    scene.add(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Material::dielectric(1.5),
    ))?;
    scene.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Material::lambertian(Color::new(0.4, 0.2, 0.1)),
    ))?;
    scene.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Material::metal(Color::new(0.7, 0.6, 0.5), 0.0),
    ))?;

    log::info!("Demo scene: {} spheres", scene.len());
    Ok(scene)
}

fn add_random_field(scene: &mut Scene, seed: u64) -> SceneResult<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let keep_clear = Vec3::new(4.0, FIELD_RADIUS, 0.0);

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(&mut rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(&mut rng),
                FIELD_RADIUS,
                b as f32 + 0.9 * gen_f32(&mut rng),
            );

            if (center - keep_clear).length() <= FIELD_CLEARANCE {
                continue;
            }

            let material = if choose_mat < 0.8 {
                Material::lambertian(random_vec3(&mut rng) * random_vec3(&mut rng))
            } else if choose_mat < 0.95 {
                let albedo = random_vec3_range(&mut rng, 0.5, 1.0);
                Material::metal(albedo, gen_range_f32(&mut rng, 0.0, 0.5))
            } else {
                Material::dielectric(1.5)
            };

            scene.add(Sphere::new(center, FIELD_RADIUS, material))?;
        }
    }

    Ok(())
}
