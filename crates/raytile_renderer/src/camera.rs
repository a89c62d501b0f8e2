//! Camera for ray generation.

use raytile_math::{gen_f32, random_in_unit_disk, unit, Ray, Vec3};
use rand::RngCore;

/// Narrowest vertical field of view, in degrees.
pub const MIN_VFOV: f32 = 10.0;
/// Widest vertical field of view, in degrees.
pub const MAX_VFOV: f32 = 120.0;

/// Camera for generating rays into the scene.
///
/// Positioning and lens fields are inputs; everything under "derived" is
/// recomputed by [`Camera::update_view`], which has to run after every
/// change before the next frame generates rays.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    image_width: u32,
    image_height: u32,

    // Camera positioning
    position: Vec3,
    target: Vec3,
    up: Vec3,
    speed: f32,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Variation angle of rays through each pixel
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    // Derived (set by update_view())
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a camera with the demo defaults, already updated.
    pub fn new() -> Self {
        let mut camera = Self {
            image_width: 800,
            image_height: 450,
            position: Vec3::new(13.0, 2.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            speed: 2.5,
            vfov: 60.0,
            defocus_angle: 0.6,
            focus_dist: 10.0,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        };
        camera.update_view();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self.update_view();
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, position: Vec3, target: Vec3, up: Vec3) -> Self {
        self.position = position;
        self.target = target;
        self.up = up;
        self.update_view();
        self
    }

    /// Set lens settings. `vfov` is clamped to the supported range.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov.clamp(MIN_VFOV, MAX_VFOV);
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self.update_view();
        self
    }

    /// Set movement speed (world units per move step).
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Recompute the basis, viewport and defocus disk from the inputs.
    pub fn update_view(&mut self) {
        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.w = unit(self.position - self.target);
        self.u = unit(self.up.cross(self.w));
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.position - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.position
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.position + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Move along the viewing direction (negative `amount` moves back).
    pub fn move_forward(&mut self, amount: f32) {
        self.position += -self.w * self.speed * amount;
        self.update_view();
    }

    /// Move along the camera's right vector.
    pub fn move_right(&mut self, amount: f32) {
        self.position += self.u * self.speed * amount;
        self.update_view();
    }

    /// Move along the up vector.
    pub fn move_up(&mut self, amount: f32) {
        self.position += self.up * self.speed * amount;
        self.update_view();
    }

    /// Change the field of view by `delta` degrees, clamped to [10, 120].
    pub fn adjust_fov(&mut self, delta: f32) {
        self.set_fov(self.vfov + delta);
    }

    /// Set the field of view in degrees, clamped to [10, 120].
    pub fn set_fov(&mut self, vfov: f32) {
        self.vfov = vfov.clamp(MIN_VFOV, MAX_VFOV);
        self.update_view();
    }

    /// Change the output resolution for the next frame.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.image_width = width;
        self.image_height = height;
        self.update_view();
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn vfov(&self) -> f32 {
        self.vfov
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Orthonormal camera basis `(u, v, w)`; `-w` is the viewing direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// World position of the center of pixel (0, 0).
    pub fn pixel00_loc(&self) -> Vec3 {
        self.pixel00_loc
    }

    /// World-space step between horizontally and vertically adjacent pixels.
    pub fn pixel_deltas(&self) -> (Vec3, Vec3) {
        (self.pixel_delta_u, self.pixel_delta_v)
    }

    /// Defocus disk basis vectors.
    pub fn defocus_disk(&self) -> (Vec3, Vec3) {
        (self.defocus_disk_u, self.defocus_disk_v)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pinhole(width: u32, height: u32) -> Camera {
        Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_camera_basis() {
        let camera = pinhole(800, 600);
        let (u, v, w) = camera.basis();

        assert!(approx(u, Vec3::X));
        assert!(approx(v, Vec3::Y));
        assert!(approx(w, Vec3::Z));
    }

    #[test]
    fn test_viewport_geometry() {
        // 90 degrees at focus 1 gives a 2x2 viewport
        let camera = pinhole(100, 100);
        let (du, dv) = camera.pixel_deltas();

        assert!(approx(du, Vec3::new(0.02, 0.0, 0.0)));
        assert!(approx(dv, Vec3::new(0.0, -0.02, 0.0)));
        assert!(approx(camera.pixel00_loc(), Vec3::new(-0.99, 0.99, -1.0)));
    }

    #[test]
    fn test_aspect_ratio_widens_viewport() {
        let camera = pinhole(200, 100);
        let (du, dv) = camera.pixel_deltas();

        // Square pixels: the viewport is twice as wide as tall
        assert!((du.length() - dv.length()).abs() < 1e-6);
        assert!(approx(camera.pixel00_loc(), Vec3::new(-1.99, 0.99, -1.0)));
    }

    #[test]
    fn test_camera_ray_direction() {
        let camera = pinhole(100, 100);
        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point roughly towards -Z from the camera position
        let ray = camera.get_ray(50, 50, &mut rng);
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!(ray.direction().z < 0.0);
        assert!(ray.direction().x.abs() < 0.03);
        assert!(ray.direction().y.abs() < 0.03);
    }

    #[test]
    fn test_samples_stay_inside_pixel() {
        let camera = pinhole(100, 100);
        let (du, dv) = camera.pixel_deltas();
        let center = camera.pixel00_loc() + 10.0 * du + 20.0 * dv;
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..200 {
            let ray = camera.get_ray(10, 20, &mut rng);
            let offset = ray.at(1.0) - center;
            assert!(offset.x.abs() <= 0.5 * du.length() + 1e-6);
            assert!(offset.y.abs() <= 0.5 * dv.length() + 1e-6);
        }
    }

    #[test]
    fn test_defocus_jitters_origin_within_disk() {
        let camera = Camera::new()
            .with_resolution(64, 64)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(60.0, 10.0, 5.0);
        let (disk_u, _) = camera.defocus_disk();
        let radius = 5.0 * 5.0f32.to_radians().tan();
        assert!((disk_u.length() - radius).abs() < 1e-5);

        let mut rng = StdRng::seed_from_u64(10);
        let mut moved = false;
        for _ in 0..100 {
            let ray = camera.get_ray(32, 32, &mut rng);
            assert!(ray.origin().length() <= radius + 1e-5);
            assert!(ray.origin().z.abs() < 1e-6);
            moved |= ray.origin() != Vec3::ZERO;
        }
        assert!(moved);
    }

    #[test]
    fn test_fov_is_clamped() {
        let mut camera = pinhole(10, 10);

        camera.adjust_fov(100.0);
        assert_eq!(camera.vfov(), MAX_VFOV);

        camera.set_fov(1.0);
        assert_eq!(camera.vfov(), MIN_VFOV);

        camera.adjust_fov(5.0);
        assert_eq!(camera.vfov(), 15.0);
    }

    #[test]
    fn test_fov_change_updates_view() {
        let mut camera = pinhole(100, 100);
        let (before, _) = camera.pixel_deltas();

        camera.set_fov(45.0);
        let (after, _) = camera.pixel_deltas();
        assert!(after.length() < before.length());
    }

    #[test]
    fn test_resolution_change_updates_view() {
        let mut camera = Camera::new();
        camera.set_resolution(40, 20);

        let fresh = Camera::new().with_resolution(40, 20);
        assert_eq!((camera.image_width(), camera.image_height()), (40, 20));
        assert_eq!(camera.pixel_deltas(), fresh.pixel_deltas());
        assert_eq!(camera.pixel00_loc(), fresh.pixel00_loc());
    }

    #[test]
    fn test_movement_follows_basis() {
        let target = Vec3::new(0.0, 0.0, -100.0);
        let mut camera = Camera::new()
            .with_resolution(10, 10)
            .with_position(Vec3::ZERO, target, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_speed(2.0);

        camera.move_forward(1.0);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, -2.0)));

        camera.move_up(1.0);
        assert!(approx(camera.position(), Vec3::new(0.0, 2.0, -2.0)));

        camera.move_right(-1.0);
        assert!((camera.position().x + 2.0).abs() < 1e-3);

        // Derived fields match a camera built directly at the new position
        let fresh = Camera::new()
            .with_resolution(10, 10)
            .with_position(camera.position(), target, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        assert!(approx(camera.pixel00_loc(), fresh.pixel00_loc()));
        assert_eq!(camera.pixel_deltas(), fresh.pixel_deltas());
    }
}
