//! Session configuration, loaded from JSON.

use anyhow::{ensure, Context, Result};
use raytile_math::Vec3;
use raytile_renderer::{Camera, CameraCommand, DemoOptions, RenderSettings, SchedulerOptions, Strategy};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Camera placement and lens.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub vfov: f32,
    pub speed: f32,
    pub defocus_angle: f32,
    pub focus_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [13.0, 2.0, 3.0],
            target: [0.0, 0.0, 0.0],
            vfov: 60.0,
            speed: 2.5,
            defocus_angle: 0.6,
            focus_distance: 10.0,
        }
    }
}

/// Sample budget once the view settles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HighQualityConfig {
    pub samples: u32,
    pub depth: u32,
}

impl Default for HighQualityConfig {
    fn default() -> Self {
        Self {
            samples: 50,
            depth: 50,
        }
    }
}

/// Everything a session needs; every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub width: u32,
    pub aspect_ratio: f32,
    pub tile_size: u32,
    /// 0 picks twice the hardware thread count
    pub threads: usize,
    pub strategy: Strategy,
    pub camera: CameraConfig,
    pub high_quality: HighQualityConfig,
    pub random_field: bool,
    pub scene_seed: u64,
    /// Commands applied one frame at a time after the first frame
    pub script: Vec<CameraCommand>,
    pub capture_tga: Option<PathBuf>,
    pub capture_png: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let demo = DemoOptions::default();
        let scheduler = SchedulerOptions::default();
        Self {
            width: 800,
            aspect_ratio: 16.0 / 9.0,
            tile_size: scheduler.tile_size,
            threads: scheduler.num_threads,
            strategy: scheduler.strategy,
            camera: CameraConfig::default(),
            high_quality: HighQualityConfig::default(),
            random_field: demo.random_field,
            scene_seed: demo.seed,
            script: Vec::new(),
            capture_tga: None,
            capture_png: None,
        }
    }
}

impl AppConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.width > 0, "width must be positive");
        ensure!(
            self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0,
            "aspect_ratio must be positive, got {}",
            self.aspect_ratio
        );
        ensure!(self.tile_size > 0, "tile_size must be positive");
        ensure!(
            self.high_quality.samples > 0,
            "high_quality.samples must be positive"
        );
        ensure!(self.high_quality.depth > 0, "high_quality.depth must be positive");
        ensure!(
            self.camera.position != self.camera.target,
            "camera position and target must differ"
        );
        Ok(())
    }

    /// Image height from width and aspect ratio, at least one row.
    pub fn height(&self) -> u32 {
        ((self.width as f32 / self.aspect_ratio).round() as u32).max(1)
    }

    pub fn build_camera(&self) -> Camera {
        let cam = &self.camera;
        Camera::new()
            .with_resolution(self.width, self.height())
            .with_position(Vec3::from_array(cam.position), Vec3::from_array(cam.target), Vec3::Y)
            .with_lens(cam.vfov, cam.defocus_angle, cam.focus_distance)
            .with_speed(cam.speed)
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings::interactive(self.high_quality.samples, self.high_quality.depth)
    }

    pub fn scheduler_options(&self) -> SchedulerOptions {
        SchedulerOptions {
            tile_size: self.tile_size,
            num_threads: self.threads,
            strategy: self.strategy,
        }
    }

    pub fn demo_options(&self) -> DemoOptions {
        DemoOptions {
            random_field: self.random_field,
            seed: self.scene_seed,
        }
    }
}
