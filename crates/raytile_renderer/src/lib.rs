//! raytile renderer - interactive CPU path tracing
//!
//! A Monte Carlo path tracer for scenes made of spheres. Frames are split
//! into square tiles and rendered in parallel, each tile writing only its
//! own pixels of a shared frame buffer.

mod camera;
mod controls;
mod demo;
mod export;
mod frame;
mod hittable;
mod material;
mod renderer;
mod scene;
mod scheduler;
mod sphere;
mod tile;

pub use camera::{Camera, MAX_VFOV, MIN_VFOV};
pub use controls::{CameraCommand, FOV_PRESETS, FOV_STEP};
pub use demo::{demo_scene, DemoOptions};
pub use export::{encode_tga, save_png, write_tga, ExportError, ExportResult, TGA_HEADER_LEN};
pub use frame::{FrameBuffer, FrameError, FrameResult, Presenter, Rgba8};
pub use hittable::{HitRecord, Hittable};
pub use material::{reflectance, Color, Material, Scatter};
pub use renderer::{
    clamp_01, color_to_rgba, linear_to_gamma, ray_color, render_pixel, sky_gradient, QualityMode,
    RenderContext, RenderSettings, INTERACTIVE_DEPTH, INTERACTIVE_SAMPLES, SHADOW_EPSILON,
};
pub use scene::{ObjectKind, Scene, SceneError, SceneObject, SceneResult, DEFAULT_SCENE_CAPACITY};
pub use scheduler::{
    default_thread_count, FrameStats, RenderError, RenderResult, SchedulerOptions, Strategy,
    TileScheduler,
};
pub use sphere::Sphere;
pub use tile::{
    generate_tiles, render_tile, split_into_tiles, tile_grid, Tile, TileView, DEFAULT_TILE_SIZE,
};

/// Re-export Vec3 and common math types from raytile_math
pub use raytile_math::{Interval, Ray, Vec3};
