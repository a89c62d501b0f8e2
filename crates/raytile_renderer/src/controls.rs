//! Camera navigation commands.
//!
//! Keyboard input in a viewer maps to these commands; scripted sessions
//! load them from JSON.

use crate::renderer::{QualityMode, RenderSettings};
use crate::Camera;
use serde::{Deserialize, Serialize};

/// Field-of-view presets in degrees, selected by index.
pub const FOV_PRESETS: [f32; 4] = [15.0, 45.0, 60.0, 100.0];

/// Degrees added or removed by `IncreaseFov` / `DecreaseFov`.
pub const FOV_STEP: f32 = 5.0;

/// A single camera or render-mode change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraCommand {
    MoveForward,
    MoveBackward,
    MoveRight,
    MoveLeft,
    MoveUp,
    MoveDown,
    IncreaseFov,
    DecreaseFov,
    /// Change the field of view by this many degrees
    AdjustFov(f32),
    /// Set the field of view in degrees
    SetFov(f32),
    /// Select one of [`FOV_PRESETS`]
    FovPreset(usize),
    ToggleQuality,
    /// Output size for the next frame, e.g. after a window resize
    Resize { width: u32, height: u32 },
}

impl CameraCommand {
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            Self::MoveForward
                | Self::MoveBackward
                | Self::MoveRight
                | Self::MoveLeft
                | Self::MoveUp
                | Self::MoveDown
        )
    }

    /// Apply the command. Returns true if anything changed.
    ///
    /// Movement is ignored while rendering in high quality; switch back to
    /// interactive mode to navigate.
    pub fn apply(&self, camera: &mut Camera, settings: &mut RenderSettings) -> bool {
        if self.is_movement() && settings.mode == QualityMode::HighQuality {
            log::debug!("Ignoring {:?} in high quality mode", self);
            return false;
        }

        match *self {
            Self::MoveForward => camera.move_forward(1.0),
            Self::MoveBackward => camera.move_forward(-1.0),
            Self::MoveRight => camera.move_right(1.0),
            Self::MoveLeft => camera.move_right(-1.0),
            Self::MoveUp => camera.move_up(1.0),
            Self::MoveDown => camera.move_up(-1.0),
            Self::IncreaseFov => camera.adjust_fov(FOV_STEP),
            Self::DecreaseFov => camera.adjust_fov(-FOV_STEP),
            Self::AdjustFov(delta) => camera.adjust_fov(delta),
            Self::SetFov(vfov) => camera.set_fov(vfov),
            Self::FovPreset(index) => match FOV_PRESETS.get(index) {
                Some(&vfov) => camera.set_fov(vfov),
                None => {
                    log::warn!("No FOV preset {} (have {})", index, FOV_PRESETS.len());
                    return false;
                }
            },
            Self::Resize { width, height } => {
                if width == 0 || height == 0 {
                    log::warn!("Ignoring resize to {}x{}", width, height);
                    return false;
                }
                camera.set_resolution(width, height);
            }
            Self::ToggleQuality => {
                settings.toggle_mode();
                log::info!(
                    "Quality: {:?} ({} spp, depth {})",
                    settings.mode,
                    settings.samples_per_pixel,
                    settings.max_depth
                );
            }
        }

        true
    }
}
