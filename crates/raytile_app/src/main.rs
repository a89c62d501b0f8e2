mod config;
mod presenter;

use anyhow::{Context, Result};
use config::AppConfig;
use presenter::CapturePresenter;
use raytile_renderer::{demo_scene, FrameBuffer, Presenter, RenderContext, TileScheduler};

fn run(config: AppConfig) -> Result<()> {
    let mut presenter = CapturePresenter::new(config.capture_tga.clone(), config.capture_png.clone());
    run_session(&config, &mut presenter)?;
    log::info!("Presented {} frames", presenter.frames());
    Ok(())
}

/// Render the first frame, then one frame per command that changed anything.
/// The last frame is captured when the presenter has somewhere to write it.
fn run_session(config: &AppConfig, presenter: &mut CapturePresenter) -> Result<()> {
    let scene = demo_scene(&config.demo_options()).context("Failed to build demo scene")?;
    let mut camera = config.build_camera();
    let mut settings = config.render_settings();
    let scheduler =
        TileScheduler::new(config.scheduler_options()).context("Failed to start scheduler")?;
    let mut frame = FrameBuffer::default();

    log::info!(
        "Rendering {}x{} with {} threads ({:?}, {}px tiles)",
        camera.image_width(),
        camera.image_height(),
        scheduler.num_threads(),
        scheduler.strategy(),
        scheduler.tile_size()
    );

    let mut dirty = true;
    let mut commands = config.script.iter().peekable();
    loop {
        if dirty {
            let ctx = RenderContext::new(&camera, &scene, &settings);
            let stats = scheduler
                .render(&ctx, &mut frame)
                .context("Frame render failed")?;
            log::info!(
                "Frame: {} tiles, {:?} mode, {} spp, {:.2?}",
                stats.tiles,
                settings.mode,
                settings.samples_per_pixel,
                stats.elapsed
            );

            if commands.peek().is_none() && presenter.has_targets() {
                presenter.request_capture();
            }
            presenter.present(&frame).context("Failed to present frame")?;
        }

        let Some(command) = commands.next() else {
            break;
        };
        dirty = command.apply(&mut camera, &mut settings);
        if !dirty {
            log::warn!("Command {:?} had no effect", command);
        }
    }

    // Trailing commands that changed nothing leave the last frame uncaptured
    if !dirty && presenter.has_targets() {
        presenter.capture(&frame).context("Failed to capture frame")?;
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting raytile");

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(&path),
        None => Ok(AppConfig::default()),
    };

    if let Err(e) = config.and_then(run) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raytile_renderer::CameraCommand;
    use std::path::PathBuf;

    fn tiny_config(script: Vec<CameraCommand>, capture: PathBuf) -> AppConfig {
        AppConfig {
            width: 16,
            aspect_ratio: 2.0,
            tile_size: 8,
            threads: 2,
            script,
            capture_tga: Some(capture),
            ..AppConfig::default()
        }
    }

    fn capture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("raytile-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_session_captures_last_rendered_frame() {
        let dir = capture_dir("session");
        let tga = dir.join("last.tga");
        let config = tiny_config(vec![CameraCommand::MoveForward], tga.clone());

        let mut presenter = CapturePresenter::new(config.capture_tga.clone(), None);
        run_session(&config, &mut presenter).unwrap();

        // Initial frame plus one per command; the capture adds none
        assert_eq!(presenter.frames(), 2);
        assert_eq!(std::fs::read(&tga).unwrap().len(), 18 + 16 * 8 * 4);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_session_captures_after_trailing_no_op() {
        let dir = capture_dir("no-op");
        let tga = dir.join("last.tga");
        let config = tiny_config(vec![CameraCommand::FovPreset(99)], tga.clone());

        let mut presenter = CapturePresenter::new(config.capture_tga.clone(), None);
        run_session(&config, &mut presenter).unwrap();

        assert_eq!(presenter.frames(), 1);
        assert!(tga.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
