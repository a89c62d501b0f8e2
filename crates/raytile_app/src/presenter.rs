//! Frame presentation for headless sessions.

use raytile_renderer::{save_png, write_tga, ExportError, FrameBuffer, Presenter};
use std::path::PathBuf;

/// Counts presented frames and writes the next one to disk on request.
#[derive(Debug, Default)]
pub struct CapturePresenter {
    tga_path: Option<PathBuf>,
    png_path: Option<PathBuf>,
    capture_next: bool,
    frames: u64,
}

impl CapturePresenter {
    pub fn new(tga_path: Option<PathBuf>, png_path: Option<PathBuf>) -> Self {
        Self {
            tga_path,
            png_path,
            capture_next: false,
            frames: 0,
        }
    }

    /// True when there is anywhere to write a capture.
    pub fn has_targets(&self) -> bool {
        self.tga_path.is_some() || self.png_path.is_some()
    }

    /// Write the next presented frame to the configured paths.
    pub fn request_capture(&mut self) {
        self.capture_next = true;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Write `frame` to the configured paths without counting it as presented.
    pub fn capture(&mut self, frame: &FrameBuffer) -> Result<(), ExportError> {
        self.capture_next = false;

        if let Some(path) = &self.tga_path {
            write_tga(frame, path)?;
        }
        if let Some(path) = &self.png_path {
            save_png(frame, path)?;
        }
        Ok(())
    }
}

impl Presenter for CapturePresenter {
    type Error = ExportError;

    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error> {
        self.frames += 1;
        log::debug!(
            "Presented frame {} ({}x{})",
            self.frames,
            frame.width(),
            frame.height()
        );

        if self.capture_next {
            self.capture(frame)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raytile_renderer::Rgba8;

    #[test]
    fn test_capture_only_on_request() {
        let dir = std::env::temp_dir().join(format!("raytile-capture-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let tga = dir.join("capture.tga");

        let mut presenter = CapturePresenter::new(Some(tga.clone()), None);
        assert!(presenter.has_targets());

        let mut frame = FrameBuffer::new(4, 2).unwrap();
        frame.fill(Rgba8::new(0, 128, 255, 255));

        presenter.present(&frame).unwrap();
        assert!(!tga.exists());

        presenter.request_capture();
        presenter.present(&frame).unwrap();
        assert_eq!(std::fs::read(&tga).unwrap().len(), 18 + 4 * 2 * 4);

        // The request is consumed by one frame
        std::fs::remove_file(&tga).unwrap();
        presenter.present(&frame).unwrap();
        assert!(!tga.exists());
        assert_eq!(presenter.frames(), 3);

        // A direct capture writes the file but is not a presented frame
        presenter.request_capture();
        presenter.capture(&frame).unwrap();
        assert!(tga.exists());
        assert_eq!(presenter.frames(), 3);

        // ...and it satisfies the pending request
        std::fs::remove_file(&tga).unwrap();
        presenter.present(&frame).unwrap();
        assert!(!tga.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
