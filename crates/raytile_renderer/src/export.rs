//! Writing finished frames to disk.

use crate::FrameBuffer;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Size of the uncompressed true-color TGA header.
pub const TGA_HEADER_LEN: usize = 18;

/// Errors that can occur while exporting a frame.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Frame {width}x{height} is too large for TGA")]
    TooLarge { width: u32, height: u32 },

    #[error("Pixel data does not match a {width}x{height} frame")]
    BufferMismatch { width: u32, height: u32 },
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Encode a frame as an uncompressed 32-bit TGA, top row first.
pub fn encode_tga(frame: &FrameBuffer) -> ExportResult<Vec<u8>> {
    let (width, height) = (frame.width(), frame.height());
    let too_large = || ExportError::TooLarge { width, height };
    let w = u16::try_from(width).map_err(|_| too_large())?;
    let h = u16::try_from(height).map_err(|_| too_large())?;

    let mut header = [0u8; TGA_HEADER_LEN];
    header[2] = 2; // uncompressed true-color
    header[12..14].copy_from_slice(&w.to_le_bytes());
    header[14..16].copy_from_slice(&h.to_le_bytes());
    header[16] = 32;
    header[17] = 0x20; // top-left origin

    let mut bytes = Vec::with_capacity(TGA_HEADER_LEN + frame.as_bytes().len());
    bytes.extend_from_slice(&header);
    for p in frame.pixels() {
        bytes.extend_from_slice(&[p.b, p.g, p.r, p.a]);
    }

    Ok(bytes)
}

/// Write a frame to `path` as TGA.
pub fn write_tga(frame: &FrameBuffer, path: impl AsRef<Path>) -> ExportResult<()> {
    let path = path.as_ref();
    let bytes = encode_tga(frame)?;
    fs::write(path, bytes)?;
    log::info!(
        "Wrote {}x{} TGA to {}",
        frame.width(),
        frame.height(),
        path.display()
    );
    Ok(())
}

/// Write a frame to `path` as PNG.
pub fn save_png(frame: &FrameBuffer, path: impl AsRef<Path>) -> ExportResult<()> {
    let path = path.as_ref();
    let (width, height) = (frame.width(), frame.height());
    let img = image::RgbaImage::from_raw(width, height, frame.as_bytes().to_vec())
        .ok_or(ExportError::BufferMismatch { width, height })?;

    img.save_with_format(path, image::ImageFormat::Png)?;
    log::info!("Wrote {}x{} PNG to {}", width, height, path.display());
    Ok(())
}
