//! Frame buffer handed from the renderer to presentation.

use bytemuck::{Pod, Zeroable};
use std::collections::TryReserveError;
use thiserror::Error;

/// Errors that can occur while acquiring frame storage.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Frame size {width}x{height} overflows the address space")]
    Overflow { width: u32, height: u32 },

    #[error("Failed to allocate a {width}x{height} frame: {source}")]
    Allocation {
        width: u32,
        height: u32,
        #[source]
        source: TryReserveError,
    },
}

pub type FrameResult<T> = Result<T, FrameError>;

/// One 8-bit RGBA pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Row-major RGBA8 image, top row first.
///
/// The pixel storage is reused across frames: [`FrameBuffer::reset`] keeps
/// the allocation when the size does not grow.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl FrameBuffer {
    /// Allocate a zeroed frame.
    pub fn new(width: u32, height: u32) -> FrameResult<Self> {
        let mut frame = Self::default();
        frame.reset(width, height)?;
        Ok(frame)
    }

    /// Prepare the buffer for a new frame of the given size, zeroing it.
    pub fn reset(&mut self, width: u32, height: u32) -> FrameResult<()> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(FrameError::Overflow { width, height })?;

        self.pixels.clear();
        self.pixels
            .try_reserve_exact(len)
            .map_err(|source| FrameError::Allocation {
                width,
                height,
                source,
            })?;
        self.pixels.resize(len, Rgba8::default());
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Rgba8 {
        self.pixels[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Rgba8) {
        let index = (y as usize) * (self.width as usize) + x as usize;
        self.pixels[index] = color;
    }

    /// Fill every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8) {
        self.pixels.fill(color);
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba8] {
        &mut self.pixels
    }

    /// Raw RGBA bytes, ready for upload to a texture or an image encoder.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Receives finished frames.
///
/// Frames are only handed over once every tile has been joined.
pub trait Presenter {
    type Error;

    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error>;
}
