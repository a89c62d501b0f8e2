//! Tile-based frame partitioning.
//!
//! Divides the frame into square tiles that are rendered independently.
//! Each tile gets exclusive mutable access to its own pixels, so workers
//! write straight into the shared frame buffer without synchronization.

use crate::renderer::{color_to_rgba, linear_to_gamma, render_pixel, RenderContext};
use crate::{FrameBuffer, Rgba8};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 64;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of tile's top-left corner
    pub x: u32,
    /// Y coordinate of tile's top-left corner
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
    /// Row-major index of this tile
    pub index: usize,
}

impl Tile {
    /// Create a new tile.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Seed for this tile's random generator, derived from its origin.
    pub fn seed(&self) -> u64 {
        self.x as u64 * 1000 + self.y as u64 + 1
    }

    /// True when (x, y) lies inside this tile.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Number of tile columns and rows covering a `width` x `height` frame.
pub fn tile_grid(width: u32, height: u32, tile_size: u32) -> (u32, u32) {
    assert!(tile_size > 0, "tile size must be positive");
    (width.div_ceil(tile_size), height.div_ceil(tile_size))
}

/// Generate tiles for an image in row-major order.
///
/// Tiles in the last row and column are clipped to the image bounds.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let (tiles_x, tiles_y) = tile_grid(width, height, tile_size);
    let mut tiles = Vec::with_capacity(tiles_x as usize * tiles_y as usize);

    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x = tx * tile_size;
            let y = ty * tile_size;
            let w = tile_size.min(width - x);
            let h = tile_size.min(height - y);
            let index = tiles.len();
            tiles.push(Tile::new(x, y, w, h, index));
        }
    }

    tiles
}

/// A tile together with exclusive access to its pixels.
#[derive(Debug)]
pub struct TileView<'a> {
    pub tile: Tile,
    /// One slice per pixel row of the tile, top to bottom
    rows: Vec<&'a mut [Rgba8]>,
}

impl<'a> TileView<'a> {
    pub fn rows(&self) -> &[&'a mut [Rgba8]] {
        &self.rows
    }
}

/// Split a frame into disjoint per-tile views, in row-major tile order.
pub fn split_into_tiles(frame: &mut FrameBuffer, tile_size: u32) -> Vec<TileView<'_>> {
    let (width, height) = (frame.width(), frame.height());
    let (tiles_x, _) = tile_grid(width, height, tile_size);

    let mut views: Vec<TileView<'_>> = generate_tiles(width, height, tile_size)
        .into_iter()
        .map(|tile| TileView {
            tile,
            rows: Vec::with_capacity(tile.height as usize),
        })
        .collect();

    if views.is_empty() {
        return views;
    }

    let tile_size = tile_size as usize;
    for (y, row) in frame.pixels_mut().chunks_mut(width as usize).enumerate() {
        let first = (y / tile_size) * tiles_x as usize;
        for (tx, segment) in row.chunks_mut(tile_size).enumerate() {
            views[first + tx].rows.push(segment);
        }
    }

    views
}

/// Render one tile into its slice of the frame buffer.
///
/// The tile owns its random generator, seeded from its origin, so no state
/// is shared with other workers. Returns the number of pixels written.
pub fn render_tile(ctx: &RenderContext<'_>, view: TileView<'_>) -> u64 {
    let TileView { tile, rows } = view;
    let mut rng = StdRng::seed_from_u64(tile.seed());
    let mut written = 0;

    for (local_y, row) in rows.into_iter().enumerate() {
        let y = tile.y + local_y as u32;
        for (local_x, pixel) in row.iter_mut().enumerate() {
            let x = tile.x + local_x as u32;
            let color = linear_to_gamma(render_pixel(ctx, x, y, &mut rng));
            *pixel = Rgba8::from(color_to_rgba(color));
            written += 1;
        }
    }

    written
}
