//! End-to-end frame rendering through the tile scheduler.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use raytile_renderer::{
    demo_scene, encode_tga, generate_tiles, Camera, DemoOptions, FrameBuffer, RenderContext,
    RenderSettings, SchedulerOptions, Strategy, TileScheduler, Vec3,
};

fn small_camera(width: u32, height: u32) -> Camera {
    Camera::new()
        .with_resolution(width, height)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
}

fn render(
    camera: &Camera,
    settings: &RenderSettings,
    tile_size: u32,
    num_threads: usize,
    strategy: Strategy,
) -> FrameBuffer {
    let scene = demo_scene(&DemoOptions::default()).unwrap();
    let ctx = RenderContext::new(camera, &scene, settings);
    let scheduler = TileScheduler::new(SchedulerOptions {
        tile_size,
        num_threads,
        strategy,
    })
    .unwrap();

    let mut frame = FrameBuffer::default();
    let stats = scheduler.render(&ctx, &mut frame).unwrap();
    assert_eq!(
        stats.pixels_written,
        camera.image_width() as u64 * camera.image_height() as u64
    );
    frame
}

#[test]
fn tiles_cover_every_pixel_once() {
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..50 {
        let width = rng.gen_range(1..300);
        let height = rng.gen_range(1..300);
        let tile_size = rng.gen_range(1..100);

        let mut hits = vec![0u8; (width * height) as usize];
        for tile in generate_tiles(width, height, tile_size) {
            assert!(tile.width >= 1 && tile.width <= tile_size);
            assert!(tile.height >= 1 && tile.height <= tile_size);
            for y in tile.y..tile.y + tile.height {
                for x in tile.x..tile.x + tile.width {
                    hits[(y * width + x) as usize] += 1;
                }
            }
        }

        assert!(
            hits.iter().all(|&n| n == 1),
            "{width}x{height} with {tile_size}px tiles"
        );
    }
}

#[test]
fn thread_count_does_not_change_the_image() {
    let camera = small_camera(72, 40);
    let settings = RenderSettings::interactive(4, 4);

    let single = render(&camera, &settings, 16, 1, Strategy::SlotPool);
    let many = render(&camera, &settings, 16, 7, Strategy::SlotPool);

    assert_eq!(single.pixels(), many.pixels());
}

#[test]
fn strategies_agree_in_high_quality() {
    let camera = small_camera(48, 27);
    let mut settings = RenderSettings::interactive(3, 6);
    settings.toggle_mode();

    let slots = render(&camera, &settings, 10, 3, Strategy::SlotPool);
    let stealing = render(&camera, &settings, 10, 3, Strategy::WorkStealing);

    assert_eq!(slots.pixels(), stealing.pixels());
    assert!(slots.pixels().iter().all(|p| p.a == 255));
}

#[test]
fn rendered_frame_exports_as_tga() {
    let camera = small_camera(20, 12);
    let settings = RenderSettings::default();
    let frame = render(&camera, &settings, 8, 4, Strategy::SlotPool);

    let bytes = encode_tga(&frame).unwrap();
    assert_eq!(bytes.len(), 18 + 20 * 12 * 4);
    assert_eq!(&bytes[12..16], &[20, 0, 12, 0]);

    // Last pixel is stored BGRA
    let last = frame.get(19, 11);
    assert_eq!(&bytes[bytes.len() - 4..], &[last.b, last.g, last.r, last.a]);
}
