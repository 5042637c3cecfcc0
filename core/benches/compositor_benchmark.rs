use std::path::PathBuf;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use screenpad_core::display::frame::PixelGrid;
use screenpad_core::display::overlay::{FinalFrame, StaticOverlayAssets};
use screenpad_core::display::phosphor::PhosphorCompositor;
use screenpad_core::peripherals::PeripheralStateStore;
use screenpad_core::render::{Presenter, RenderLoop, ToneGenerator};
use screenpad_core::CrtOptions;

struct Discard;

impl Presenter for Discard {
    fn present(&mut self, frame: FinalFrame) {
        black_box(frame);
    }
}

impl ToneGenerator for Discard {
    fn start_tone(&mut self) {}
    fn stop_tone(&mut self) {}
    fn set_frequency(&mut self, _hz: u32) {}
}

fn checkerboard() -> PixelGrid {
    let mut grid = PixelGrid::blank(64, 32);
    for y in 0..32 {
        for x in 0..64 {
            grid.set_pixel(x, y, (x + y) % 2 == 0);
        }
    }
    grid
}

fn compositor_benchmark(c: &mut Criterion) {
    let assets_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../assets");
    let assets = StaticOverlayAssets::from_files(assets_dir.join("crt_bezel.png"), assets_dir.join("crt_glare.png")).unwrap();

    let grid = Arc::new(checkerboard());
    let mut phosphor = PhosphorCompositor::new(CrtOptions::default());
    c.bench_function("Phosphor Update", |b| b.iter(|| black_box(phosphor.update(&grid).width())));

    let store = Arc::new(PeripheralStateStore::new(checkerboard()));
    let mut render_loop = RenderLoop::new(store, CrtOptions::default(), assets, Discard, Discard).unwrap();
    c.bench_function("Render Tick", |b| b.iter(|| render_loop.tick()));
}

criterion_group!(benches, compositor_benchmark);

criterion_main!(benches);
