//! Branchwork headless demo
//!
//! Draws a synthetic wave stroke, runs ten seconds of frames and logs what
//! the engines did. Pass a settings JSON path as the first argument to
//! override the defaults; run with `RUST_LOG=info` (or `debug`) to see output.

use std::path::PathBuf;

use glam::Vec2;

use branchwork::consts::FRAME_MS;
use branchwork::shape::{Recognition, ShapeKind};
use branchwork::{Settings, Sketch, SketchEvent};

const DEMO_FRAMES: usize = 600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Branchwork (native) starting...");

    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load_from(&path),
        None => Settings::default(),
    };
    log::info!(
        "Mode {}, complexity {}, speed {}",
        settings.growth.drawing_mode.as_str(),
        settings.growth.branch_complexity,
        settings.growth.growth_speed
    );

    let mut sketch = Sketch::from_entropy(settings);
    let width = sketch.physics().canvas_size().x;
    let height = sketch.physics().canvas_size().y;
    let stroke: Vec<Vec2> = (0..80)
        .map(|i| {
            let t = i as f32 / 79.0;
            Vec2::new(
                width * (0.15 + 0.7 * t),
                height * 0.5 + (t * std::f32::consts::TAU * 2.0).sin() * height * 0.15,
            )
        })
        .collect();

    let seeded = sketch.commit_stroke(&stroke, 0.0, Some(Recognition::new(ShapeKind::Wave, 0.9)));
    log::info!("Seeded {} branches", seeded);

    let mut blooms = 0usize;
    for frame in 1..=DEMO_FRAMES {
        sketch.frame(frame as f64 * FRAME_MS);
        for event in sketch.drain_events() {
            match event {
                SketchEvent::Bloom { .. } => blooms += 1,
                SketchEvent::ShapeRecognized { kind, confidence, centroid } => {
                    log::info!(
                        "Shape {} ({:.2}) at ({:.0}, {:.0})",
                        kind.as_str(),
                        confidence,
                        centroid.x,
                        centroid.y
                    );
                }
            }
        }
        if frame % 120 == 0 {
            log::info!(
                "t={:.1}s branches={} grown={} blooms={} energy={:.3}",
                frame as f64 * FRAME_MS / 1000.0,
                sketch.growth().len(),
                sketch.growth().completed_count(),
                blooms,
                sketch.physics().kinetic_energy()
            );
        }
    }

    let deepest = sketch
        .growth()
        .branches()
        .iter()
        .map(|b| b.generation)
        .max()
        .unwrap_or(0);
    println!(
        "{} branches ({} grown, deepest generation {}), {} blooms, {} physics points",
        sketch.growth().len(),
        sketch.growth().completed_count(),
        deepest,
        blooms,
        sketch.physics().len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web
}
