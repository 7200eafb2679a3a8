//! # Headless Walker Demo
//!
//! Drives the terrain core without a renderer: streams chunks around a
//! walker strolling across procedurally generated terrain and logs what a
//! frame would draw. Useful for profiling chunk generation and sanity
//! checking collision behavior.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release [-- config.json]
//! ```

use std::path::Path;

use cgmath::{Point3, Vector3};
use log::info;

use voxel_terrain::{ChunkStore, TerrainError, Walker, WorldConfig};

const TICKS: u32 = 600;
const DT: f32 = 1.0 / 60.0;

fn run() -> Result<(), TerrainError> {
    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::from_json_file(Path::new(&path))?,
        None => WorldConfig::default(),
    };
    config.validate()?;

    let spawn_height = config.max_height + config.player_height;
    let mut store = ChunkStore::new(config)?;
    let mut walker = Walker::new(Point3::new(0.0, spawn_height, 0.0));

    // A steady diagonal stroll; the intent vector would normally come from
    // input handling.
    let walk_dir = Vector3::new(0.12, 0.0, 0.05);

    for tick in 0..TICKS {
        walker.step(&mut store, walk_dir, DT)?;
        if walker.on_ground() && tick % 180 == 0 {
            walker.jump(store.config().jump_velocity);
        }
        if tick % 60 == 0 {
            let cubes: usize = store.chunks().map(|chunk| chunk.num_cubes()).sum();
            let p = walker.position();
            info!(
                "tick {}: walker at ({:.2}, {:.2}, {:.2}), {} active chunks, {} visible cubes",
                tick,
                p.x,
                p.y,
                p.z,
                store.active_len(),
                cubes
            );
        }
    }
    Ok(())
}

fn main() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    if let Err(error) = run() {
        eprintln!("terrain demo failed: {}", error);
        std::process::exit(1);
    }
}
