#![warn(missing_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! A procedurally generated, chunked voxel terrain core for a first-person
//! walking simulation: deterministic multi-octave value-noise synthesis with
//! seam-exact chunk borders, density-volume construction with hidden-cube
//! culling, collision queries against the density volume, and a chunk
//! lifecycle manager with a bounded hysteresis cache.
//!
//! ## Key Modules
//!
//! * `config` - The immutable `WorldConfig` value parameterizing everything
//! * `noise` - Seeded value noise, lattice noise, and the shared vector table
//! * `voxels` - Chunks, density volumes, collision queries, and the store
//! * `sim` - The walking-simulation step consuming the collision interface
//!
//! ## Architecture
//!
//! The core is single-threaded and synchronous: each simulation tick calls
//! `ChunkStore::refresh` once, which builds any missing chunks inline, then
//! probes `ChunkStore::candidates_for` for collision. The external renderer
//! reads each active chunk's `cube_positions()`/`num_cubes()` once per frame
//! to drive instanced drawing; no other rendering state lives here.
//!
//! ## Determinism
//!
//! All randomness derives from string seeds hashed into seeded generators.
//! Synthesizing the same chunk with the same configuration always yields
//! bit-identical terrain, and adjacent chunks built independently agree
//! exactly on their shared border samples.
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::{Point3, Vector3};
//! use voxel_terrain::{ChunkStore, Walker, WorldConfig};
//!
//! let mut store = ChunkStore::new(WorldConfig::default()).unwrap();
//! let mut walker = Walker::new(Point3::new(0.0, 120.0, 0.0));
//! walker.step(&mut store, Vector3::new(0.1, 0.0, 0.0), 1.0 / 60.0).unwrap();
//! for chunk in store.chunks() {
//!     let _instances = chunk.cube_positions();
//! }
//! ```

pub mod config;
pub mod error;
pub mod noise;
pub mod sim;
pub mod voxels;

pub use config::WorldConfig;
pub use error::TerrainError;
pub use noise::value::HeightField;
pub use noise::vector_table::NoiseVectorTable;
pub use sim::Walker;
pub use voxels::chunk::Chunk;
pub use voxels::world::{ChunkKey, ChunkStore};
