//! # Chunk Module
//!
//! The unit of world state: a fixed-size square region of terrain that owns
//! its height field, density volume, and visible-cube buffer, and answers
//! collision queries against that volume.
//!
//! A chunk is generated exactly once for a given center and configuration
//! and never mutated afterwards — regeneration means discarding the chunk
//! and building a new one. Generation runs the full pipeline synchronously:
//! value-noise synthesis, density construction, then hidden-cube culling.
//! A failure anywhere aborts the build; no partially initialized chunk is
//! ever observable.

use cgmath::Point3;
use log::debug;

use crate::config::WorldConfig;
use crate::error::TerrainError;
use crate::noise::value::{self, HeightField};
use crate::noise::vector_table::NoiseVectorTable;

pub mod collision;
pub mod density;

use density::DensityVolume;

/// A square region of voxel terrain, immutable after construction.
pub struct Chunk {
    /// World X of the chunk center (a multiple of the chunk size).
    center_x: i32,
    /// World Z of the chunk center.
    center_z: i32,
    /// Cubes along each side of the chunk.
    size: i32,
    /// Player height in whole blocks, captured for the collision scans.
    player_height: i64,
    /// Player collision radius, captured for the footprint test.
    player_radius: f32,
    /// Per-column surface heights, lowered where density noise carved the
    /// terrain down.
    heights: HeightField,
    /// Per-column density samples.
    density: DensityVolume,
    /// Flat `(x, y, z, 0.0)` quadruples for instanced drawing.
    cube_positions: Vec<f32>,
}

impl Chunk {
    /// Generates the chunk centered at `(center_x, center_z)`.
    ///
    /// # Arguments
    /// * `center_x`, `center_z` - Chunk center, a multiple of the chunk size
    /// * `config` - Validated world configuration
    /// * `table` - Shared noise-vector table
    ///
    /// # Returns
    /// The fully built chunk, or the synthesis error that aborted the build.
    pub fn generate(
        center_x: i32,
        center_z: i32,
        config: &WorldConfig,
        table: &NoiseVectorTable,
    ) -> Result<Self, TerrainError> {
        let heights = value::synthesize(center_x, center_z, config)?;
        let build = density::build(heights, center_x, center_z, config, table);
        debug!(
            "built chunk ({}, {}): {} visible cubes",
            center_x,
            center_z,
            build.cube_positions.len() / 4
        );
        Ok(Chunk {
            center_x,
            center_z,
            size: config.chunk_size,
            player_height: config.player_height_blocks(),
            player_radius: config.player_radius,
            heights: build.heights,
            density: build.volume,
            cube_positions: build.cube_positions,
        })
    }

    /// The flat buffer of visible cube positions, four floats per cube.
    pub fn cube_positions(&self) -> &[f32] {
        &self.cube_positions
    }

    /// The number of visible cubes, always `cube_positions().len() / 4`.
    pub fn num_cubes(&self) -> usize {
        self.cube_positions.len() / 4
    }

    /// The chunk center on the ground plane.
    pub fn center(&self) -> Point3<f32> {
        Point3::new(self.center_x as f32, 0.0, self.center_z as f32)
    }

    /// Cubes along each side of the chunk.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// The adjusted per-column height field.
    pub fn heights(&self) -> &HeightField {
        &self.heights
    }

    /// The per-column density volume.
    pub fn density(&self) -> &DensityVolume {
        &self.density
    }

    /// World X/Z of the chunk's top-left corner (minimum X, minimum Z).
    pub(crate) fn top_left(&self) -> (f32, f32) {
        (
            self.center_x as f32 - self.size as f32 / 2.0,
            self.center_z as f32 - self.size as f32 / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WorldConfig {
        let config = WorldConfig {
            chunk_size: 16,
            octaves: 5,
            ..WorldConfig::default()
        };
        config.validate().unwrap();
        config
    }

    #[test]
    fn generation_is_deterministic() {
        let config = test_config();
        let table = NoiseVectorTable::generate("40", 500);
        let a = Chunk::generate(0, 0, &config, &table).unwrap();
        let b = Chunk::generate(0, 0, &config, &table).unwrap();
        assert_eq!(a.cube_positions, b.cube_positions);
        assert_eq!(a.heights.as_slice(), b.heights.as_slice());
    }

    #[test]
    fn cube_count_is_buffer_length_over_four() {
        let config = test_config();
        let table = NoiseVectorTable::generate("40", 500);
        let chunk = Chunk::generate(64, -64, &config, &table).unwrap();
        assert_eq!(chunk.num_cubes() * 4, chunk.cube_positions().len());
        assert!(chunk.num_cubes() > 0);
    }

    #[test]
    fn center_is_on_the_ground_plane() {
        let config = test_config();
        let table = NoiseVectorTable::generate("40", 500);
        let chunk = Chunk::generate(16, 32, &config, &table).unwrap();
        assert_eq!(chunk.center(), Point3::new(16.0, 0.0, 32.0));
        assert_eq!(chunk.top_left(), (8.0, 24.0));
    }
}
