//! # Configuration Module
//!
//! This module provides the `WorldConfig` struct, the single immutable value
//! that parameterizes terrain synthesis, collision, and chunk streaming.
//!
//! Configuration is an explicit value passed into the world at construction —
//! there is no global mutable state. A config can be built from defaults,
//! deserialized from JSON, and must be validated before use: several fields
//! interact (chunk size and octave count in particular), and an inconsistent
//! combination would corrupt chunk seams rather than fail loudly later.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::TerrainError;

/// Parameters of the voxel world.
///
/// All fields have defaults matching a 64-block chunk with a 100-block
/// height ceiling, a 2-block-tall player, and a 3x3 active chunk window.
///
/// # Examples
///
/// ```
/// use voxel_terrain::config::WorldConfig;
///
/// let config = WorldConfig::default();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of cubes along each side of a chunk.
    pub chunk_size: i32,
    /// Number of chunk rings kept active around the viewpoint's chunk.
    pub border_chunks: i32,
    /// Maximum number of evicted chunks retained before the cache is flushed.
    /// `None` derives the capacity from the active window size.
    pub cache_capacity: Option<usize>,
    /// Player collision radius, in world units.
    pub player_radius: f32,
    /// Player height (head to feet), in world units.
    pub player_height: f32,
    /// Upper bound on terrain height; all height-field values lie in
    /// `[0, max_height]`.
    pub max_height: f32,
    /// Total number of value-noise octaves the chunk size is subdivided into.
    pub octaves: u32,
    /// First octave actually blended. Coarser octaves below this index are
    /// skipped to avoid degenerate flat terrain at the largest scale.
    pub start_octave: u32,
    /// When true, density columns are modulated by 3D lattice noise (carved
    /// terrain). When false, every sample below the surface is solid.
    pub perlin_3d: bool,
    /// Lattice spacing of the 3D density noise, in world units.
    pub lattice_grid_spacing: f32,
    /// Vertical acceleration applied to the walker, in units per second squared.
    pub gravity: f32,
    /// Initial vertical speed of a jump, in units per second.
    pub jump_velocity: f32,
    /// Seed string for the shared noise-vector table.
    pub noise_table_seed: String,
    /// Number of unit vectors in the shared noise-vector table.
    pub noise_table_len: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_size: 64,
            border_chunks: 1,
            cache_capacity: None,
            player_radius: 0.4,
            player_height: 2.0,
            max_height: 100.0,
            octaves: 6,
            start_octave: 3,
            perlin_3d: false,
            lattice_grid_spacing: 32.0,
            gravity: -9.8,
            jump_velocity: 10.0,
            noise_table_seed: String::from("40"),
            noise_table_len: 500,
        }
    }
}

impl WorldConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults. The loaded configuration
    /// is validated before being returned.
    ///
    /// # Arguments
    /// * `path` - Path to a JSON file containing a (possibly partial) config
    ///
    /// # Returns
    /// The validated configuration, or a `TerrainError::InvalidConfig`
    /// describing why the file could not be used.
    pub fn from_json_file(path: &Path) -> Result<Self, TerrainError> {
        let text = fs::read_to_string(path)
            .map_err(|e| TerrainError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        let config: WorldConfig = serde_json::from_str(&text)
            .map_err(|e| TerrainError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can produce consistent terrain.
    ///
    /// The chunk size must be divisible by `2^(octaves - 1)` so every octave
    /// subdivides the chunk into whole blocks; a remainder would desynchronize
    /// the neighbor-seeded border samples and tear chunk seams. This is
    /// surfaced here, before any generation runs.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.chunk_size <= 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "chunk_size must be positive, got {}",
                self.chunk_size
            )));
        }
        if self.octaves == 0 {
            return Err(TerrainError::InvalidConfig(String::from(
                "octaves must be at least 1",
            )));
        }
        if self.start_octave >= self.octaves {
            return Err(TerrainError::InvalidConfig(format!(
                "start_octave {} must be below octaves {}",
                self.start_octave, self.octaves
            )));
        }
        let finest_subdivision = 1i32 << (self.octaves - 1);
        if self.chunk_size % finest_subdivision != 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "chunk_size {} is not divisible by 2^(octaves - 1) = {}",
                self.chunk_size, finest_subdivision
            )));
        }
        if self.max_height <= 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "max_height must be positive, got {}",
                self.max_height
            )));
        }
        if self.border_chunks < 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "border_chunks must be non-negative, got {}",
                self.border_chunks
            )));
        }
        if self.noise_table_len == 0 {
            return Err(TerrainError::InvalidConfig(String::from(
                "noise_table_len must be at least 1",
            )));
        }
        Ok(())
    }

    /// The number of chunks in the active window: `(2 * border + 1)^2`.
    pub fn active_window(&self) -> usize {
        let side = (2 * self.border_chunks + 1) as usize;
        side * side
    }

    /// The cache flush threshold: the configured capacity if set, otherwise
    /// the size of the active window.
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity.unwrap_or_else(|| self.active_window())
    }

    /// The player height in whole blocks, used by the collision scans.
    pub fn player_height_blocks(&self) -> i64 {
        self.player_height as i64
    }
}

#[cfg(test)]
mod tests {
    use super::WorldConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn chunk_size_must_match_octave_subdivision() {
        let config = WorldConfig {
            chunk_size: 48, // not divisible by 2^5
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());

        let config = WorldConfig {
            chunk_size: 16,
            octaves: 5, // 16 % 2^4 == 0
            ..WorldConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn start_octave_must_be_below_octave_count() {
        let config = WorldConfig {
            octaves: 4,
            start_octave: 4,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn cache_capacity_defaults_to_active_window() {
        let config = WorldConfig::default();
        assert_eq!(config.active_window(), 9);
        assert_eq!(config.cache_capacity(), 9);

        let config = WorldConfig {
            cache_capacity: Some(4),
            ..WorldConfig::default()
        };
        assert_eq!(config.cache_capacity(), 4);
    }
}
