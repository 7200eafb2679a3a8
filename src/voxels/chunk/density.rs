//! # Density Volume
//!
//! Converts a height field into a per-column density profile and performs
//! hidden-cube culling to produce the minimal set of visible cube positions.
//!
//! ## Storage
//!
//! Column lengths vary (each column holds exactly its pre-carve integer
//! height of samples), so the volume is an offsets-plus-flat-buffer arena:
//! one `u32` offset per column into a single shared sample vector. This
//! keeps lookups bounds-checked without scattering a heap allocation per
//! column.
//!
//! ## Carving
//!
//! When 3D lattice noise modulates density, samples can go negative ("air")
//! below the nominal surface. The column's *effective* height is lowered to
//! one past the highest solid sample, but the allocation keeps its original
//! length: carved-away samples stay in place as negative entries rather than
//! being removed, so collision scans can still index the full pre-carve
//! range.

use cgmath::Point3;

use crate::config::WorldConfig;
use crate::noise::lattice;
use crate::noise::value::HeightField;
use crate::noise::vector_table::NoiseVectorTable;

/// Density samples for every column of one chunk, immutable after
/// construction. Sample `>= 0` means solid, `< 0` means air.
#[derive(Debug, Clone)]
pub struct DensityVolume {
    /// `size^2 + 1` offsets; column `idx` owns `samples[offsets[idx] as
    /// usize..offsets[idx + 1] as usize]`.
    offsets: Vec<u32>,
    samples: Vec<f32>,
}

impl DensityVolume {
    /// The sample at `(column, k)`, or `None` outside the column's range.
    ///
    /// Out-of-range is not an error: the chunked world always has a
    /// neighboring chunk answering for space outside this one, so a miss
    /// reads as "not solid" to every caller.
    pub fn sample(&self, column: usize, k: i64) -> Option<f32> {
        if k < 0 {
            return None;
        }
        let start = *self.offsets.get(column)? as usize;
        let end = *self.offsets.get(column + 1)? as usize;
        self.samples.get(start..end)?.get(k as usize).copied()
    }

    /// Whether the sample at `(column, k)` exists and is solid.
    pub fn is_solid(&self, column: usize, k: i64) -> bool {
        matches!(self.sample(column, k), Some(density) if density >= 0.0)
    }

    /// The pre-carve length of a column, in samples.
    pub fn column_len(&self, column: usize) -> usize {
        (self.offsets[column + 1] - self.offsets[column]) as usize
    }
}

/// Everything the density pass produces for one chunk.
pub struct DensityBuild {
    /// The per-column density arena.
    pub volume: DensityVolume,
    /// The height field with carved columns lowered to their effective
    /// height.
    pub heights: HeightField,
    /// Flat `(x, y, z, 0.0)` quadruples, one per visible cube.
    pub cube_positions: Vec<f32>,
}

/// Builds the density volume, adjusted heights, and visible-cube buffer for
/// a chunk.
///
/// # Arguments
/// * `heights` - The synthesized height field (consumed and adjusted)
/// * `center_x`, `center_z` - World coordinates of the chunk center
/// * `config` - Validated world configuration
/// * `table` - Shared noise-vector table for 3D density modulation
pub fn build(
    mut heights: HeightField,
    center_x: i32,
    center_z: i32,
    config: &WorldConfig,
    table: &NoiseVectorTable,
) -> DensityBuild {
    let size = heights.size();
    let top_left_x = center_x as f32 - config.chunk_size as f32 / 2.0;
    let top_left_z = center_z as f32 - config.chunk_size as f32 / 2.0;

    // Depth bias: lower samples are increasingly likely to be solid, which
    // keeps lattice noise from hollowing out the ground entirely. Derived
    // from the configured height ceiling (0.4 * max_height is the depth at
    // which the bias crosses zero).
    let bias_pivot = 0.4 * config.max_height;

    let mut offsets = Vec::with_capacity(size * size + 1);
    offsets.push(0u32);
    let mut samples = Vec::new();

    for i in 0..size {
        for j in 0..size {
            let column_height = heights.get(i, j).floor() as usize;
            let mut last_solid: Option<usize> = None;
            for k in 0..column_height {
                let density = if config.perlin_3d {
                    let pos = Point3::new(
                        top_left_x + i as f32,
                        top_left_z + j as f32,
                        k as f32,
                    );
                    lattice::sample(table, config.lattice_grid_spacing, pos)
                } else {
                    1.0
                };
                let density =
                    density + 0.8 * ((bias_pivot - k as f32) / config.max_height);
                if density >= 0.0 {
                    last_solid = Some(k);
                }
                samples.push(density);
            }
            offsets.push(samples.len() as u32);
            // Carving can only lower the surface; the allocation above keeps
            // the original length.
            let effective = last_solid.map_or(0, |k| k + 1);
            heights.set(i, j, effective as f32);
        }
    }

    let volume = DensityVolume { offsets, samples };
    let cube_positions = visible_cubes(&volume, &heights, top_left_x, top_left_z);

    DensityBuild {
        volume,
        heights,
        cube_positions,
    }
}

/// Emits the positions of every cube that can contribute to the silhouette.
///
/// Boundary cubes (on a chunk edge, at the column floor, or at the column's
/// effective top) are always emitted, because neighbor density across a
/// chunk edge is not available to cull against. A strictly interior cube is
/// emitted only when it is solid and at least one of its six axis-aligned
/// neighbors is air or out of range — a cube fully enclosed by solid
/// neighbors can never be seen.
fn visible_cubes(
    volume: &DensityVolume,
    heights: &HeightField,
    top_left_x: f32,
    top_left_z: f32,
) -> Vec<f32> {
    let size = heights.size();
    let mut positions = Vec::new();
    for i in 0..size {
        for j in 0..size {
            let column_height = heights.get(i, j).floor() as usize;
            for k in 0..column_height {
                let on_boundary = i == 0
                    || j == 0
                    || i == size - 1
                    || j == size - 1
                    || k == 0
                    || k == column_height - 1;
                let visible = if on_boundary {
                    true
                } else {
                    interior_cube_visible(volume, size, i, j, k)
                };
                if visible {
                    positions.push(top_left_x + i as f32);
                    positions.push(k as f32);
                    positions.push(top_left_z + j as f32);
                    positions.push(0.0);
                }
            }
        }
    }
    positions
}

/// Visibility test for a cube strictly inside the chunk and its column.
fn interior_cube_visible(
    volume: &DensityVolume,
    size: usize,
    i: usize,
    j: usize,
    k: usize,
) -> bool {
    let column = size * i + j;
    let k = k as i64;
    if !volume.is_solid(column, k) {
        return false;
    }
    // Interior cubes have all four lateral neighbors inside the chunk.
    let enclosed = volume.is_solid(size * (i - 1) + j, k)
        && volume.is_solid(size * (i + 1) + j, k)
        && volume.is_solid(column - 1, k)
        && volume.is_solid(column + 1, k)
        && volume.is_solid(column, k - 1)
        && volume.is_solid(column, k + 1);
    !enclosed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::value;

    fn flat_field(size: usize, height: f32) -> HeightField {
        HeightField::new(size, vec![height; size * size])
    }

    fn test_config(chunk_size: i32, perlin_3d: bool) -> WorldConfig {
        WorldConfig {
            chunk_size,
            perlin_3d,
            ..WorldConfig::default()
        }
    }

    fn table() -> NoiseVectorTable {
        NoiseVectorTable::generate("40", 500)
    }

    #[test]
    fn constant_fill_keeps_every_sample_solid() {
        let config = test_config(8, false);
        let build = build(flat_field(8, 5.0), 0, 0, &config, &table());
        for column in 0..64 {
            assert_eq!(build.volume.column_len(column), 5);
            for k in 0..5 {
                assert!(build.volume.is_solid(column, k));
            }
            // No carving happened, so the effective height is unchanged.
        }
        for &h in build.heights.as_slice() {
            assert_eq!(h, 5.0);
        }
    }

    #[test]
    fn out_of_range_samples_read_as_air() {
        let config = test_config(8, false);
        let build = build(flat_field(8, 5.0), 0, 0, &config, &table());
        assert_eq!(build.volume.sample(0, 5), None);
        assert_eq!(build.volume.sample(0, -1), None);
        assert!(!build.volume.is_solid(0, 99));
        assert_eq!(build.volume.sample(64 * 64, 0), None);
    }

    #[test]
    fn cube_count_matches_buffer_length() {
        let config = test_config(8, false);
        let build = build(flat_field(8, 5.0), 0, 0, &config, &table());
        assert_eq!(build.cube_positions.len() % 4, 0);
        // Flat 8x8x5 terrain: the interior of the middle layers is fully
        // enclosed, so only the shell remains. Ring columns draw all five
        // cubes, interior columns draw top and bottom.
        let expected = 28 * 5 + 36 * 2;
        assert_eq!(build.cube_positions.len() / 4, expected);
    }

    #[test]
    fn boundary_cubes_are_always_emitted() {
        let config = test_config(8, false);
        let build = build(flat_field(8, 5.0), 0, 0, &config, &table());
        let cubes: Vec<[f32; 3]> = build
            .cube_positions
            .chunks_exact(4)
            .map(|q| [q[0], q[1], q[2]])
            .collect();
        // Every cube of the i == 0 edge column and every column's top and
        // bottom cube must be present.
        let top_left = -4.0;
        for j in 0..8 {
            for k in 0..5 {
                assert!(cubes.contains(&[top_left, k as f32, top_left + j as f32]));
            }
        }
        for i in 0..8 {
            for j in 0..8 {
                let (x, z) = (top_left + i as f32, top_left + j as f32);
                assert!(cubes.contains(&[x, 0.0, z]));
                assert!(cubes.contains(&[x, 4.0, z]));
            }
        }
    }

    #[test]
    fn culled_interior_cubes_are_fully_enclosed() {
        let config = WorldConfig {
            chunk_size: 16,
            octaves: 5,
            perlin_3d: true,
            ..WorldConfig::default()
        };
        config.validate().unwrap();
        let heights = value::synthesize(0, 0, &config).unwrap();
        let build = build(heights, 0, 0, &config, &table());
        let size = 16usize;
        for i in 1..size - 1 {
            for j in 1..size - 1 {
                let column = size * i + j;
                let column_height = build.heights.get(i, j).floor() as usize;
                for k in 1..column_height.saturating_sub(1) {
                    if !interior_cube_visible(&build.volume, size, i, j, k) {
                        let k = k as i64;
                        // A culled cube has six solid neighbors (or is air).
                        if build.volume.is_solid(column, k) {
                            assert!(build.volume.is_solid(size * (i - 1) + j, k));
                            assert!(build.volume.is_solid(size * (i + 1) + j, k));
                            assert!(build.volume.is_solid(column - 1, k));
                            assert!(build.volume.is_solid(column + 1, k));
                            assert!(build.volume.is_solid(column, k - 1));
                            assert!(build.volume.is_solid(column, k + 1));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn carving_lowers_the_effective_height_but_not_the_allocation() {
        let config = WorldConfig {
            chunk_size: 16,
            octaves: 5,
            perlin_3d: true,
            ..WorldConfig::default()
        };
        config.validate().unwrap();
        let heights = value::synthesize(0, 0, &config).unwrap();
        let original: Vec<usize> = (0..16)
            .flat_map(|i| (0..16).map(move |j| (i, j)))
            .map(|(i, j)| heights.get(i, j).floor() as usize)
            .collect();
        let build = build(heights, 0, 0, &config, &table());
        for (idx, &pre_carve) in original.iter().enumerate() {
            let (i, j) = (idx / 16, idx % 16);
            let effective = build.heights.get(i, j) as usize;
            assert!(effective <= pre_carve);
            assert_eq!(build.volume.column_len(idx), pre_carve);
        }
    }
}
