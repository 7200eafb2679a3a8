//! # Collision Queries
//!
//! Pure queries against a chunk's density volume, used by the simulation
//! step to resolve vertical and lateral motion. Positions are translated
//! into the chunk's local column coordinates by subtracting the top-left
//! world offset and rounding to the nearest cell.
//!
//! A query that falls outside this chunk, or indexes past a column's sample
//! range, reports "no collision": some neighboring chunk answers for that
//! space, and the caller probes every candidate chunk near the player.

use cgmath::{InnerSpace, Point3, Vector2};

use super::Chunk;

impl Chunk {
    /// Resolves vertical motion for a player whose head is at `position`.
    ///
    /// Moving upward, scans from just above the player's feet for the first
    /// solid sample and returns a foot height placing the player just below
    /// it (a head bump). Moving downward, scans from the head down and
    /// returns a foot height resting just above the first solid sample (a
    /// landing).
    ///
    /// # Arguments
    /// * `position` - The player's head position in world coordinates
    /// * `upwards` - Whether the player is currently moving upward
    ///
    /// # Returns
    /// The corrected foot height, or `None` when the column is outside this
    /// chunk or no solid sample is in range.
    pub fn vertical_collision(&self, position: Point3<f32>, upwards: bool) -> Option<f32> {
        let (top_left_x, top_left_z) = self.top_left();
        let size = self.size as i64;
        let base = (position.y - self.player_height as f32).round() as i64;
        let top = position.y.round() as i64;
        let x = (position.x - top_left_x).round() as i64;
        let z = (position.z - top_left_z).round() as i64;
        if x < 0 || z < 0 || x >= size || z >= size {
            return None;
        }
        let column = (x * size + z) as usize;
        let len = self.density.column_len(column) as i64;

        if upwards {
            for i in 0..=self.player_height {
                let k = base + i + 1;
                if k < len && self.density.is_solid(column, k) {
                    return Some((base + i - self.player_height) as f32 - 0.5);
                }
            }
        } else {
            for i in 0..=self.player_height {
                let k = top - i;
                if k < len && self.density.is_solid(column, k) {
                    return Some((top - i) as f32 + 0.5);
                }
            }
        }
        None
    }

    /// Tests whether the player's footprint overlaps solid terrain.
    ///
    /// Probes the player's own cell plus the eight surrounding footprint
    /// cells, each represented by its corner nearest the player. A cell
    /// whose corner lies within the player's radius has its column scanned
    /// over the player's height; any solid sample is a collision. This is an
    /// axis-aligned approximation of a cylinder sweep, not an exact
    /// swept-circle test.
    ///
    /// # Arguments
    /// * `position` - The player's head position in world coordinates
    pub fn side_collision(&self, position: Point3<f32>) -> bool {
        let (top_left_x, top_left_z) = self.top_left();
        let size = self.size as i64;
        let top = position.y.round() as i64;
        let footprint = Vector2::new(position.x, position.z);

        for i in -1i64..=1 {
            for j in -1i64..=1 {
                // The cell's corner facing the player; the center cell uses
                // the player's own position (distance zero).
                let corner_x = if i == 0 {
                    position.x
                } else {
                    position.x.round() - 0.5 + i as f32 + if i == -1 { 1.0 } else { 0.0 }
                };
                let corner_z = if j == 0 {
                    position.z
                } else {
                    position.z.round() - 0.5 + j as f32 + if j == -1 { 1.0 } else { 0.0 }
                };
                let distance = (Vector2::new(corner_x, corner_z) - footprint).magnitude();
                if distance >= self.player_radius {
                    continue;
                }

                let x = (position.x - top_left_x).round() as i64 + i;
                let z = (position.z - top_left_z).round() as i64 + j;
                if x < 0 || z < 0 || x >= size || z >= size {
                    continue;
                }
                let column = (x * size + z) as usize;
                let len = self.density.column_len(column) as i64;
                for k in 0..=self.player_height {
                    let sample = top - k;
                    if sample < len && self.density.is_solid(column, sample) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use crate::config::WorldConfig;
    use crate::noise::value::HeightField;
    use crate::noise::vector_table::NoiseVectorTable;
    use crate::voxels::chunk::{density, Chunk};

    /// A chunk with hand-picked column heights, constant-fill density.
    fn chunk_with_heights(heights: HeightField) -> Chunk {
        let config = WorldConfig {
            chunk_size: heights.size() as i32,
            perlin_3d: false,
            ..WorldConfig::default()
        };
        let table = NoiseVectorTable::generate("40", 500);
        let build = density::build(heights, 0, 0, &config, &table);
        Chunk {
            center_x: 0,
            center_z: 0,
            size: config.chunk_size,
            player_height: config.player_height_blocks(),
            player_radius: config.player_radius,
            heights: build.heights,
            density: build.volume,
            cube_positions: build.cube_positions,
        }
    }

    fn flat_chunk(size: usize, height: f32) -> Chunk {
        chunk_with_heights(HeightField::new(size, vec![height; size * size]))
    }

    #[test]
    fn queries_outside_the_chunk_report_no_collision() {
        let chunk = flat_chunk(16, 5.0);
        // Local coordinates for x = 100 land far outside [0, 16).
        assert_eq!(
            chunk.vertical_collision(Point3::new(100.0, 3.0, 0.0), false),
            None
        );
        assert_eq!(
            chunk.vertical_collision(Point3::new(0.0, 3.0, -100.0), true),
            None
        );
        assert!(!chunk.side_collision(Point3::new(100.0, 3.0, 100.0)));
    }

    #[test]
    fn falling_player_lands_on_the_surface() {
        let chunk = flat_chunk(16, 5.0);
        // Highest solid sample is k = 4; feet should rest at 4.5.
        let feet = chunk.vertical_collision(Point3::new(0.0, 6.4, 0.0), false);
        assert_eq!(feet, Some(4.5));
    }

    #[test]
    fn no_contact_reported_above_scan_range() {
        let chunk = flat_chunk(16, 5.0);
        assert_eq!(
            chunk.vertical_collision(Point3::new(0.0, 20.0, 0.0), false),
            None
        );
    }

    #[test]
    fn rising_player_bumps_into_overhead_terrain() {
        let chunk = flat_chunk(16, 5.0);
        // Head inside the terrain at y = 2: the first solid sample above the
        // feet is k = 1, placing the feet at -2.5.
        let feet = chunk.vertical_collision(Point3::new(0.0, 2.0, 0.0), true);
        assert_eq!(feet, Some(-2.5));
    }

    #[test]
    fn side_collision_detects_a_nearby_wall() {
        // Flat height-2 ground with a 10-block pillar at local (8, 8),
        // world (0, 0).
        let mut data = vec![2.0f32; 16 * 16];
        data[8 * 16 + 8] = 10.0;
        let chunk = chunk_with_heights(HeightField::new(16, data));

        // Standing on the ground (head at y = 4) within radius of the
        // pillar's face.
        assert!(chunk.side_collision(Point3::new(0.8, 4.0, 0.0)));
        // Same height, well clear of the pillar.
        assert!(!chunk.side_collision(Point3::new(4.0, 4.0, 0.0)));
    }

    #[test]
    fn open_ground_never_reports_side_collisions() {
        let chunk = flat_chunk(16, 2.0);
        for x in [-6.0f32, -1.5, 0.0, 2.25, 6.0] {
            for z in [-6.0f32, 0.0, 5.5] {
                assert!(!chunk.side_collision(Point3::new(x, 4.0, z)));
            }
        }
    }
}
