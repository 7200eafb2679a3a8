//! # Simulation Module
//!
//! The walking-simulation step: the single consumer of the chunk store's
//! collision interface. Each tick the walker attempts the externally
//! supplied movement intent, rejecting lateral motion that would clip into
//! terrain and resolving vertical motion against gravity, landings, and
//! head bumps.
//!
//! The walker owns no rendering state; the renderer reads the store's
//! chunks independently.

use cgmath::{Point3, Vector3};

use crate::error::TerrainError;
use crate::voxels::world::ChunkStore;

/// A first-person walker moving through the voxel world.
///
/// The tracked position is the player's *head*; the body extends
/// `player_height` units down from it and `player_radius` units radially.
pub struct Walker {
    position: Point3<f32>,
    /// Vertical speed contributed by the last jump, decayed by gravity.
    jump_speed: f32,
    /// Seconds since the walker last stood on ground.
    air_time: f32,
    on_ground: bool,
}

impl Walker {
    /// Creates a walker with its head at `spawn`, airborne.
    pub fn new(spawn: Point3<f32>) -> Self {
        Walker {
            position: spawn,
            jump_speed: 0.0,
            air_time: 0.0,
            on_ground: false,
        }
    }

    /// The walker's head position.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Whether the walker ended the last step standing on terrain.
    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    /// Launches the walker upward, but only when it is standing on ground.
    ///
    /// # Arguments
    /// * `jump_velocity` - Initial vertical speed, in units per second
    pub fn jump(&mut self, jump_velocity: f32) {
        if self.on_ground {
            self.jump_speed = jump_velocity;
        }
    }

    /// Advances the simulation by one tick.
    ///
    /// Refreshes the chunk window around the walker, then resolves the
    /// movement intent: lateral motion is committed only if no candidate
    /// chunk reports a footprint collision (a blocked walker snaps to the
    /// nearest cell centerline); vertical motion integrates gravity and the
    /// jump impulse, landing or bumping against the first solid contact.
    ///
    /// # Arguments
    /// * `store` - The chunk store streaming terrain around the walker
    /// * `walk_dir` - This tick's movement intent, in world units
    /// * `dt` - Tick duration in seconds
    pub fn step(
        &mut self,
        store: &mut ChunkStore,
        walk_dir: Vector3<f32>,
        dt: f32,
    ) -> Result<(), TerrainError> {
        store.refresh(self.position)?;
        let gravity = store.config().gravity;
        let player_height = store.config().player_height;
        let candidates = store.candidates_for(self.position);

        // Lateral motion: all-or-nothing against the candidate set.
        let target = self.position + walk_dir;
        if target != self.position {
            if candidates.iter().any(|chunk| chunk.side_collision(target)) {
                self.position.x = self.position.x.round();
                self.position.z = self.position.z.round();
            } else {
                self.position = target;
            }
        }

        // Vertical motion: gravity accrues with airborne time, plus any
        // jump impulse still being spent.
        self.air_time += dt;
        let vertical_speed = gravity * self.air_time + self.jump_speed;
        let mut fall_target = self.position;
        fall_target.y += vertical_speed * dt;

        let contact = candidates
            .iter()
            .find_map(|chunk| chunk.vertical_collision(fall_target, vertical_speed > 0.0));
        match contact {
            Some(feet) => {
                self.position.y = feet + player_height;
                self.on_ground = true;
                self.jump_speed = 0.0;
                self.air_time = 0.0;
            }
            None => {
                self.on_ground = false;
                self.position = fall_target;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn store() -> ChunkStore {
        let config = WorldConfig {
            chunk_size: 16,
            octaves: 5,
            ..WorldConfig::default()
        };
        ChunkStore::new(config).unwrap()
    }

    /// A spawn point high above a column of chunk (0, 0) that is tall
    /// enough to land on.
    fn spawn(store: &ChunkStore) -> Point3<f32> {
        let table = store.vector_table();
        let chunk =
            crate::voxels::chunk::Chunk::generate(0, 0, store.config(), &table).unwrap();
        for i in 0..16 {
            for j in 0..16 {
                if chunk.heights().get(i, j) >= 2.0 {
                    return Point3::new(i as f32 - 8.0, 120.0, j as f32 - 8.0);
                }
            }
        }
        unreachable!("generated terrain with no solid columns");
    }

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn walker_falls_until_it_lands() {
        let mut store = store();
        let mut walker = Walker::new(spawn(&store));
        let mut steps = 0;
        while !walker.on_ground() {
            walker.step(&mut store, Vector3::new(0.0, 0.0, 0.0), DT).unwrap();
            steps += 1;
            assert!(steps < 2000, "walker never landed");
        }
        // Feet rest half a block above the highest solid sample.
        let feet = walker.position().y - store.config().player_height;
        assert_eq!(feet.fract().abs(), 0.5);
        assert!(feet < store.config().max_height);
    }

    #[test]
    fn grounded_walker_stays_grounded() {
        let mut store = store();
        let mut walker = Walker::new(spawn(&store));
        while !walker.on_ground() {
            walker.step(&mut store, Vector3::new(0.0, 0.0, 0.0), DT).unwrap();
        }
        let rest_y = walker.position().y;
        for _ in 0..10 {
            walker.step(&mut store, Vector3::new(0.0, 0.0, 0.0), DT).unwrap();
            assert!(walker.on_ground());
            assert_eq!(walker.position().y, rest_y);
        }
    }

    #[test]
    fn jumping_requires_ground_contact() {
        let mut store = store();
        let mut walker = Walker::new(spawn(&store));

        // Mid-air jumps are ignored.
        walker.jump(10.0);
        walker.step(&mut store, Vector3::new(0.0, 0.0, 0.0), DT).unwrap();
        assert_eq!(walker.jump_speed, 0.0);

        while !walker.on_ground() {
            walker.step(&mut store, Vector3::new(0.0, 0.0, 0.0), DT).unwrap();
        }
        let ground_y = walker.position().y;
        walker.jump(store.config().jump_velocity);
        walker.step(&mut store, Vector3::new(0.0, 0.0, 0.0), DT).unwrap();
        assert!(!walker.on_ground());
        assert!(walker.position().y > ground_y);
    }
}
