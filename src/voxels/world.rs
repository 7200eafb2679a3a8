//! # World Module
//!
//! The `ChunkStore` tracks the active window of chunks around a moving
//! viewpoint, recycles recently evicted chunks from a bounded cache, and
//! builds missing chunks on demand.
//!
//! ## Lifecycle
//!
//! Per chunk key: absent -> active <-> cached -> absent. A key appears in at
//! most one of the two sets at a time. Chunks displaced from the active
//! window are parked in the cache so that small viewpoint oscillations
//! around a chunk boundary do not regenerate terrain.
//!
//! ## Eviction
//!
//! Cache eviction is a full flush once the cache outgrows its configured
//! capacity — coarse hysteresis rather than per-entry LRU. The cache's only
//! job is to absorb viewpoint oscillation across a chunk boundary, not to
//! approximate a working set.
//!
//! ## Concurrency
//!
//! Single-threaded and synchronous: missing chunks are built inline during
//! `refresh`, which can cost a latency spike when the viewpoint crosses into
//! unvisited terrain. `refresh` is the only mutation path and is called once
//! per simulation tick.

use std::collections::HashMap;
use std::rc::Rc;

use cgmath::{Point2, Point3};
use log::{debug, info};

use crate::config::WorldConfig;
use crate::error::TerrainError;
use crate::noise::vector_table::NoiseVectorTable;
use crate::voxels::chunk::Chunk;

/// A chunk's world-grid cell: the chunk-center coordinates, which are always
/// multiples of the chunk size.
pub type ChunkKey = Point2<i32>;

/// Half-width of the boundary band (in world units) within which neighbor
/// chunks join the collision candidate set.
const PROXIMITY_BAND: f32 = 2.0;

/// Streams chunks in and out around a moving viewpoint.
pub struct ChunkStore {
    config: WorldConfig,
    /// Shared noise-vector table, built once per store and handed by
    /// reference into every chunk build.
    table: Rc<NoiseVectorTable>,
    /// Chunks currently relevant for rendering and collision.
    active: HashMap<ChunkKey, Chunk>,
    /// Recently active chunks retained for reuse, bounded by a flush.
    cache: HashMap<ChunkKey, Chunk>,
    /// Key of the chunk at the center of the active window.
    center_key: ChunkKey,
}

impl ChunkStore {
    /// Creates an empty store over a validated configuration.
    ///
    /// # Returns
    /// The store, or the validation error if the configuration cannot
    /// produce consistent terrain.
    pub fn new(config: WorldConfig) -> Result<Self, TerrainError> {
        config.validate()?;
        let table = Rc::new(NoiseVectorTable::generate(
            &config.noise_table_seed,
            config.noise_table_len,
        ));
        Ok(ChunkStore {
            config,
            table,
            active: HashMap::new(),
            cache: HashMap::new(),
            center_key: Point2::new(0, 0),
        })
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The shared noise-vector table.
    pub fn vector_table(&self) -> Rc<NoiseVectorTable> {
        Rc::clone(&self.table)
    }

    /// The chunk key whose cell contains the given world position.
    pub fn key_for(&self, position: Point3<f32>) -> ChunkKey {
        let size = self.config.chunk_size as f32;
        Point2::new(
            (((position.x + size / 2.0) / size).floor() * size) as i32,
            (((position.z + size / 2.0) / size).floor() * size) as i32,
        )
    }

    /// Recomputes the active window around the viewpoint.
    ///
    /// Every key within the border radius is resolved in order of
    /// preference: already active, recovered from the cache, or built from
    /// scratch. Chunks that fell out of the window are parked in the cache;
    /// the cache is flushed wholesale once it outgrows its capacity. Missing
    /// chunks are built before any map is touched, so a build failure
    /// propagates with the store unchanged.
    ///
    /// # Arguments
    /// * `viewpoint` - The player/camera position driving the window
    pub fn refresh(&mut self, viewpoint: Point3<f32>) -> Result<(), TerrainError> {
        let center = self.key_for(viewpoint);
        let border = self.config.border_chunks;
        let size = self.config.chunk_size;

        // Build everything the new window is missing before touching the
        // maps: a failed build must leave the store exactly as it was.
        let mut fresh = Vec::new();
        for i in -border..=border {
            for j in -border..=border {
                let key = Point2::new(center.x + size * i, center.y + size * j);
                if !self.active.contains_key(&key) && !self.cache.contains_key(&key) {
                    let chunk = Chunk::generate(key.x, key.y, &self.config, &self.table)?;
                    fresh.push((key, chunk));
                }
            }
        }
        let built = fresh.len();

        let mut next_active = HashMap::with_capacity(self.config.active_window());
        let mut recovered = 0usize;
        for i in -border..=border {
            for j in -border..=border {
                let key = Point2::new(center.x + size * i, center.y + size * j);
                if let Some(chunk) = self.active.remove(&key) {
                    next_active.insert(key, chunk);
                } else if let Some(chunk) = self.cache.remove(&key) {
                    recovered += 1;
                    next_active.insert(key, chunk);
                }
            }
        }
        for (key, chunk) in fresh {
            next_active.insert(key, chunk);
        }

        // Whatever is left in the old active set fell out of the window.
        let displaced = self.active.len();
        for (key, chunk) in self.active.drain() {
            self.cache.insert(key, chunk);
        }
        if self.cache.len() > self.config.cache_capacity() {
            info!(
                "chunk cache exceeded capacity {} with {} entries, flushing",
                self.config.cache_capacity(),
                self.cache.len()
            );
            self.cache.clear();
        }

        self.active = next_active;
        self.center_key = center;
        if built > 0 || recovered > 0 || displaced > 0 {
            debug!(
                "refresh at ({}, {}): built {}, recovered {}, displaced {}, cached {}",
                center.x,
                center.y,
                built,
                recovered,
                displaced,
                self.cache.len()
            );
        }
        Ok(())
    }

    /// The chunks a collision pass must consult for the given position.
    ///
    /// Always includes the window-center chunk. Axis neighbors join only
    /// when the position is within a fixed proximity band of that axis's
    /// chunk boundary, and diagonals only when both axes are; this is the
    /// broad phase that keeps most ticks at a single chunk probe.
    pub fn candidates_for(&self, position: Point3<f32>) -> Vec<&Chunk> {
        let mut candidates = Vec::new();
        let center_chunk = match self.active.get(&self.center_key) {
            Some(chunk) => chunk,
            None => return candidates,
        };
        candidates.push(center_chunk);

        let size = self.config.chunk_size as f32;
        let x_mod = ((position.x.abs() % size) - size / 2.0).abs();
        let z_mod = ((position.z.abs() % size) - size / 2.0).abs();
        let near_x = x_mod <= PROXIMITY_BAND;
        let near_z = z_mod <= PROXIMITY_BAND;

        let center = self.center_key;
        let step = self.config.chunk_size;
        let mut push = |dx: i32, dz: i32| {
            if let Some(chunk) = self
                .active
                .get(&Point2::new(center.x + dx * step, center.y + dz * step))
            {
                candidates.push(chunk);
            }
        };
        if near_x {
            push(1, 0);
            push(-1, 0);
        }
        if near_z {
            push(0, 1);
            push(0, -1);
        }
        if near_x && near_z {
            push(1, 1);
            push(-1, 1);
            push(1, -1);
            push(-1, -1);
        }
        candidates
    }

    /// Iterates the active chunks, the per-frame render set.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.active.values()
    }

    /// Number of chunks in the active window.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Number of chunks parked in the hysteresis cache.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the key is currently active.
    pub fn is_active(&self, key: ChunkKey) -> bool {
        self.active.contains_key(&key)
    }

    /// Whether the key is currently parked in the cache.
    pub fn is_cached(&self, key: ChunkKey) -> bool {
        self.cache.contains_key(&key)
    }
}
