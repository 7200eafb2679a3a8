//! # Noise Vector Table
//!
//! A fixed-size table of deterministically generated unit vectors, looked up
//! by a hash of integer lattice coordinates. The table is generated once per
//! session from a seed string and shared by reference into every chunk build;
//! it is immutable for its whole lifetime.
//!
//! Lookup aliases at large coordinates by design: the hash reduces modulo the
//! table length, which only affects noise quality, never correctness.

use cgmath::{InnerSpace, Vector3};

use crate::noise::seeded_rng;

/// Hash primes for combining the three lattice coordinates. The combination
/// is order-sensitive: permuting (x, y, z) selects different vectors.
const PRIME_X: i64 = 73_856_093;
const PRIME_Y: i64 = 19_349_663;
const PRIME_Z: i64 = 83_492_791;

/// An immutable table of pseudo-random unit vectors.
pub struct NoiseVectorTable {
    vectors: Vec<Vector3<f32>>,
}

impl NoiseVectorTable {
    /// Generates `count` unit vectors from the given seed.
    ///
    /// Each vector is built from three seeded angles in `[0, 2π)` as
    /// `(cos a, sin b, cos c)`, then normalized. The same seed and count
    /// always yield the same sequence, enabling reproducible worlds.
    ///
    /// # Arguments
    /// * `seed` - Seed string for the angle generator
    /// * `count` - Number of vectors in the table
    ///
    /// # Panics
    /// Panics if `count` is zero: every lookup reduces modulo the table
    /// length, so an empty table has no valid answer.
    pub fn generate(seed: &str, count: usize) -> Self {
        assert!(count > 0, "noise vector table cannot be empty");
        let mut rng = seeded_rng(seed);
        let mut vectors = Vec::with_capacity(count);
        for _ in 0..count {
            let a = 2.0 * std::f32::consts::PI * rng.f32();
            let b = 2.0 * std::f32::consts::PI * rng.f32();
            let c = 2.0 * std::f32::consts::PI * rng.f32();
            vectors.push(Vector3::new(a.cos(), b.sin(), c.cos()).normalize());
        }
        NoiseVectorTable { vectors }
    }

    /// Returns the vector hashed from the given lattice coordinates.
    ///
    /// The coordinates are combined by multiplicative hash then xor and
    /// reduced modulo the table length. Collisions are tolerated.
    pub fn vector_at(&self, x: i64, y: i64, z: i64) -> Vector3<f32> {
        let mut hash = x.wrapping_mul(PRIME_X);
        hash ^= y.wrapping_mul(PRIME_Y);
        hash ^= z.wrapping_mul(PRIME_Z);
        self.vectors[hash.unsigned_abs() as usize % self.vectors.len()]
    }

    /// The number of vectors in the table.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the table is empty. Always false: `generate` rejects a zero
    /// count.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
