//! # Noise Module
//!
//! Deterministic noise sources for terrain synthesis:
//!
//! * `vector_table` - a fixed table of seeded unit vectors, the hash target
//!   for lattice-based noise
//! * `lattice` - 3D gradient noise over the vector table, used to carve
//!   density columns
//! * `value` - multi-octave value noise with seam-exact chunk borders, the
//!   source of every height field
//!
//! All randomness flows through string-derived seeds so that any chunk, on
//! any machine, regenerates bit-identical terrain from the same seed.

pub mod lattice;
pub mod value;
pub mod vector_table;

/// Builds a seeded generator from a seed string.
///
/// The string is hashed with FNV-1a (64-bit) and the digest seeds the
/// generator. The seed-string formats used by the synthesizer are stable,
/// documented contracts: `"{cx}_{cz}_{width}"` for value-noise grids, so two
/// chunks deriving the same string always draw the same sample stream.
pub fn seeded_rng(seed: &str) -> fastrand::Rng {
    fastrand::Rng::with_seed(fnv1a_64(seed.as_bytes()))
}

/// FNV-1a over a byte string. Stable across platforms and releases.
fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
