//! # Error Module
//!
//! Construction-time failures of the terrain core. Spatial lookups that miss
//! (a column outside a chunk, a sample index beyond a column) are *not*
//! errors — they degrade to `None`/"not solid" so the simulation always has
//! a safe fallback. Only defects that would otherwise produce silently wrong
//! geometry surface through this type.

use std::error::Error;
use std::fmt;

/// Errors that can abort chunk synthesis or world setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerrainError {
    /// An upsampling kernel was handed a grid whose length is not a perfect
    /// square. This is a logic defect in the synthesis pipeline: continuing
    /// would corrupt chunk seams, so the chunk build is aborted instead.
    NonSquareGrid {
        /// The offending buffer length.
        len: usize,
    },
    /// The world configuration cannot produce consistent terrain
    /// (for example, a chunk size that octave subdivision does not divide).
    InvalidConfig(String),
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainError::NonSquareGrid { len } => {
                write!(f, "noise grid of length {} is not square", len)
            }
            TerrainError::InvalidConfig(reason) => {
                write!(f, "invalid world configuration: {}", reason)
            }
        }
    }
}

impl Error for TerrainError {}
