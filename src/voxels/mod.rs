//! # Voxels Module
//!
//! World state: chunks of generated terrain and the store that streams them
//! in and out around the viewpoint.

pub mod chunk;
pub mod world;
