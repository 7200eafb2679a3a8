//! # Value Noise Synthesizer
//!
//! Produces a chunk's height field by blending several octaves of seeded
//! value noise. Each octave starts as a coarse grid of independent random
//! samples and is repeatedly doubled in resolution by bilinear upsampling
//! until it reaches the chunk's full side length.
//!
//! ## Seam continuity
//!
//! The coarse grid carries a one-cell padding ring on every side. The ring is
//! filled by regenerating the *neighboring chunk's* samples from that
//! neighbor's world-derived seed, at the same block width. Two adjacent
//! chunks therefore agree exactly on the lattice values along their shared
//! border without ever sharing state: both sides recompute the same numbers.
//!
//! ## Upsampling
//!
//! One 2x resolution doubling is expressed as four 2x2 convolution kernels,
//! one per sub-pixel phase of the upsample. The kernel step checks that its
//! input is square and refuses to continue otherwise: a malformed grid here
//! is a logic defect that must fail the chunk build, not truncate silently.

use log::debug;

use crate::config::WorldConfig;
use crate::error::TerrainError;
use crate::noise::seeded_rng;

/// The four 2x2 bilinear phase kernels, each normalized by 16.
const KERNEL_TOP_LEFT: [f32; 4] = [9.0, 3.0, 3.0, 1.0];
const KERNEL_TOP_RIGHT: [f32; 4] = [3.0, 9.0, 1.0, 3.0];
const KERNEL_BOTTOM_LEFT: [f32; 4] = [3.0, 1.0, 9.0, 3.0];
const KERNEL_BOTTOM_RIGHT: [f32; 4] = [1.0, 3.0, 3.0, 9.0];

/// A square grid of non-negative surface heights, one per column.
///
/// Row index follows world X, column index world Z: the height of the column
/// at local `(i, j)` is `get(i, j)`. Produced once at chunk construction;
/// the density builder may lower individual entries when noise carves the
/// surface down, after which the field is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    size: usize,
    data: Vec<f32>,
}

impl HeightField {
    pub(crate) fn new(size: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), size * size);
        HeightField { size, data }
    }

    /// Side length of the field, in columns.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The height of the column at local coordinates `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.size + j]
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: f32) {
        self.data[i * self.size + j] = value;
    }

    /// All heights in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Derives the deterministic seed string for one octave grid.
///
/// The format `"{cx}_{cz}_{width}"` is a stable contract: any chunk (or any
/// chunk's neighbor) deriving the same triple draws the same sample stream.
pub fn grid_seed(center_x: i32, center_z: i32, block_width: usize) -> String {
    format!("{}_{}_{}", center_x, center_z, block_width)
}

/// One value-noise sample: a whole-block height scaled into this octave's
/// share of the height ceiling.
fn sample_height(rng: &mut fastrand::Rng, max_height: f32, scale: f32) -> f32 {
    (max_height * rng.f32()).floor() * scale
}

/// Synthesizes the height field for the chunk centered at
/// `(center_x, center_z)`.
///
/// Octave contributions are summed; per-octave scales are normalized so the
/// blended field always lies in `[0, max_height]`. Octaves below
/// `config.start_octave` are skipped.
///
/// # Arguments
/// * `center_x` - World X of the chunk center (a multiple of the chunk size)
/// * `center_z` - World Z of the chunk center
/// * `config` - Validated world configuration
///
/// # Returns
/// The blended height field, or a `TerrainError` if an upsampling step was
/// handed a malformed grid.
pub fn synthesize(
    center_x: i32,
    center_z: i32,
    config: &WorldConfig,
) -> Result<HeightField, TerrainError> {
    let size = config.chunk_size as usize;
    let mut heights = vec![0.0f32; size * size];

    // Octave i contributes 2^i parts of (2^octaves - 2^start_octave), so the
    // finest octave dominates and the contributions sum to exactly one share
    // of max_height.
    let scale_denominator =
        ((1u64 << config.octaves) - (1u64 << config.start_octave)) as f32;

    for octave in config.start_octave..config.octaves {
        let block_width = size >> octave;
        let scale = (1u64 << octave) as f32 / scale_denominator;
        debug!(
            "octave {} for chunk ({}, {}): block width {}, scale {}",
            octave, center_x, center_z, block_width, scale
        );
        let contribution = octave_layer(center_x, center_z, config, block_width, scale, octave)?;
        for (height, value) in heights.iter_mut().zip(&contribution) {
            *height += value;
        }
    }

    Ok(HeightField::new(size, heights))
}

/// Builds one octave's full-resolution contribution.
fn octave_layer(
    center_x: i32,
    center_z: i32,
    config: &WorldConfig,
    block_width: usize,
    scale: f32,
    upsample_passes: u32,
) -> Result<Vec<f32>, TerrainError> {
    let size = config.chunk_size as usize;
    let mut grid = padded_octave_grid(center_x, center_z, config, block_width, scale);

    for _ in 0..upsample_passes {
        grid = upsample(&grid)?;
    }

    // The padding ring has served its purpose; keep the interior only.
    let dim = square_dim(grid.len())?;
    debug_assert_eq!(dim, size + 2);
    let mut interior = vec![0.0f32; size * size];
    for i in 0..size {
        for j in 0..size {
            interior[i * size + j] = grid[(i + 1) * dim + (j + 1)];
        }
    }
    Ok(interior)
}

/// Fills the `(width + 2)^2` coarse grid for one octave: interior samples
/// from this chunk's seed, padding ring from the eight neighbors' seeds.
fn padded_octave_grid(
    center_x: i32,
    center_z: i32,
    config: &WorldConfig,
    width: usize,
    scale: f32,
) -> Vec<f32> {
    let padded = width + 2;
    let mut grid = vec![0.0f32; padded * padded];

    let mut rng = seeded_rng(&grid_seed(center_x, center_z, width));
    for i in 1..=width {
        for j in 1..=width {
            grid[padded * i + j] = sample_height(&mut rng, config.max_height, scale);
        }
    }

    // Neighbor grids at the same block width, fully regenerated from the
    // neighbor's own world-derived seed. Row index tracks world X, so the
    // "top" neighbor sits at smaller X.
    let chunk_size = config.chunk_size;
    let neighbor_centers = [
        (center_x - chunk_size, center_z),              // top
        (center_x + chunk_size, center_z),              // bottom
        (center_x, center_z - chunk_size),              // left
        (center_x, center_z + chunk_size),              // right
        (center_x + chunk_size, center_z + chunk_size), // bottom-right
        (center_x + chunk_size, center_z - chunk_size), // bottom-left
        (center_x - chunk_size, center_z + chunk_size), // top-right
        (center_x - chunk_size, center_z - chunk_size), // top-left
    ];
    let neighbor: Vec<Vec<f32>> = neighbor_centers
        .iter()
        .map(|&(nx, nz)| {
            let mut rng = seeded_rng(&grid_seed(nx, nz, width));
            let mut samples = vec![0.0f32; width * width];
            for value in samples.iter_mut() {
                *value = sample_height(&mut rng, config.max_height, scale);
            }
            samples
        })
        .collect();

    // Edges: each padding cell mirrors the adjoining interior cell of the
    // neighbor that owns it.
    for i in 1..=width {
        // top padding row <- top neighbor's last row
        grid[i] = neighbor[0][(width - 1) * width + (i - 1)];
        // bottom padding row <- bottom neighbor's first row
        grid[(width + 1) * padded + i] = neighbor[1][i - 1];
        // left padding column <- left neighbor's last column
        grid[i * padded] = neighbor[2][(i - 1) * width + (width - 1)];
        // right padding column <- right neighbor's first column
        grid[i * padded + width + 1] = neighbor[3][(i - 1) * width];
    }
    // Corners.
    grid[0] = neighbor[7][width * width - 1];
    grid[width + 1] = neighbor[6][width * width - width];
    grid[(width + 1) * padded] = neighbor[5][width - 1];
    grid[padded * padded - 1] = neighbor[4][0];

    grid
}

/// Doubles a padded grid's resolution with the four phase kernels.
///
/// The output dimension is `(dim - 2) * 2 + 2`: the interior doubles while
/// the padding ring thins by half in world units each pass.
fn upsample(grid: &[f32]) -> Result<Vec<f32>, TerrainError> {
    let top_left = apply_2x2_kernel(&KERNEL_TOP_LEFT, grid)?;
    let top_right = apply_2x2_kernel(&KERNEL_TOP_RIGHT, grid)?;
    let bottom_left = apply_2x2_kernel(&KERNEL_BOTTOM_LEFT, grid)?;
    let bottom_right = apply_2x2_kernel(&KERNEL_BOTTOM_RIGHT, grid)?;

    let old_dim = square_dim(grid.len())?;
    let sub_dim = old_dim - 1;
    let new_dim = (old_dim - 2) * 2 + 2;
    let mut out = vec![0.0f32; new_dim * new_dim];
    for j in 0..new_dim {
        for k in 0..new_dim {
            let phase = match (j % 2, k % 2) {
                (0, 0) => &top_left,
                (0, 1) => &top_right,
                (1, 0) => &bottom_left,
                _ => &bottom_right,
            };
            out[j * new_dim + k] = phase[(j / 2) * sub_dim + k / 2];
        }
    }
    Ok(out)
}

/// Applies one 2x2 kernel to every cell pair of a square matrix, producing a
/// `(dim - 1)^2` result normalized by 16.
///
/// A non-square input is a logic defect upstream; it aborts the synthesis
/// rather than producing silently wrong geometry.
fn apply_2x2_kernel(kernel: &[f32; 4], matrix: &[f32]) -> Result<Vec<f32>, TerrainError> {
    let dim = square_dim(matrix.len())?;
    let out_dim = dim - 1;
    let mut filtered = vec![0.0f32; out_dim * out_dim];
    for i in 0..out_dim {
        for j in 0..out_dim {
            let idx = dim * i + j;
            let next = dim * (i + 1) + j;
            filtered[i * out_dim + j] = (kernel[0] * matrix[idx]
                + kernel[1] * matrix[idx + 1]
                + kernel[2] * matrix[next]
                + kernel[3] * matrix[next + 1])
                / 16.0;
        }
    }
    Ok(filtered)
}

/// The side length of a square buffer, or `NonSquareGrid` if there is none.
fn square_dim(len: usize) -> Result<usize, TerrainError> {
    let dim = (len as f64).sqrt().round() as usize;
    if dim * dim != len {
        return Err(TerrainError::NonSquareGrid { len });
    }
    Ok(dim)
}
