//! # Lattice Noise
//!
//! CPU-evaluated 3D gradient noise over the shared vector table. Each lattice
//! corner hashes to a unit vector; the dot products of corner-to-sample
//! offsets against those vectors are smoothly interpolated across the cell.
//!
//! The density builder samples this once per voxel when carved terrain is
//! enabled.

use cgmath::{Point3, Vector3};

use crate::noise::vector_table::NoiseVectorTable;

/// Smooth (Hermite) interpolation between two values.
fn smoothmix(a0: f32, a1: f32, w: f32) -> f32 {
    (a1 - a0) * (3.0 - w * 2.0) * w * w + a0
}

/// Samples 3D lattice noise at `pos` with the given lattice spacing.
///
/// The result is centered on zero; positive values read as solid and
/// negative as air once the depth bias is applied by the density builder.
pub fn sample(table: &NoiseVectorTable, grid_spacing: f32, pos: Point3<f32>) -> f32 {
    let p = Vector3::new(
        pos.x / grid_spacing,
        pos.y / grid_spacing,
        pos.z / grid_spacing,
    );

    let x0 = p.x.floor();
    let y0 = p.y.floor();
    let z0 = p.z.floor();
    let (x1, y1, z1) = (x0 + 1.0, y0 + 1.0, z0 + 1.0);

    // Fractional position within the lattice cell.
    let xd = p.x - x0;
    let yd = p.y - y0;
    let zd = p.z - z0;

    let (ix0, iy0, iz0) = (x0 as i64, y0 as i64, z0 as i64);
    let (ix1, iy1, iz1) = (ix0 + 1, iy0 + 1, iz0 + 1);

    let corner = |vx: f32, vy: f32, vz: f32, ix: i64, iy: i64, iz: i64| -> f32 {
        let v = table.vector_at(ix, iy, iz);
        (p.x - vx) * v.x + (p.y - vy) * v.y + (p.z - vz) * v.z
    };

    let afin000 = corner(x0, y0, z0, ix0, iy0, iz0);
    let afin001 = corner(x0, y0, z1, ix0, iy0, iz1);
    let afin010 = corner(x0, y1, z0, ix0, iy1, iz0);
    let afin011 = corner(x0, y1, z1, ix0, iy1, iz1);
    let afin100 = corner(x1, y0, z0, ix1, iy0, iz0);
    let afin101 = corner(x1, y0, z1, ix1, iy0, iz1);
    let afin110 = corner(x1, y1, z0, ix1, iy1, iz0);
    let afin111 = corner(x1, y1, z1, ix1, iy1, iz1);

    let c00 = smoothmix(afin000, afin100, xd);
    let c01 = smoothmix(afin001, afin101, xd);
    let c10 = smoothmix(afin010, afin110, xd);
    let c11 = smoothmix(afin011, afin111, xd);
    let c0 = smoothmix(c00, c10, yd);
    let c1 = smoothmix(c01, c11, yd);
    let c = smoothmix(c0, c1, zd);

    c * 0.5
}
