//! Per-vertex normals from the 8-neighbour stencil.
//!
//! Around each vertex the eight difference vectors are visited in order
//! up, up-left, left, down-left, down, down-right, right, up-right. Every
//! direction is paired with the one two steps further on, giving eight
//! face-normal estimates that are summed and normalised. Estimates that
//! would need a neighbour outside the grid are skipped; there is no
//! wraparound.

use glam::Vec3;
use rayon::prelude::*;

/// Row/column steps for the eight neighbours, in stencil order.
const STENCIL: [(isize, isize); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Normal of vertex `(row, col)` of a `size × size` vertex grid.
///
/// `position(i, j)` returns the world position of any vertex in the grid.
/// A vertex with no usable estimate (degenerate geometry) gets `+Y`.
pub fn vertex_normal(
    size: usize,
    row: usize,
    col: usize,
    position: impl Fn(usize, usize) -> Vec3,
) -> Vec3 {
    let centre = position(row, col);

    let mut deltas = [None; 8];
    for (slot, &(di, dj)) in deltas.iter_mut().zip(STENCIL.iter()) {
        let (Some(i), Some(j)) = (row.checked_add_signed(di), col.checked_add_signed(dj)) else {
            continue;
        };
        if i < size && j < size {
            *slot = Some(position(i, j) - centre);
        }
    }

    let mut sum = Vec3::ZERO;
    for k in 0..8 {
        if let (Some(a), Some(b)) = (deltas[(k + 2) % 8], deltas[k]) {
            // Flat ground gives cross(left, up) = -Y, hence the negation.
            sum -= a.cross(b).normalize_or_zero();
        }
    }
    sum.try_normalize().unwrap_or(Vec3::Y)
}

/// Normals for a whole `size * size` row-major vertex grid, computed in parallel over rows.
pub(crate) fn vertex_normals(positions: &[Vec3], size: usize) -> Vec<Vec3> {
    debug_assert_eq!(positions.len(), size * size, "position grid must be square");

    let mut normals = vec![Vec3::ZERO; positions.len()];
    normals
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(row, out)| {
            for (col, n) in out.iter_mut().enumerate() {
                *n = vertex_normal(size, row, col, |i, j| positions[i * size + j]);
            }
        });
    normals
}
