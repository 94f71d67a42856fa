//! Toroidal 8-neighbour blur.
//!
//! Each pass reads a frozen snapshot and writes a separate buffer, so rows
//! are processed in parallel with no ordering effects.

use rayon::prelude::*;
use tessera_log::DiagnosticSink;

use crate::grid::HeightGrid;

/// Floor of the mean of the 8 neighbours of `(row, col)`, wrapping at the
/// grid edges (index `-1` is `size - 1` and `size` is `0`).
pub(crate) fn neighbour_average(grid: &HeightGrid, row: usize, col: usize) -> i32 {
    let size = grid.size();
    let up = if row == 0 { size - 1 } else { row - 1 };
    let down = if row + 1 == size { 0 } else { row + 1 };
    let left = if col == 0 { size - 1 } else { col - 1 };
    let right = if col + 1 == size { 0 } else { col + 1 };

    let sum: i64 = [
        (up, left),
        (row, left),
        (down, left),
        (up, col),
        (down, col),
        (up, right),
        (row, right),
        (down, right),
    ]
    .iter()
    .map(|&(i, j)| i64::from(grid.get(i, j)))
    .sum();

    sum.div_euclid(8) as i32
}

/// One blur pass from `source` into `target`. Both grids share a size.
pub(crate) fn smooth_pass(source: &HeightGrid, target: &mut HeightGrid) {
    let size = source.size();
    debug_assert_eq!(size, target.size(), "smoothing buffers must match in size");

    target
        .cells_mut()
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(row, cells)| {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = neighbour_average(source, row, col);
            }
        });
}

/// Run `passes` blur passes in place. Zero passes leaves the grid untouched.
pub fn smooth(grid: &mut HeightGrid, passes: u32, sink: &dyn DiagnosticSink) {
    for pass in 0..passes {
        sink.line(&format!("   Cycle: {pass}"));
        let snapshot = grid.clone();
        smooth_pass(&snapshot, grid);
    }
}
