//! Recursive midpoint displacement over square boxes.
//!
//! Every cycle displaces the midpoint and the four edge midpoints of each
//! active box, then splits it into four half-size children. Amplitude shrinks
//! as `1 / cycle`. Children live in a second buffer that is swapped with the
//! active one, so box storage is reused between cycles.

use rand::Rng;
use tessera_log::DiagnosticSink;

use crate::generator::HeightVariation;
use crate::grid::HeightGrid;

const TOP_LEFT: usize = 0;
const TOP_RIGHT: usize = 1;
const BOTTOM_LEFT: usize = 2;
const BOTTOM_RIGHT: usize = 3;

/// A square region of the grid awaiting displacement.
///
/// Corner heights are carried by value. A child inherits the heights its
/// parent computed, even where a neighbouring box later overwrote the shared
/// edge cell in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubdivisionBox {
    row: usize,
    col: usize,
    side: usize,
    /// Top-left, top-right, bottom-left, bottom-right.
    heights: [i32; 4],
    middle: i32,
    /// Top, left, right, bottom edge midpoints.
    edges: [i32; 4],
}

#[inline]
fn floor_avg2(a: i32, b: i32) -> i32 {
    (i64::from(a) + i64::from(b)).div_euclid(2) as i32
}

#[inline]
fn floor_avg4(h: [i32; 4]) -> i32 {
    h.iter().map(|&v| i64::from(v)).sum::<i64>().div_euclid(4) as i32
}

impl SubdivisionBox {
    /// A box with top-left corner `(row, col)` and the given side length.
    pub fn new(row: usize, col: usize, side: usize, heights: [i32; 4]) -> Self {
        Self {
            row,
            col,
            side,
            heights,
            middle: 0,
            edges: [0; 4],
        }
    }

    /// The box covering the whole grid, reading its corner heights from it.
    pub fn spanning(grid: &HeightGrid) -> Self {
        let last = grid.size() - 1;
        Self::new(
            0,
            0,
            last,
            [
                grid.get(0, 0),
                grid.get(0, last),
                grid.get(last, 0),
                grid.get(last, last),
            ],
        )
    }

    /// Side length in cells.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Grid positions of the four corners (top-left, top-right, bottom-left, bottom-right).
    pub fn corners(&self) -> [(usize, usize); 4] {
        let (r1, c1) = (self.row + self.side, self.col + self.side);
        [(self.row, self.col), (self.row, c1), (r1, self.col), (r1, c1)]
    }

    /// Corner heights this box was created with.
    pub fn heights(&self) -> [i32; 4] {
        self.heights
    }

    /// Write the centre cell: average of the four corners plus `offset`.
    pub fn set_middle(&mut self, grid: &mut HeightGrid, offset: i32) {
        let half = self.side / 2;
        self.middle = floor_avg4(self.heights).saturating_add(offset);
        grid.set(self.row + half, self.col + half, self.middle);
    }

    /// Write the four edge midpoints, each the average of its two corners
    /// plus the shared `offset`.
    pub fn set_edges(&mut self, grid: &mut HeightGrid, offset: i32) {
        let half = self.side / 2;
        let h = self.heights;
        let (r0, c0) = (self.row, self.col);
        let (r1, c1) = (r0 + self.side, c0 + self.side);

        self.edges = [
            floor_avg2(h[TOP_LEFT], h[TOP_RIGHT]).saturating_add(offset),
            floor_avg2(h[TOP_LEFT], h[BOTTOM_LEFT]).saturating_add(offset),
            floor_avg2(h[TOP_RIGHT], h[BOTTOM_RIGHT]).saturating_add(offset),
            floor_avg2(h[BOTTOM_LEFT], h[BOTTOM_RIGHT]).saturating_add(offset),
        ];

        grid.set(r0, c0 + half, self.edges[0]);
        grid.set(r0 + half, c0, self.edges[1]);
        grid.set(r0 + half, c1, self.edges[2]);
        grid.set(r1, c0 + half, self.edges[3]);
    }

    /// Push this box's four children into `out`.
    ///
    /// Children narrower than two cells have no midpoint, so none are
    /// produced for them. Returns `true` when the children pushed (if any)
    /// are the last level and should only receive the zero-displacement pass.
    pub fn split(&self, out: &mut Vec<SubdivisionBox>) -> bool {
        let half = self.side / 2;
        if half < 2 {
            return true;
        }

        let [tl, tr, bl, br] = self.heights;
        let [top, left, right, bottom] = self.edges;
        let mid = self.middle;
        let (r, c) = (self.row, self.col);

        out.push(Self::new(r, c, half, [tl, top, left, mid]));
        out.push(Self::new(r, c + half, half, [top, tr, mid, right]));
        out.push(Self::new(r + half, c, half, [left, mid, bl, bottom]));
        out.push(Self::new(r + half, c + half, half, [mid, right, bottom, br]));

        half <= 2
    }
}

/// Seed the corners with `variation.initial` and run midpoint displacement
/// until the boxes reach their smallest size.
///
/// Returns the number of randomised cycles. Perturbations are drawn from `rng`
/// in box order, so a given RNG state always yields the same grid.
pub fn displace<R: Rng>(
    grid: &mut HeightGrid,
    variation: &HeightVariation,
    rng: &mut R,
    sink: &dyn DiagnosticSink,
) -> u32 {
    let last = grid.size() - 1;
    for (i, j) in [(0, 0), (0, last), (last, 0), (last, last)] {
        grid.set(i, j, variation.initial);
    }

    let mut active = vec![SubdivisionBox::spanning(grid)];
    let mut next = Vec::with_capacity(4);
    let mut cycle: u32 = 0;
    let mut finished = false;

    while !finished {
        cycle += 1;
        sink.line(&format!(" Cycle: {cycle}"));

        let divisor = cycle as i32;
        let low = -(variation.low / divisor);
        let high = variation.high / divisor;

        for bx in active.iter_mut() {
            let middle_peak = rng.random_range(low..=high);
            let edge_peak = rng.random_range(low..=high);
            bx.set_middle(grid, middle_peak);
            bx.set_edges(grid, edge_peak);
        }

        next.clear();
        for bx in &active {
            finished = bx.split(&mut next);
        }
        std::mem::swap(&mut active, &mut next);
        tracing::trace!(cycle, boxes = active.len(), "displacement cycle done");
    }

    // Leftover boxes only get their averages filled in.
    for bx in active.iter_mut() {
        bx.set_middle(grid, 0);
        bx.set_edges(grid, 0);
    }

    cycle
}
