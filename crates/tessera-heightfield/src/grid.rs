//! Square grid of integer elevation samples.

use crate::error::HeightFieldError;

/// A square `size × size` grid of raw integer heights, stored row-major.
///
/// `size` is always `2^k + 1` so the grid can be bisected recursively.
/// Row `i` maps to world z and column `j` to world x once meshed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightGrid {
    size: usize,
    cells: Vec<i32>,
}

impl HeightGrid {
    /// Returns `true` if `size` is `2^k + 1` with `k >= 1`.
    pub fn is_valid_size(size: usize) -> bool {
        size >= 3 && (size - 1).is_power_of_two()
    }

    /// Allocate a grid with every cell set to `value`.
    ///
    /// The size is validated and the allocation is attempted fallibly, so an
    /// oversized request returns [`HeightFieldError::TooLarge`] instead of
    /// aborting.
    pub fn filled(size: usize, value: i32) -> Result<Self, HeightFieldError> {
        if !Self::is_valid_size(size) {
            return Err(HeightFieldError::InvalidSize(size));
        }
        let count = size
            .checked_mul(size)
            .ok_or(HeightFieldError::TooLarge { size })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(count)
            .map_err(|_| HeightFieldError::TooLarge { size })?;
        cells.resize(count, value);

        Ok(Self { size, cells })
    }

    /// Allocate a zeroed grid.
    pub fn new(size: usize) -> Result<Self, HeightFieldError> {
        Self::filled(size, 0)
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(
        size: usize,
        mut f: impl FnMut(usize, usize) -> i32,
    ) -> Result<Self, HeightFieldError> {
        let mut grid = Self::new(size)?;
        for i in 0..size {
            for j in 0..size {
                grid.cells[i * size + j] = f(i, j);
            }
        }
        Ok(grid)
    }

    /// Bytes needed for the cell storage of a `size × size` grid.
    pub fn memory_bytes(size: usize) -> Option<usize> {
        size.checked_mul(size)?
            .checked_mul(std::mem::size_of::<i32>())
    }

    /// Side length in samples.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells (`size²`).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; a valid grid has at least 9 cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat row-major index of `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Height at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the cell is outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.cells[self.index(row, col)]
    }

    /// Height at `(row, col)`, or `None` outside the grid.
    pub fn try_get(&self, row: usize, col: usize) -> Option<i32> {
        (row < self.size && col < self.size).then(|| self.get(row, col))
    }

    /// Overwrite the height at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the cell is outside the grid.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    /// Add `delta` to the cell at `(row, col)`, saturating at the `i32` range.
    pub fn add(&mut self, row: usize, col: usize, delta: i32) -> Result<i32, HeightFieldError> {
        if row >= self.size || col >= self.size {
            return Err(HeightFieldError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        let idx = self.index(row, col);
        self.cells[idx] = self.cells[idx].saturating_add(delta);
        Ok(self.cells[idx])
    }

    /// Row-major view of every cell.
    #[inline]
    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    /// Mutable row-major view of every cell.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [i32] {
        &mut self.cells
    }

    /// One row of the grid.
    pub fn row(&self, row: usize) -> &[i32] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    /// Global `(max, min)` height in a single pass.
    pub fn max_min(&self) -> (i32, i32) {
        self.cells
            .iter()
            .fold((i32::MIN, i32::MAX), |(max, min), &h| (max.max(h), min.min(h)))
    }
}
