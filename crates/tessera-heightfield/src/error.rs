//! Height field error types.

/// Errors reported by height grid allocation and generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeightFieldError {
    /// The grid side is not `2^k + 1` with `k >= 1`.
    #[error("grid size {0} is not of the form 2^k + 1 (k >= 1)")]
    InvalidSize(usize),

    /// The displacement bounds would produce an empty random range.
    #[error("height variation bounds must be non-negative (low {low}, high {high})")]
    InvalidVariation { low: i32, high: i32 },

    /// The grid does not fit in memory.
    #[error("a {size}x{size} height grid cannot be allocated")]
    TooLarge { size: usize },

    /// A cell index lies outside the grid.
    #[error("cell ({row}, {col}) is outside a {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },
}
