//! Mesh builder error types.

/// Errors reported while turning a height grid into sub-meshes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// The subdivision level does not split the grid into usable patches.
    #[error(
        "subdivision level {level} cannot partition a {size}x{size} grid (patch side {patch_side})"
    )]
    DegeneratePartition {
        size: usize,
        level: u32,
        patch_side: usize,
    },

    /// Horizontal scale must be a positive finite number.
    #[error("invalid size scale {0}")]
    InvalidScale(f32),

    /// Vertex or index buffers would not fit in memory or in `u32` indices.
    #[error("mesh for a {size}x{size} grid is too large")]
    TooLarge { size: usize },

    /// Sub-mesh index outside the partition.
    #[error("sub-mesh {index} does not exist (mesh has {count})")]
    SubMeshOutOfRange { index: usize, count: usize },

    /// The grid no longer matches the mesh it is rebuilding.
    #[error("grid size {actual} does not match mesh grid size {expected}")]
    GridMismatch { expected: usize, actual: usize },
}
