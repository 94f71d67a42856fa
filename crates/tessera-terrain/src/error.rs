//! Terrain facade errors.

use tessera_config::ConfigError;
use tessera_heightfield::HeightFieldError;
use tessera_mesh::MeshError;

/// Errors reading or writing a `.ter` terrain file.
///
/// Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum TerrainFileError {
    #[error("terrain file I/O failed")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected `{expected}`, found `{found}`")]
    UnexpectedLine {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("line {line}: invalid value for {field}: `{value}`")]
    InvalidValue {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: {what} count is {found}, expected {expected}")]
    CountMismatch {
        line: usize,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: index {index} out of range for {vertices} vertices")]
    IndexOutOfRange {
        line: usize,
        index: u32,
        vertices: usize,
    },

    #[error("unexpected end of file, expected `{expected}`")]
    UnexpectedEof { expected: String },
}

/// Top-level error for terrain operations.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    #[error("height field generation failed")]
    Generation(#[from] HeightFieldError),

    #[error("mesh build failed")]
    Mesh(#[from] MeshError),

    #[error("terrain file error")]
    File(#[from] TerrainFileError),

    #[error("configuration error")]
    Config(#[from] ConfigError),

    #[error("failed to start the terrain worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// The pick hit does not refer to a triangle of the current mesh.
    #[error("pick hit on sub-mesh {sub_mesh}, triangle {triangle} is stale")]
    StaleHit { sub_mesh: usize, triangle: usize },
}
