//! Height field generation entry point.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tessera_log::DiagnosticSink;

use crate::error::HeightFieldError;
use crate::grid::HeightGrid;
use crate::smoothing::smooth;
use crate::subdivision::displace;

/// Corner seed height and first-cycle displacement bounds.
///
/// Cycle `c` draws offsets uniformly from `[-low / c, high / c]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeightVariation {
    /// Height written into the four grid corners.
    pub initial: i32,
    /// Magnitude of the lowest first-cycle offset.
    pub low: i32,
    /// Highest first-cycle offset.
    pub high: i32,
}

impl HeightVariation {
    pub fn new(initial: i32, low: i32, high: i32) -> Self {
        Self { initial, low, high }
    }
}

/// Everything needed to generate one height grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorParams {
    /// Grid side, `2^k + 1`.
    pub size: usize,
    /// Blur passes after displacement.
    pub smooth_passes: u32,
    pub variation: HeightVariation,
    /// Seed for the displacement RNG.
    pub seed: u64,
}

impl GeneratorParams {
    pub fn new(size: usize, smooth_passes: u32, variation: HeightVariation) -> Self {
        Self {
            size,
            smooth_passes,
            variation,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the parameters without allocating anything.
    pub fn validate(&self) -> Result<(), HeightFieldError> {
        if !HeightGrid::is_valid_size(self.size) {
            return Err(HeightFieldError::InvalidSize(self.size));
        }
        let HeightVariation { low, high, .. } = self.variation;
        if low < 0 || high < 0 {
            return Err(HeightFieldError::InvalidVariation { low, high });
        }
        Ok(())
    }
}

/// Deterministic RNG for a generation seed.
pub fn generation_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generate a height grid: seed the corners, displace midpoints recursively,
/// then blur.
///
/// Invalid parameters are rejected before any allocation.
pub fn generate(
    params: &GeneratorParams,
    sink: &dyn DiagnosticSink,
) -> Result<HeightGrid, HeightFieldError> {
    params.validate()?;
    let _span = tracing::info_span!("generate", size = params.size, seed = params.seed).entered();

    let bytes =
        HeightGrid::memory_bytes(params.size).ok_or(HeightFieldError::TooLarge { size: params.size })?;
    sink.line(&format!(
        "Required Memory for Height Data: {:.2}MB",
        bytes as f64 / (1024.0 * 1024.0)
    ));
    let mut grid = HeightGrid::new(params.size)?;

    sink.line("Computing Height Data...");
    let mut rng = generation_rng(params.seed);
    let cycles = displace(&mut grid, &params.variation, &mut rng, sink);

    sink.line("Running Height Map Blur Cycles...");
    smooth(&mut grid, params.smooth_passes, sink);

    tracing::debug!(cycles, passes = params.smooth_passes, "height field generated");
    Ok(grid)
}
