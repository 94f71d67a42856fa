//! Fractal height field generation: recursive midpoint displacement followed
//! by toroidal neighbour-averaging blur passes.

mod error;
mod generator;
mod grid;
mod smoothing;
mod subdivision;

pub use error::HeightFieldError;
pub use generator::{GeneratorParams, HeightVariation, generate, generation_rng};
pub use grid::HeightGrid;
pub use smoothing::smooth;
pub use subdivision::{SubdivisionBox, displace};
