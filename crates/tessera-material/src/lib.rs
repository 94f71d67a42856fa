//! Terrain-wide lighting material and relative-height normalisation, plus the
//! uniform block a renderer uploads for them.

mod material;
mod relative_height;
mod uniform;

pub use material::{MaterialHeightState, MaterialParams};
pub use relative_height::RelativeHeightState;
pub use uniform::{
    LIGHT_AMBIENT, LIGHT_DIFFUSE, LIGHT_SHININESS, LIGHT_SPECULAR, MODEL_MATRIX, RELATIVE_HEIGHT,
    TerrainUniform, TextureSlot,
};
