//! GPU-side uniform block and the names the terrain shader binds them under.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use static_assertions::const_assert_eq;

use crate::material::MaterialParams;
use crate::relative_height::RelativeHeightState;

pub const LIGHT_AMBIENT: &str = "light.ambient";
pub const LIGHT_DIFFUSE: &str = "light.diffuse";
pub const LIGHT_SPECULAR: &str = "light.specular";
pub const LIGHT_SHININESS: &str = "light.shininess";
pub const RELATIVE_HEIGHT: &str = "textures.relativeHeight";
pub const MODEL_MATRIX: &str = "modelMat";

/// Landscape texture bindings, in texture-unit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TextureSlot {
    Low = 0,
    Medium = 1,
    High = 2,
    Cliff = 3,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 4] = [Self::Low, Self::Medium, Self::High, Self::Cliff];

    /// Texture unit index.
    pub fn unit(self) -> u32 {
        self as u32
    }

    /// Sampler uniform name in the terrain shader.
    pub fn sampler_name(self) -> &'static str {
        match self {
            Self::Low => "textures.lowlandMap",
            Self::Medium => "textures.mediumlandMap",
            Self::High => "textures.highlandMap",
            Self::Cliff => "textures.cliffMap",
        }
    }
}

/// Terrain uniform block, 128 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainUniform {
    /// xyz = ambient, w = padding.
    pub light_ambient: [f32; 4],
    /// xyz = diffuse, w = padding.
    pub light_diffuse: [f32; 4],
    /// xyz = specular, w = shininess.
    pub light_specular_shininess: [f32; 4],
    /// World max, world min, mid, height multiplier.
    pub relative_height: [f32; 4],
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
}

const_assert_eq!(std::mem::size_of::<TerrainUniform>(), 128);

impl TerrainUniform {
    pub fn new(material: &MaterialParams, relative_height: &RelativeHeightState) -> Self {
        Self {
            light_ambient: material.ambient.extend(0.0).to_array(),
            light_diffuse: material.diffuse.extend(0.0).to_array(),
            light_specular_shininess: material.specular.extend(material.shininess).to_array(),
            relative_height: relative_height.shader_vector(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }

    /// Same block with a translated model matrix.
    pub fn with_translation(mut self, translation: glam::Vec3) -> Self {
        self.model = Mat4::from_translation(translation).to_cols_array_2d();
        self
    }
}
