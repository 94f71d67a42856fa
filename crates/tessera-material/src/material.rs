//! Terrain lighting material and the combined material/height state.

use glam::Vec3;

use crate::relative_height::RelativeHeightState;
use crate::uniform::TerrainUniform;

/// Phong-style material applied to the whole terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    /// Ambient reflectance (RGB).
    pub ambient: Vec3,
    /// Diffuse reflectance (RGB).
    pub diffuse: Vec3,
    /// Specular reflectance (RGB).
    pub specular: Vec3,
    /// Specular exponent.
    pub shininess: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.3),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(0.1),
            shininess: 32.0,
        }
    }
}

/// Everything the terrain shader needs besides geometry and textures.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaterialHeightState {
    material: MaterialParams,
    relative_height: RelativeHeightState,
}

impl MaterialHeightState {
    pub fn new(material: MaterialParams, relative_height: RelativeHeightState) -> Self {
        Self {
            material,
            relative_height,
        }
    }

    pub fn set_material(&mut self, ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) {
        self.material = MaterialParams {
            ambient,
            diffuse,
            specular,
            shininess,
        };
    }

    pub fn set_relative_height(&mut self, state: RelativeHeightState) {
        self.relative_height = state;
    }

    pub fn material(&self) -> &MaterialParams {
        &self.material
    }

    pub fn relative_height(&self) -> &RelativeHeightState {
        &self.relative_height
    }

    /// Uniform block for upload, with an identity model matrix.
    pub fn to_uniform(&self) -> TerrainUniform {
        TerrainUniform::new(&self.material, &self.relative_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_material_replaces_all_fields() {
        let mut state = MaterialHeightState::default();
        state.set_material(Vec3::X, Vec3::Y, Vec3::Z, 8.0);
        let m = state.material();
        assert_eq!(m.ambient, Vec3::X);
        assert_eq!(m.diffuse, Vec3::Y);
        assert_eq!(m.specular, Vec3::Z);
        assert_eq!(m.shininess, 8.0);
    }

    #[test]
    fn test_set_relative_height() {
        let mut state = MaterialHeightState::default();
        let rh = RelativeHeightState::new(100, 0, 0.25);
        state.set_relative_height(rh);
        assert_eq!(*state.relative_height(), rh);
    }

    #[test]
    fn test_uniform_reflects_state() {
        let state = MaterialHeightState::new(
            MaterialParams {
                ambient: Vec3::new(0.1, 0.2, 0.3),
                shininess: 16.0,
                ..Default::default()
            },
            RelativeHeightState::new(20, 0, 1.0),
        );
        let u = state.to_uniform();
        assert_eq!(&u.light_ambient[..3], &[0.1, 0.2, 0.3]);
        assert_eq!(u.light_specular_shininess[3], 16.0);
        assert_eq!(u.relative_height, [10.0, -10.0, 10.0, 1.0]);
    }
}
