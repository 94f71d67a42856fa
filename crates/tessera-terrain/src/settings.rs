//! Settings for building a [`crate::Terrain`].

use std::path::Path;

use glam::Vec3;
use tessera_config::Config;
use tessera_heightfield::{GeneratorParams, HeightVariation};
use tessera_material::MaterialParams;
use tessera_mesh::MeshParams;

use crate::error::TerrainError;

/// Everything a terrain needs besides its height data.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainSettings {
    pub generator: GeneratorParams,
    pub mesh: MeshParams,
    pub material: MaterialParams,
    /// Low, medium, high and cliff texture files.
    pub textures: [String; 4],
    pub shader: String,
    /// Worker pool size, already resolved by [`Config::worker_threads`].
    /// Zero leaves the choice to rayon.
    pub worker_threads: usize,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self::from_config(&Config::default(), 0)
    }
}

impl TerrainSettings {
    /// Settings from a loaded config. `seed` is used when the config leaves
    /// the seed unset.
    pub fn from_config(config: &Config, seed: u64) -> Self {
        let generation = &config.generation;
        let generator = GeneratorParams::new(
            generation.size,
            generation.smooth_passes,
            HeightVariation::new(
                generation.initial_height,
                generation.low_variation,
                generation.high_variation,
            ),
        )
        .with_seed(generation.seed.unwrap_or(seed));

        let material = MaterialParams {
            ambient: Vec3::from_array(config.material.ambient),
            diffuse: Vec3::from_array(config.material.diffuse),
            specular: Vec3::from_array(config.material.specular),
            shininess: config.material.shininess,
        };

        Self {
            generator,
            mesh: MeshParams::new(
                config.mesh.subdivision_level,
                config.mesh.size_scale,
                config.mesh.height_multiplier,
            ),
            material,
            textures: config.files.textures.clone(),
            shader: config.files.shader.clone(),
            worker_threads: config.worker_threads(),
        }
    }

    /// Load (or create) `config.ron` in `config_dir` and derive settings.
    pub fn load(config_dir: &Path, seed: u64) -> Result<Self, TerrainError> {
        let config = Config::load_or_create(config_dir)?;
        Ok(Self::from_config(&config, seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_seed_wins() {
        let mut config = Config::default();
        config.generation.seed = Some(99);
        let settings = TerrainSettings::from_config(&config, 5);
        assert_eq!(settings.generator.seed, 99);
    }

    #[test]
    fn test_fallback_seed_used_when_unset() {
        let config = Config::default();
        let settings = TerrainSettings::from_config(&config, 5);
        assert_eq!(settings.generator.seed, 5);
    }

    #[test]
    fn test_values_copied_from_config() {
        let mut config = Config::default();
        config.generation.size = 65;
        config.mesh.subdivision_level = 3;
        config.material.shininess = 4.0;
        config.runtime.worker_threads = 3;
        let settings = TerrainSettings::from_config(&config, 0);
        assert_eq!(settings.generator.size, 65);
        assert_eq!(settings.mesh.subdivision_level, 3);
        assert_eq!(settings.material.shininess, 4.0);
        assert_eq!(settings.worker_threads, 3);
        assert_eq!(settings.textures, config.files.textures);
    }

    #[test]
    fn test_zero_threads_resolved_once() {
        let mut config = Config::default();
        config.runtime.worker_threads = 0;
        let settings = TerrainSettings::from_config(&config, 0);
        assert_eq!(settings.worker_threads, config.worker_threads());
        assert!(settings.worker_threads >= 1);
    }

    #[test]
    fn test_load_creates_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let settings = TerrainSettings::load(dir.path(), 11).unwrap();
        assert!(dir.path().join("config.ron").exists());
        assert_eq!(settings.generator.size, Config::default().generation.size);
        assert_eq!(settings.generator.seed, 11);
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "(generation: oops)").unwrap();
        assert!(matches!(
            TerrainSettings::load(dir.path(), 0),
            Err(TerrainError::Config(_))
        ));
    }
}
