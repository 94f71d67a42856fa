//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level terrain tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Height field generation settings.
    pub generation: GenerationConfig,
    /// Mesh building settings.
    pub mesh: MeshConfig,
    /// Lighting material applied to the whole terrain.
    pub material: MaterialConfig,
    /// Texture and shader names recorded in saved terrains.
    pub files: FilesConfig,
    /// Worker pool settings.
    pub runtime: RuntimeConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Height field generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Grid side length in samples. Must be `2^k + 1`.
    pub size: usize,
    /// Number of neighbour-averaging blur passes after displacement.
    pub smooth_passes: u32,
    /// Height seeded into the four grid corners.
    pub initial_height: i32,
    /// Lower displacement bound for the first cycle (applied as `-low / cycle`).
    pub low_variation: i32,
    /// Upper displacement bound for the first cycle (applied as `high / cycle`).
    pub high_variation: i32,
    /// RNG seed. `None` derives a seed from the system clock.
    pub seed: Option<u64>,
}

/// Mesh building configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Sub-mesh count is `4^subdivision_level`.
    pub subdivision_level: u32,
    /// World units between adjacent grid samples.
    pub size_scale: f32,
    /// World units per raw height unit.
    pub height_multiplier: f32,
}

/// Terrain lighting material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaterialConfig {
    /// Ambient reflectance (RGB).
    pub ambient: [f32; 3],
    /// Diffuse reflectance (RGB).
    pub diffuse: [f32; 3],
    /// Specular reflectance (RGB).
    pub specular: [f32; 3],
    /// Specular exponent.
    pub shininess: f32,
}

/// Asset names referenced by the renderer and written into terrain files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilesConfig {
    /// Landscape textures, ordered low, medium, high, cliff.
    pub textures: [String; 4],
    /// Terrain shader program name.
    pub shader: String,
    /// Directory saved `.ter` files are written to.
    pub terrain_dir: PathBuf,
}

/// Worker pool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Number of worker threads. 0 uses one per logical CPU.
    pub worker_threads: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            size: 513,
            smooth_passes: 3,
            initial_height: 500,
            low_variation: 200,
            high_variation: 200,
            seed: None,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            subdivision_level: 2,
            size_scale: 1.0,
            height_multiplier: 0.1,
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            ambient: [0.3, 0.3, 0.3],
            diffuse: [0.8, 0.8, 0.8],
            specular: [0.1, 0.1, 0.1],
            shininess: 32.0,
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            textures: [
                "grass.png".to_string(),
                "dirt.png".to_string(),
                "rock.png".to_string(),
                "cliff.png".to_string(),
            ],
            shader: "terrain".to_string(),
            terrain_dir: PathBuf::from("terrain"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

/// Platform config directory for Tessera (`<config_dir>/tessera`).
///
/// Falls back to the working directory when the platform has no config dir.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("tessera"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Worker thread count with the "0 means all CPUs" rule applied.
    pub fn worker_threads(&self) -> usize {
        match self.runtime.worker_threads {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("size: 513"));
        assert!(ron_str.contains("subdivision_level: 2"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let ron_str = "(generation: (size: 257), mesh: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.generation.size, 257);
        assert_eq!(config.generation.smooth_passes, 3);
        assert_eq!(config.material, MaterialConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.generation.size = 1025;
        config.generation.seed = Some(7);
        config.files.shader = "terrain_debug".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.mesh.subdivision_level = 3;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().mesh.subdivision_level, 3);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_worker_threads_zero_means_all_cpus() {
        let mut config = Config::default();
        assert!(config.worker_threads() >= 1);
        config.runtime.worker_threads = 3;
        assert_eq!(config.worker_threads(), 3);
    }
}
