//! Configuration system for Tessera.
//!
//! Generation, meshing and material settings persist to disk as a RON file.
//! CLI flags parsed with clap override whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, FilesConfig, GenerationConfig, MaterialConfig, MeshConfig, RuntimeConfig,
    default_config_dir,
};
pub use error::ConfigError;
