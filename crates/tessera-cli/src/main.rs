//! Command-line terrain generator.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p tessera-cli -- --size 1025 --seed 7 --pick -12.5,40 --export island`
//! to generate a terrain and write `island.ter` into the terrain directory.

use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use glam::Vec3;
use tessera_config::{CliArgs, Config, default_config_dir};
use tessera_log::TracingSink;
use tessera_terrain::{Ray, TERRAIN_FILE_EXTENSION, Terrain, TerrainError, TerrainSettings};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    tessera_log::init_logging(
        Some(&log_dir),
        cfg!(debug_assertions) || config.debug.log_to_file,
        Some(&config),
    );

    match run(&args, &config, &config_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "terrain generation failed");
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

/// Seed for runs whose config leaves the seed unset.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn terrain_dir(config: &Config, config_dir: &Path) -> PathBuf {
    if config.files.terrain_dir.is_absolute() {
        config.files.terrain_dir.clone()
    } else {
        config_dir.join(&config.files.terrain_dir)
    }
}

fn run(args: &CliArgs, config: &Config, config_dir: &Path) -> Result<(), TerrainError> {
    let settings = TerrainSettings::from_config(config, clock_seed());
    info!(
        size = settings.generator.size,
        seed = settings.generator.seed,
        level = settings.mesh.subdivision_level,
        threads = settings.worker_threads,
        "generating terrain"
    );

    let terrain = Terrain::generate(settings, &TracingSink)?;
    let stats = terrain.mesh().stats();
    info!(
        sub_meshes = stats.sub_meshes,
        vertices = stats.vertices,
        triangles = stats.triangles(),
        gpu_mb = stats.gpu_bytes as f64 / (1024.0 * 1024.0),
        "terrain ready"
    );

    if let Some((x, z)) = args.pick {
        let top = terrain.material_state().relative_height().world_max();
        let ray = Ray::new(Vec3::new(x, top + 100.0, z), Vec3::NEG_Y);
        match terrain.pick(&ray) {
            Some(hit) => {
                let point = hit.world_position(terrain.mesh().sub_meshes());
                info!(
                    sub_mesh = hit.sub_mesh,
                    triangle = hit.triangle,
                    barycentric = ?hit.barycentric,
                    point = ?point,
                    "pick hit"
                );
            }
            None => warn!(x, z, "pick missed the terrain"),
        }
    }

    if let Some(name) = &args.export {
        let path = terrain_dir(config, config_dir).join(format!("{name}.{TERRAIN_FILE_EXTENSION}"));
        terrain.export(&path)?;
        info!(path = %path.display(), "terrain written");
    }

    Ok(())
}
