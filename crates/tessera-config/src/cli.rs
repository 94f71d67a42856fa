//! Command-line argument parsing for the Tessera terrain tool.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Tessera command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "tessera", about = "Fractal terrain generator")]
pub struct CliArgs {
    /// Grid side length (must be 2^k + 1).
    #[arg(long)]
    pub size: Option<usize>,

    /// Number of smoothing passes.
    #[arg(long)]
    pub smooth: Option<u32>,

    /// RNG seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sub-mesh subdivision level (4^level sub-meshes).
    #[arg(long)]
    pub subdivision: Option<u32>,

    /// World units per raw height unit.
    #[arg(long)]
    pub height_multiplier: Option<f32>,

    /// Worker thread count (0 = all CPUs).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the built terrain to `<terrain_dir>/<name>.ter`.
    #[arg(long)]
    pub export: Option<String>,

    /// Cast a pick ray straight down at world `x,z` and report the hit.
    #[arg(long, value_name = "X,Z", value_parser = parse_pick, allow_hyphen_values = true)]
    pub pick: Option<(f32, f32)>,
}

/// Parse a `x,z` world position.
fn parse_pick(raw: &str) -> Result<(f32, f32), String> {
    let (x, z) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `x,z`, got `{raw}`"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid coordinate `{v}`: {e}"))
    };
    Ok((coord(x)?, coord(z)?))
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(size) = args.size {
            self.generation.size = size;
        }
        if let Some(passes) = args.smooth {
            self.generation.smooth_passes = passes;
        }
        if let Some(seed) = args.seed {
            self.generation.seed = Some(seed);
        }
        if let Some(level) = args.subdivision {
            self.mesh.subdivision_level = level;
        }
        if let Some(mult) = args.height_multiplier {
            self.mesh.height_multiplier = mult;
        }
        if let Some(threads) = args.threads {
            self.runtime.worker_threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            size: None,
            smooth: None,
            seed: None,
            subdivision: None,
            height_multiplier: None,
            threads: None,
            log_level: None,
            config: None,
            export: None,
            pick: None,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            size: Some(129),
            seed: Some(99),
            ..empty_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.generation.size, 129);
        assert_eq!(config.generation.seed, Some(99));
        // Non-overridden fields retain defaults
        assert_eq!(config.generation.smooth_passes, 3);
        assert_eq!(config.mesh.subdivision_level, 2);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&empty_args());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_pick_pair() {
        let args =
            CliArgs::try_parse_from(["tessera", "--pick", "1.5,-2", "--subdivision", "1"]).unwrap();
        assert_eq!(args.pick, Some((1.5, -2.0)));
        assert_eq!(args.subdivision, Some(1));
    }

    #[test]
    fn test_parse_pick_negative_first() {
        let args = CliArgs::try_parse_from(["tessera", "--pick", "-3,4.25"]).unwrap();
        assert_eq!(args.pick, Some((-3.0, 4.25)));
        let args = CliArgs::try_parse_from(["tessera", "--pick=-1,-1"]).unwrap();
        assert_eq!(args.pick, Some((-1.0, -1.0)));
    }

    #[test]
    fn test_parse_pick_rejects_malformed() {
        for bad in ["1.5", "1.5,x", "1,2,3"] {
            assert!(
                CliArgs::try_parse_from(["tessera", "--pick", bad]).is_err(),
                "{bad} should be rejected"
            );
        }
    }
}
