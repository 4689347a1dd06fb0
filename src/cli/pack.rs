//! Pack command implementation

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::loader::{
    default_config, find_config, merge_cli_overrides, project_root, read_config, CliOverrides,
};
use crate::config::ConfigError;
use crate::error::AtlasError;
use crate::pipeline::Packer;
use crate::progress::{ConsoleProgress, JsonProgress, ProgressReporter};

/// Arguments of `blockatlas pack`
#[derive(Debug, Default)]
pub struct PackArgs {
    pub config: Option<PathBuf>,
    pub packs: Vec<PathBuf>,
    pub out: Option<PathBuf>,
    pub cell_size: Option<u32>,
    pub size: Option<u32>,
    pub items: bool,
    pub exclude: Vec<String>,
    pub dry_run: bool,
    pub json: bool,
    pub verbose: bool,
}

/// Run the pack command
pub fn run_pack(args: PackArgs) -> ExitCode {
    let cwd = std::env::current_dir().unwrap_or_default();

    // An explicit --config must exist; otherwise search upwards
    let config_path = match &args.config {
        Some(path) if !path.is_file() => {
            eprintln!("Error: config file not found: {}", path.display());
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Some(path) => Some(path.clone()),
        None => find_config(),
    };

    let (mut config, project_root) = match config_path {
        Some(path) => {
            if args.verbose && !args.json {
                eprintln!("Using config: {}", path.display());
            }
            // Validation waits until the CLI overrides are merged
            let config = match read_config(Some(&path)) {
                Ok(config) => config,
                Err(e @ ConfigError::Io(_)) => {
                    eprintln!("Error loading config: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
                Err(e) => {
                    eprintln!("Error loading config: {}", e);
                    return ExitCode::from(EXIT_INVALID_ARGS);
                }
            };
            // A bare file name has an empty parent
            let root = match project_root(&path) {
                Some(root) if !root.as_os_str().is_empty() => root.to_path_buf(),
                _ => cwd.clone(),
            };
            (config, root)
        }
        None => {
            if args.verbose && !args.json {
                eprintln!("No atlas.toml found, using defaults");
            }
            (default_config(), cwd.clone())
        }
    };

    // CLI paths are relative to where the command runs, not to the config
    let overrides = CliOverrides {
        packs: args.packs.iter().map(|p| cwd.join(p)).collect(),
        out: args.out.as_ref().map(|p| cwd.join(p)),
        cell_size: args.cell_size,
        size: args.size,
        include_items: args.items,
        exclude: args.exclude.clone(),
    };
    merge_cli_overrides(&mut config, &overrides);

    let reporter: Box<dyn ProgressReporter> = if args.json {
        Box::new(JsonProgress::new())
    } else {
        Box::new(
            ConsoleProgress::new()
                .with_colors(std::io::stderr().is_terminal())
                .with_verbose(args.verbose),
        )
    };

    let packer = Packer::new(config, project_root).with_reporter(reporter).with_dry_run(args.dry_run);

    match packer.run() {
        Ok(report) => {
            if args.json {
                let summary = serde_json::json!({
                    "placed": report.placed,
                    "skipped": report.skipped.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
                    "overridden": report.overridden.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
                    "recolored": report.recolored.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
                    "image": report.outputs.as_ref().map(|o| o.image.display().to_string()),
                    "index": report.outputs.as_ref().map(|o| o.index.display().to_string()),
                    "duration_ms": report.duration.as_millis() as u64,
                });
                println!("{}", summary);
            } else if let Some(outputs) = &report.outputs {
                println!("{}", outputs.image.display());
                println!("{}", outputs.index.display());
            } else {
                let paths = packer.artifact_paths();
                println!("Dry run - would write:");
                println!("  {}", paths.image.display());
                println!("  {}", paths.index.display());
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(AtlasError::Config(ConfigError::Validation(errors))) => {
            eprintln!("Error: invalid configuration");
            for error in errors {
                eprintln!("  - {}", error);
            }
            ExitCode::from(EXIT_INVALID_ARGS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
