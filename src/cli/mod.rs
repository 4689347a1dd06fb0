//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod lookup;
mod pack;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// blockatlas - Pack resource-pack block textures into a grid atlas
#[derive(Parser)]
#[command(name = "blockatlas")]
#[command(about = "Pack resource-pack block textures into a fixed-grid atlas and slot index")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the atlas image and index from the configured resource packs
    Pack {
        /// Config file (default: nearest atlas.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Resource pack root, highest priority first (repeatable, replaces config)
        #[arg(short, long = "pack", value_name = "DIR")]
        packs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Cell side length in pixels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        cell_size: Option<u32>,

        /// Atlas side length in pixels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        size: Option<u32>,

        /// Also pack textures/item
        #[arg(long)]
        items: bool,

        /// Identifier to leave out (repeatable)
        #[arg(long, value_name = "ID")]
        exclude: Vec<String>,

        /// Pack in memory without writing artifacts
        #[arg(long)]
        dry_run: bool,

        /// Emit progress as JSON lines
        #[arg(long)]
        json: bool,

        /// Show every placed texture
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the slot and UVs of an identifier in a written index
    Lookup {
        /// Index JSON written by `pack`
        index: PathBuf,

        /// Texture identifier (namespace defaults to minecraft)
        id: String,

        /// Cells per atlas line
        #[arg(long, default_value = "32", value_parser = clap::value_parser!(u32).range(1..))]
        cells_per_line: u32,

        /// Quarter turns applied to the face UVs (0-3)
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=3))]
        rotation: u8,

        /// Face sub-rectangle in cell units: x1,y1,x2,y2
        #[arg(long, value_delimiter = ',', value_name = "X1,Y1,X2,Y2")]
        part: Option<Vec<f32>>,

        /// Use slot 0 for identifiers missing from the index
        #[arg(long)]
        fallback: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack {
            config,
            packs,
            out,
            cell_size,
            size,
            items,
            exclude,
            dry_run,
            json,
            verbose,
        } => pack::run_pack(pack::PackArgs {
            config,
            packs,
            out,
            cell_size,
            size,
            items,
            exclude,
            dry_run,
            json,
            verbose,
        }),
        Commands::Lookup { index, id, cells_per_line, rotation, part, fallback, json } => {
            lookup::run_lookup(&index, &id, cells_per_line, rotation, part.as_deref(), fallback, json)
        }
    }
}
