//! CLI command definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "archshape")]
#[command(
    about = "Convert relational site location tags into georeferenced vector layers",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a tag file against a datum file and write point, line and polygon layers
    Convert {
        /// CSV with a header and one row: latitude, longitude, label
        #[arg(long, value_name = "CSV")]
        datum: Option<PathBuf>,

        /// CSV with a header and rows: id, tag, description
        #[arg(long, value_name = "CSV")]
        tags: Option<PathBuf>,

        /// Directory for the output layers (default: the tag file's directory)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Config file (default: $ARCHSHAPE_CONFIG, then ./archshape.toml)
        #[arg(short, long, value_name = "TOML")]
        config: Option<PathBuf>,

        /// Replace layer files that already exist
        #[arg(long)]
        overwrite: bool,

        /// Do not write layers that have no features
        #[arg(long)]
        skip_empty: bool,
    },

    /// Print the coordinates of one tag relative to a datum
    Resolve {
        /// Relational tag (e.g., N12W4, N2-4W4, N0-100E0-50)
        tag: String,

        /// Datum latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Datum longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Write a starter archshape.toml
    InitConfig {
        /// Where to write the file
        #[arg(default_value = "archshape.toml")]
        path: PathBuf,

        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },
}
