//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rtu")]
#[command(about = "Match and export RetroArch playlist thumbnails", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        default_value = ".config/settings.toml"
    )]
    pub config: PathBuf,

    /// Log at debug level regardless of the configured level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match playlist entries against thumbnail filenames
    Match(MatchArgs),

    /// Clear every thumbnail reference in a playlist
    Reset(ResetArgs),

    /// List the candidate images a match run would consider
    Scan(ScanArgs),
}

#[derive(Args)]
pub struct MatchArgs {
    /// Playlist file (.lpl)
    #[arg(short, long, value_name = "FILE")]
    pub playlist: PathBuf,

    /// Directory holding candidate thumbnail images
    #[arg(short, long, value_name = "DIR")]
    pub thumbnails: PathBuf,

    /// Minimum similarity for a pair to count, 0.0 to 1.0
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Runner-up suggestions to report per entry
    #[arg(long, value_name = "N")]
    pub max_candidates: Option<usize>,

    /// Ignore region tags like (USA) or [!] when comparing
    #[arg(long, conflicts_with = "keep_region_tags")]
    pub strip_region_tags: bool,

    /// Compare region tags literally
    #[arg(long)]
    pub keep_region_tags: bool,

    /// Copy matched thumbnails into a directory; with no value, the
    /// configured export folder is used
    #[arg(long, value_name = "DIR")]
    pub copy_to: Option<Option<PathBuf>>,

    /// Write the updated playlist back to disk
    #[arg(long)]
    pub save: bool,

    /// Playlist output path (defaults to the input path)
    #[arg(short, long, value_name = "FILE", requires = "save")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Playlist file (.lpl)
    #[arg(short, long, value_name = "FILE")]
    pub playlist: PathBuf,

    /// Playlist output path (defaults to the input path)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Directory holding candidate thumbnail images
    #[arg(short, long, value_name = "DIR")]
    pub thumbnails: PathBuf,

    /// List every plain file, not just recognized image formats
    #[arg(long)]
    pub all: bool,
}
