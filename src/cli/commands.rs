//! CLI arguments

use clap::Parser;
use std::path::PathBuf;

/// Singer tap for the Pingboard API
#[derive(Parser, Debug)]
#[command(name = "tap-pingboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON, or YAML by extension)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Print the catalog of available streams and exit
    #[arg(short, long)]
    pub discover: bool,

    /// Catalog selecting the streams to sync (default: every stream)
    #[arg(long, alias = "properties")]
    pub catalog: Option<PathBuf>,

    /// State file; accepted for runner compatibility, bookmarks are not read
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
