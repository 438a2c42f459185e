//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// kitbag - CLI utility belt with a content cache
///
/// Fetches remote artifacts into a per-tool cache, extracting archives
/// transparently, and serves repeat requests from disk.
#[derive(Parser, Debug)]
#[command(name = "kitbag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v detail, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "KITBAG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Explicit cache root (overrides config file and environment)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_root: Option<PathBuf>,

    /// Tool name the default cache root derives from
    #[arg(long, global = true, value_name = "TOOL")]
    pub name: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a remote artifact into the cache (or serve the cached copy)
    Fetch(FetchArgs),

    /// Inspect a cache entry or directory
    Stat(StatArgs),

    /// Print a cached text entry
    Show(ShowArgs),

    /// Delete a cache entry or subtree
    Purge(PurgeArgs),

    /// Show or locate configuration
    Config(ConfigArgs),
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Source URL
    pub url: String,

    /// Logical entry name the artifact is stored under
    pub entry: String,

    /// Re-fetch even if the entry already exists
    #[arg(short, long)]
    pub force: bool,

    /// Store the payload as-is, never extract archives
    #[arg(long)]
    pub raw: bool,

    /// Extra request header, may repeat
    #[arg(short = 'H', long = "header", value_name = "KEY=VALUE")]
    pub headers: Vec<String>,
}

/// Arguments for the stat command
#[derive(Parser, Debug)]
pub struct StatArgs {
    /// Entry pathname; the whole store when omitted
    pub path: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Entry pathname
    pub path: String,
}

/// Arguments for the purge command
#[derive(Parser, Debug)]
pub struct PurgeArgs {
    /// Entry pathname
    pub path: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration as TOML
    Show,
    /// Print the config file path
    Path,
}

/// Output format for listings
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Plain,
}
