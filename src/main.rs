//! kitbag CLI entry point
//!
//! Parses arguments, resolves layered configuration and dispatches to
//! subcommands.

use clap::Parser;
use console::style;
use kitbag::cli::{Cli, Commands};
use kitbag::config::{ConfigManager, Overrides};
use kitbag::error::KitbagResult;
use kitbag::ui::{Reporter, Verbosity};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> KitbagResult<()> {
    let cli = Cli::parse();

    // Tracing for internal traces; user-facing diagnostics go through the
    // Reporter below. 0 = warn, 1 = info, 2+ = debug.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("kitbag=error")
    } else {
        match cli.verbose {
            0 => tracing_subscriber::EnvFilter::new("kitbag=warn"),
            1 => tracing_subscriber::EnvFilter::new("kitbag=info"),
            _ => tracing_subscriber::EnvFilter::new("kitbag=debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let reporter = Reporter::new(Verbosity::from_flags(cli.quiet, cli.verbose));

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager
        .load_resolved(&Overrides {
            cache_root: cli.cache_root.clone(),
            name: cli.name.clone(),
        })
        .await?;

    match cli.command {
        Commands::Fetch(args) => kitbag::cli::commands::fetch(args, &config, &reporter).await,
        Commands::Stat(args) => kitbag::cli::commands::stat(args, &config, &reporter).await,
        Commands::Show(args) => kitbag::cli::commands::show(args, &config, &reporter).await,
        Commands::Purge(args) => kitbag::cli::commands::purge(args, &config, &reporter).await,
        Commands::Config(args) => kitbag::cli::commands::config(args, &manager, &config).await,
    }
}
