//! gobi - build-info for Go modules
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use gobi::cli::{Cli, Commands};
use gobi::config::ConfigManager;
use gobi::error::GobiResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            // Propagate go's own exit status
            match e.exit_code().and_then(|code| u8::try_from(code).ok()) {
                Some(code) if code != 0 => ExitCode::from(code),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

async fn run() -> GobiResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("gobi=warn"),
        1 => EnvFilter::new("gobi=info"),
        _ => EnvFilter::new("gobi=debug"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.without_time().init();
    }

    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::Go(args) => gobi::cli::commands::go(args, &config).await,
        Commands::Artifacts(args) => gobi::cli::commands::artifacts(args, &config).await,
        Commands::Show(args) => gobi::cli::commands::show(args, &config).await,
        Commands::Clean(args) => gobi::cli::commands::clean(args, &config).await,
        Commands::Config(args) => gobi::cli::commands::config(args, &config, &config_manager).await,
    }
}
