//! package-size CLI entry point
//!
//! Measures packages by default and dispatches the maintenance subcommands.

use clap::{CommandFactory, Parser};
use console::style;
use package_size::cli::{Cli, Commands};
use package_size::config::{Config, ConfigManager};
use package_size::error::PkgSizeResult;
use std::process::ExitCode;
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
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PkgSizeResult<()> {
    let cli = Cli::parse();

    // Completions never need config or logging
    if let Some(Commands::Completions { shell }) = cli.command {
        package_size::cli::commands::completions(shell);
        return Ok(());
    }

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    // A broken file must not block `config init --force`
    let config = match config_manager.load().await {
        Ok(config) => config,
        Err(e) if matches!(cli.command, Some(Commands::Config(_))) => {
            eprintln!("{} {}", style("Warning:").yellow(), e);
            Config::default()
        }
        Err(e) => return Err(e),
    };

    init_logging(cli.verbose, cli.size.debug, &config);

    match cli.command {
        Some(Commands::Completions { .. }) => unreachable!("Completions handled above"),
        Some(Commands::ClearCache) => package_size::cli::commands::clear_cache(&config).await,
        Some(Commands::Config(args)) => {
            package_size::cli::commands::config(args, &config_manager, &config).await
        }
        None if cli.size.packages.is_empty() => {
            Cli::command()
                .print_help()
                .map_err(|e| package_size::PkgSizeError::io("printing help", e))?;
            Ok(())
        }
        None => package_size::cli::commands::size(cli.size, &config).await,
    }
}

/// 0 = warn, 1 = info, 2+ or --debug = debug. Logs go to stderr.
fn init_logging(verbose: u8, debug: bool, config: &Config) {
    let level = match (verbose, debug) {
        (_, true) | (2.., _) => "debug",
        (1, false) => "info",
        (0, false) => "warn",
    };
    let filter = EnvFilter::new(format!("package_size={}", level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
