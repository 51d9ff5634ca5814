//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default file written by `--output` when no path is given
pub const DEFAULT_OUTPUT_FILE: &str = "package-size-output.json";

/// package-size - measure the bundled cost of npm packages
///
/// Installs each requested package group into a scratch directory, bundles
/// it with esbuild and reports raw, minified and gzipped sizes. Results for
/// the same resolved versions are cached.
#[derive(Parser, Debug)]
#[command(name = "package-size")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Subcommand to execute (measures packages when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub size: SizeArgs,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PACKAGE_SIZE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete every cached size result
    ClearCache,

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

/// Arguments for measuring packages
#[derive(Args, Debug, Default)]
pub struct SizeArgs {
    /// Packages to measure, e.g. `react` or `react,react-dom@18.2.0`.
    /// Comma-separated names are bundled together.
    pub packages: Vec<String>,

    /// Resolve packages from the current directory instead of installing
    #[arg(long)]
    pub cwd: bool,

    /// Extra modules to leave out of the bundle (repeatable)
    #[arg(short, long, value_name = "NAME")]
    pub externals: Vec<String>,

    /// Sort results by gzipped size, smallest first
    #[arg(short, long)]
    pub sort: bool,

    /// Always rebuild instead of reading cached results
    #[arg(long)]
    pub no_cache: bool,

    /// Keep the scratch directory and log bundler diagnostics
    #[arg(long)]
    pub debug: bool,

    /// Print a per-module breakdown of each production bundle
    #[arg(long)]
    pub analyze: bool,

    /// Write results as JSON
    #[arg(
        short,
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_OUTPUT_FILE
    )]
    pub output: Option<PathBuf>,

    /// Registry URL passed to the package manager
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., bundler.gzip_level)
        key: String,
        /// Value to set
        value: String,
    },
}
