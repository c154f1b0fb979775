//! CLI argument definitions using clap derive

use crate::build_info::BuildContext;
use crate::config::Config;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// gobi - build-info for Go modules
///
/// Runs the go command and records the module's dependencies, their
/// checksums and the chains of modules that required them.
#[derive(Parser, Debug)]
#[command(name = "gobi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "GOBI_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a go command and record the module's build-info
    Go(GoArgs),

    /// Register build outputs as artifacts of the module
    Artifacts(ArtifactsArgs),

    /// Print the recorded build-info of a build
    Show(ShowArgs),

    /// Remove the recorded build-info of a build
    Clean(CleanArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Build identity flags shared by the build-info commands
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Build name
    #[arg(long, env = "GOBI_BUILD_NAME")]
    pub build_name: Option<String>,

    /// Build number
    #[arg(long, env = "GOBI_BUILD_NUMBER")]
    pub build_number: Option<String>,

    /// Project the build belongs to
    #[arg(long, env = "GOBI_PROJECT")]
    pub project: Option<String>,
}

impl BuildArgs {
    /// Build context from flags, falling back to the configured defaults
    pub fn context(&self, config: &Config) -> BuildContext {
        BuildContext::new(
            self.build_name.clone().or_else(|| config.build.name.clone()),
            self.build_number
                .clone()
                .or_else(|| config.build.number.clone()),
            self.project.clone().or_else(|| config.build.project.clone()),
        )
    }
}

/// Arguments for the go command
#[derive(Parser, Debug)]
pub struct GoArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Module id to record instead of the go.mod module path
    #[arg(long)]
    pub module: Option<String>,

    /// Module directory (defaults to the nearest directory with a go.mod)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Arguments passed to go
    #[arg(last = true)]
    pub go_args: Vec<String>,
}

/// Arguments for the artifacts command
#[derive(Parser, Debug)]
pub struct ArtifactsArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Module id to record instead of the go.mod module path
    #[arg(long)]
    pub module: Option<String>,

    /// Module directory (defaults to the nearest directory with a go.mod)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Files to register
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
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
        /// Configuration key (e.g., go.binary)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for the show command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Build-info JSON
    Json,
    /// Human-readable dependency table
    Table,
}
