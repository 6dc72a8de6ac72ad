//! Clap argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "fleetwatch",
    version,
    about = "Track vehicle fleets from the command line",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Vendor surface ("tracking" or "mobility"); overrides the config file.
    #[arg(long, global = true, value_enum)]
    pub vendor: Option<VendorArg>,

    /// Account username; overrides the config file.
    #[arg(long, global = true, env = "FLEETWATCH_USERNAME")]
    pub username: Option<String>,

    /// Account password; prefer the environment variable over the flag.
    #[arg(long, global = true, env = "FLEETWATCH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Override the vendor's base URL (mainly for testing).
    #[arg(long, global = true, hide = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format.
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VendorArg {
    Tracking,
    Mobility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify the configured credentials against the vendor.
    Auth,

    /// List tracked units with position and status.
    Units(UnitsArgs),

    /// List every entity derived from the tracked units.
    Entities(EntitiesArgs),

    /// Poll continuously and print fleet changes as they happen.
    Watch(WatchArgs),

    /// Inspect or initialize the configuration file.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct UnitsArgs {
    /// Show only the unit with this id or name.
    pub unit: Option<String>,
}

#[derive(Debug, Args)]
pub struct EntitiesArgs {
    /// Show only entities of the unit with this id or name.
    pub unit: Option<String>,

    /// Include diagnostic entities (tracker battery, signal, ...).
    #[arg(long)]
    pub diagnostics: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in seconds; overrides the config file.
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path.
    Path,
    /// Print the effective configuration (passwords redacted).
    Show,
    /// Write a starter config file.
    Init,
}
