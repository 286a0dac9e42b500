//! Clap derive structures for the `tado` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tado -- manage Tado smart thermostats from the command line
#[derive(Debug, Parser)]
#[command(
    name = "tado",
    version,
    about = "Manage Tado smart thermostats from the command line",
    long_about = "A CLI for the Tado cloud API.\n\n\
        Authenticates once via the OAuth2 device flow (`tado login`),\n\
        persists the refresh token, and speaks both API generations\n\
        (pre-LINE_X and LINE_X) transparently.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to use instead of the default location
    #[arg(long, env = "TADO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Token file path (overrides config)
    #[arg(long, env = "TADO_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authenticate via the device flow and store the refresh token
    Login,

    /// Show the authenticated account
    Me,

    /// List zones (rooms on LINE_X homes)
    #[command(alias = "rooms")]
    Zones,

    /// Show home presence, or the live state of one zone
    State(StateArgs),

    /// Read or set a device's temperature offset
    Offset(OffsetArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct StateArgs {
    /// Zone (room) id; omit for the home's presence state
    pub zone: Option<i64>,
}

#[derive(Debug, Args)]
pub struct OffsetArgs {
    /// Device serial number
    pub device: String,

    /// New offset in celsius; omit to read the current offset
    #[arg(long)]
    pub set: Option<f64>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
