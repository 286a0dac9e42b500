//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod login;
pub mod me;
pub mod offset;
pub mod state;
pub mod zones;

use owo_colors::OwoColorize;
use tracing::debug;

use tadofly_api::{ActivationStatus, Connection, HomeApi};
use tadofly_config::Config;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a connection-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login => login::handle(global).await,
        Command::Me => me::handle(global).await,
        Command::Zones => zones::handle(global).await,
        Command::State(args) => state::handle(args, global).await,
        Command::Offset(args) => offset::handle(args, global).await,
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}

/// Load the config, honoring the `--config` and `--token-file` flags.
pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut config = match &global.config {
        Some(path) => Config::load_from(path.clone())?,
        None => Config::load()?,
    };
    if let Some(token_file) = &global.token_file {
        config.token_file = Some(token_file.clone());
    }
    Ok(config)
}

/// Establish an authenticated connection, walking the user through
/// device activation when no usable refresh token exists.
pub async fn connect(global: &GlobalOpts) -> Result<Connection, CliError> {
    let config = load_config(global)?;
    let mut conn = Connection::new(config.to_connection_config(None)?)?;

    if conn.connect().await? == ActivationStatus::Pending {
        // First login (or the stored token went stale): surface the
        // verification URL and block until the user approves.
        let url = conn.verification_url().unwrap_or_default().to_owned();
        let code = conn.user_code().unwrap_or_default().to_owned();
        eprintln!();
        eprintln!("To authorize this device, visit:");
        eprintln!("  {}", url.cyan());
        eprintln!("and confirm the code {}.", code.bold());
        eprintln!();
        eprintln!("Waiting for approval...");

        conn.activate().await?;
    }

    debug!(home_id = ?conn.home_id(), line_x = ?conn.is_line_x(), "connected");
    Ok(conn)
}

/// [`connect`], then select the dialect-specific domain client.
pub async fn establish(global: &GlobalOpts) -> Result<HomeApi, CliError> {
    let conn = connect(global).await?;
    Ok(HomeApi::from_connection(conn)?)
}
