//! `tado login` — authenticate and persist the refresh token.

use owo_colors::OwoColorize;

use crate::cli::GlobalOpts;
use crate::commands;
use crate::error::CliError;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let conn = commands::connect(global).await?;

    if global.quiet {
        return Ok(());
    }

    let dialect = if conn.is_line_x() == Some(true) {
        "LINE_X"
    } else {
        "pre-LINE_X"
    };

    println!("{} Logged in.", "✓".green());
    if let Some(home_id) = conn.home_id() {
        println!("  home: {home_id} ({dialect})");
    }

    let config = commands::load_config(global)?;
    match config.to_connection_config(None)?.token_file_path {
        Some(path) => println!("  refresh token saved to {}", path.display()),
        None => {
            // Persistence disabled: hand the token to the caller so the
            // next run doesn't need the device flow again.
            if let Some(token) = conn.refresh_token() {
                println!("  refresh token (not persisted): {token}");
            }
        }
    }

    Ok(())
}
