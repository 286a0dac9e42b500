//! `tado me` — show the authenticated account.
//!
//! The `me` document lives on the primary API for both dialects, so
//! this goes through the raw request surface rather than a domain
//! client.

use tadofly_api::my::models::User;
use tadofly_api::{ApiRequest, Domain};

use crate::cli::GlobalOpts;
use crate::commands;
use crate::error::CliError;
use crate::output;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let mut api = commands::establish(global).await?;

    let request = ApiRequest {
        domain: Domain::Me,
        ..ApiRequest::new()
    };
    let user: User = api.connection_mut().request_as(&request).await?;

    let rendered = output::render_single(
        &global.output,
        &user,
        |user| {
            let mut lines = Vec::new();
            if let Some(name) = &user.name {
                lines.push(format!("name:  {name}"));
            }
            if let Some(email) = &user.email {
                lines.push(format!("email: {email}"));
            }
            let homes: Vec<String> = user
                .homes
                .iter()
                .map(|home| match &home.name {
                    Some(name) => format!("{} ({name})", home.id),
                    None => home.id.to_string(),
                })
                .collect();
            lines.push(format!("homes: {}", homes.join(", ")));
            lines.join("\n")
        },
        |user| {
            user.username
                .clone()
                .or_else(|| user.email.clone())
                .unwrap_or_default()
        },
    )?;

    println!("{rendered}");
    Ok(())
}
