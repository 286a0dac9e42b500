//! `tado zones` — list zones (pre-LINE_X) or rooms (LINE_X).

use serde::Serialize;
use tabled::Tabled;

use tadofly_api::HomeApi;

use crate::cli::GlobalOpts;
use crate::commands;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct ZoneSummary {
    id: i64,
    name: String,
    kind: String,
    devices: usize,
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "DEVICES")]
    devices: usize,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let mut api = commands::establish(global).await?;

    let summaries: Vec<ZoneSummary> = match &mut api {
        HomeApi::My(client) => client
            .get_zones()
            .await?
            .into_iter()
            .map(|zone| ZoneSummary {
                id: zone.id,
                name: zone.name,
                kind: zone.zone_type.unwrap_or_else(|| "-".into()),
                devices: zone.devices.len(),
            })
            .collect(),
        HomeApi::Hops(client) => client
            .get_rooms()
            .await?
            .into_iter()
            .map(|room| ZoneSummary {
                id: room.room_id,
                name: room.room_name,
                kind: "ROOM".into(),
                devices: room.devices.len(),
            })
            .collect(),
    };

    let rendered = output::render_list(
        &global.output,
        &summaries,
        |zone| ZoneRow {
            id: zone.id,
            name: zone.name.clone(),
            kind: zone.kind.clone(),
            devices: zone.devices,
        },
        |zone| zone.id.to_string(),
    )?;

    println!("{rendered}");
    Ok(())
}
