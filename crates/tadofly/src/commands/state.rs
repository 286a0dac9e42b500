//! `tado state [zone]` — home presence, or the live state of one zone.

use tadofly_api::my::models::HomeState;
use tadofly_api::{ApiRequest, HomeApi};

use crate::cli::{GlobalOpts, StateArgs};
use crate::commands;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: StateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut api = commands::establish(global).await?;

    match args.zone {
        None => home_state(&mut api, global).await,
        Some(zone) => zone_state(&mut api, zone, global).await,
    }
}

/// Home presence lives on the primary API for both dialects.
async fn home_state(api: &mut HomeApi, global: &GlobalOpts) -> Result<(), CliError> {
    let request = ApiRequest {
        command: Some("state".into()),
        ..ApiRequest::new()
    };
    let state: HomeState = api.connection_mut().request_as(&request).await?;

    let rendered = output::render_single(
        &global.output,
        &state,
        |state| {
            let lock = match state.presence_locked {
                Some(true) => " (locked)",
                _ => "",
            };
            format!("presence: {}{lock}", state.presence.as_str())
        },
        |state| state.presence.as_str().to_owned(),
    )?;

    println!("{rendered}");
    Ok(())
}

async fn zone_state(api: &mut HomeApi, zone: i64, global: &GlobalOpts) -> Result<(), CliError> {
    match api {
        HomeApi::My(client) => {
            let state = client.get_zone_state(zone).await?;
            let rendered = output::render_single(
                &global.output,
                &state,
                |state| {
                    let mut lines = Vec::new();
                    if let Some(mode) = &state.tado_mode {
                        lines.push(format!("mode:    {mode}"));
                    }
                    if let Some(setting) = &state.setting {
                        if let Some(power) = &setting.power {
                            lines.push(format!("power:   {power}"));
                        }
                        if let Some(target) = setting.temperature.as_ref().and_then(|t| t.celsius) {
                            lines.push(format!("target:  {target:.1}°C"));
                        }
                    }
                    if lines.is_empty() {
                        lines.push("(no data)".into());
                    }
                    lines.join("\n")
                },
                |state| state.tado_mode.clone().unwrap_or_default(),
            )?;
            println!("{rendered}");
        }
        HomeApi::Hops(client) => {
            let state = client.get_room_state(zone).await?;
            let rendered = output::render_single(
                &global.output,
                &state,
                |state| {
                    let mut lines = vec![format!("room:    {}", state.name)];
                    if let Some(setting) = &state.setting {
                        if let Some(power) = &setting.power {
                            lines.push(format!("power:   {power}"));
                        }
                        if let Some(target) = &setting.temperature {
                            lines.push(format!("target:  {:.1}°C", target.value));
                        }
                    }
                    if let Some(sensors) = &state.sensor_data_points {
                        if let Some(inside) = &sensors.inside_temperature {
                            lines.push(format!("inside:  {:.1}°C", inside.value));
                        }
                        if let Some(humidity) = &sensors.humidity {
                            lines.push(format!("humidity: {:.0}%", humidity.percentage));
                        }
                    }
                    lines.join("\n")
                },
                |state| state.name.clone(),
            )?;
            println!("{rendered}");
        }
    }
    Ok(())
}
