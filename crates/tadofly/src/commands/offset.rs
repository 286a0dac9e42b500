//! `tado offset <device> [--set <celsius>]` — temperature offset.

use tadofly_api::HomeApi;

use crate::cli::{GlobalOpts, OffsetArgs};
use crate::commands;
use crate::error::CliError;

pub async fn handle(args: OffsetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut api = commands::establish(global).await?;

    match (&mut api, args.set) {
        (HomeApi::My(client), Some(offset)) => {
            let updated = client.set_temp_offset(&args.device, offset).await?;
            if !global.quiet {
                println!("offset set to {:.1}°C", updated.celsius);
            }
        }
        (HomeApi::My(client), None) => {
            let offset = client.get_temp_offset(&args.device).await?;
            println!("{:.1}", offset.celsius);
        }
        (HomeApi::Hops(client), Some(offset)) => {
            client.set_temp_offset(&args.device, offset).await?;
            if !global.quiet {
                println!("offset set to {offset:.1}°C");
            }
        }
        (HomeApi::Hops(client), None) => {
            let device = client.get_device_info(&args.device).await?;
            match device.temperature_offset {
                Some(offset) => println!("{offset:.1}"),
                None => println!("-"),
            }
        }
    }

    Ok(())
}
