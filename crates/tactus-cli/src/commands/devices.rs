//! Input device listing command.

use clap::Args;
use tactus_io::list_input_devices;

#[derive(Args)]
pub struct DevicesArgs {
    /// Print the device list as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    let devices = list_input_devices()?;

    if args.json {
        let list: Vec<_> = devices
            .iter()
            .map(|d| {
                serde_json::json!({
                    "name": d.name,
                    "default_sample_rate": d.default_sample_rate,
                    "channels": d.channels,
                    "default": d.is_default,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No audio input devices found.");
        return Ok(());
    }

    println!("Audio Input Devices");
    println!("===================\n");

    for (idx, device) in devices.iter().enumerate() {
        let default = if device.is_default { " (default)" } else { "" };
        println!(
            "  [{}] {} ({} Hz, {} ch){}",
            idx, device.name, device.default_sample_rate, device.channels, default
        );
    }

    println!();
    println!("Use --device <NAME> with 'tactus listen' to pick one.");
    Ok(())
}
