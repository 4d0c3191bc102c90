//! Load a configuration and report a summary of what it declares.

use clap::Args;

use super::common::{ConfigArgs, load_engine};

#[derive(Args)]
pub struct LoadArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

pub fn run(args: LoadArgs) -> anyhow::Result<()> {
    let engine = load_engine(&args.config)?;
    let model = engine.model();

    println!("Configuration loaded");
    println!("=====================\n");
    println!("Mixer card: {}", model.card);
    println!("Devices: {}", model.devices().count());
    println!(
        "Output devices supported: {:#010x}",
        engine.supported_output_devices().0
    );
    println!(
        "Input devices supported:  {:#010x}",
        engine.supported_input_devices().0
    );

    Ok(())
}
