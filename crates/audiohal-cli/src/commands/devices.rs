//! List the devices a configuration declares, with their activation
//! refcounts.

use clap::Args;

use super::common::{ConfigArgs, load_engine};

#[derive(Args)]
pub struct DevicesArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    let engine = load_engine(&args.config)?;
    let model = engine.model();

    println!("Output Devices:");
    for (id, device) in model.output_devices() {
        println!("  {:20} refcount={}", device.name, engine.device_refcount(id));
    }

    println!("\nInput Devices:");
    for (id, device) in model.input_devices() {
        println!("  {:20} refcount={}", device.name, engine.device_refcount(id));
    }

    println!("\nGlobal activation count: {}", engine.global_activation_count());

    Ok(())
}
