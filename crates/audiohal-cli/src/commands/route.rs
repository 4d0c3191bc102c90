//! Open a stream, route it to one or more devices, print the resulting
//! refcounts, then release it.

use clap::Args;

use super::common::{ConfigArgs, load_engine, parse_devices};

#[derive(Args)]
pub struct RouteArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Stream name as declared in the configuration, or `global`.
    name: String,

    /// Comma-separated device names to route to.
    devices: String,
}

pub fn run(args: RouteArgs) -> anyhow::Result<()> {
    let engine = load_engine(&args.config)?;
    let bits = parse_devices(&args.devices)?;

    let mut stream = engine.open_named_stream(&args.name)?;
    stream.apply_route(bits)?;

    println!("Routed '{}' to {}", args.name, args.devices);
    for (id, device) in engine.model().devices() {
        let refcount = engine.device_refcount(id);
        if refcount > 0 {
            println!("  {:20} refcount={refcount}", device.name);
        }
    }

    stream.release()?;
    Ok(())
}
