//! Open a named stream (or the reserved `global` pseudo-stream), report
//! its properties, and release it.

use clap::Args;

use super::common::{ConfigArgs, load_engine, parse_devices};

#[derive(Args)]
pub struct OpenArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Stream name as declared in the configuration, or `global`.
    name: String,

    /// Comma-separated device names to route to immediately.
    #[arg(long)]
    devices: Option<String>,
}

pub fn run(args: OpenArgs) -> anyhow::Result<()> {
    let engine = load_engine(&args.config)?;
    let mut stream = engine.open_named_stream(&args.name)?;

    if let Some(raw) = &args.devices {
        let bits = parse_devices(raw)?;
        stream.apply_route(bits)?;
    }

    println!("Opened '{}'", args.name);
    println!("  input:      {}", stream.is_input());
    println!("  pcm:        {}", stream.is_pcm());
    println!("  compressed: {}", stream.is_compressed());
    println!("  hardware:   {}", stream.is_hardware());
    println!("  rate:       {}", stream.rate());
    println!("  routed to:  {:#010x}", stream.current_routes().0);

    stream.release()?;
    println!("Released '{}'", args.name);

    Ok(())
}
