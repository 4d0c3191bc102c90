//! Open a named stream and set its hardware volume from a left/right
//! percent pair.

use clap::Args;

use super::common::{ConfigArgs, load_engine};

#[derive(Args)]
pub struct VolumeArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Stream name as declared in the configuration.
    name: String,

    /// Left channel percent, 0..=100.
    left: u8,

    /// Right channel percent, 0..=100.
    right: u8,
}

pub fn run(args: VolumeArgs) -> anyhow::Result<()> {
    let engine = load_engine(&args.config)?;
    let mut stream = engine.open_named_stream(&args.name)?;

    stream.set_hw_volume(args.left, args.right)?;
    println!("Set '{}' volume to left={}% right={}%", args.name, args.left, args.right);

    stream.release()?;
    Ok(())
}
