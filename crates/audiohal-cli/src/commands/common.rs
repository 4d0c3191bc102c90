//! Shared CLI arguments and the engine-construction helper every
//! subcommand uses.
//!
//! The CLI has no real kernel mixer to talk to, so every invocation
//! builds a fresh [`MockMixer`] from a controls file and loads the
//! routing configuration against it — one-shot exploration, not a
//! long-lived daemon.

use std::path::PathBuf;

use audiohal_core::DeviceBits;
use audiohal_engine::Engine;
use audiohal_mixer::testing::MockMixer;
use clap::Args;

/// Arguments shared by every subcommand: where the configuration and the
/// mock mixer's control list live.
#[derive(Args)]
pub struct ConfigArgs {
    /// Path to the root `<audiohal>` XML document.
    #[arg(long)]
    pub config: PathBuf,

    /// Path to a controls file (`name,kind,count,initial,valueset` per
    /// line) describing the mock mixer's controls.
    #[arg(long)]
    pub controls: PathBuf,
}

/// Loads the mock mixer and the engine for a subcommand.
pub fn load_engine(args: &ConfigArgs) -> anyhow::Result<Engine<MockMixer>> {
    let mixer = MockMixer::from_controls_file(&args.controls)?;
    match Engine::load(&args.config, mixer) {
        Ok(engine) => Ok(engine),
        Err(e) => {
            tracing::error!(config = %args.config.display(), error = %e, "failed to load configuration");
            Err(e.into())
        }
    }
}

/// Parses a comma-separated list of well-known device names into their
/// combined [`DeviceBits`].
pub fn parse_devices(raw: &str) -> anyhow::Result<DeviceBits> {
    let mut bits = DeviceBits::NONE;
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let device_bits = audiohal_core::lookup_device_bit(name)
            .ok_or_else(|| anyhow::anyhow!("'{name}' is not a known device name"))?;
        bits |= device_bits;
    }
    Ok(bits)
}
