//! XML configuration loader for `audiohal`.
//!
//! Resolves a root configuration file (following any codec-probe
//! redirection chain it contains), parses it with `roxmltree`, validates
//! every cross-reference against a live mixer, and returns an
//! [`audiohal_core::ConfigModel`]. Parsing, probe resolution, and value
//! interpretation have no knowledge of routing or volume policy — those
//! live in `audiohal-mixer` and `audiohal-engine`.

pub mod codec_probe;
pub mod ctl_value;
pub mod loader;
pub mod paths;

pub use loader::load;
