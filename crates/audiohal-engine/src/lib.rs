//! The routing engine: loads a configuration, owns the mixer, and drives
//! device activation, use-case application, and hardware volume scaling
//! for every open stream.
//!
//! This crate has no XML or mixer-protocol knowledge of its own — it
//! composes [`audiohal_xml::load`] and [`audiohal_mixer::Mixer`] into the
//! stateful part of the system: reference-counted device activation and
//! the public [`Engine`]/[`OpenStream`] handles.

mod engine;
mod open_stream;
mod routing;
mod volume;

pub use engine::{Engine, OpenFlags, StreamConfig};
pub use open_stream::OpenStream;
