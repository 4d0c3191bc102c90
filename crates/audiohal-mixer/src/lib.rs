//! The `Mixer` trait and the path executor that drives it.
//!
//! This crate has no opinion on routing policy or volume scaling — it
//! only knows how to turn a resolved [`audiohal_core::Path`] into writes
//! against whatever implements [`Mixer`]. See [`testing`] for the
//! in-memory mixer used by tests and by `audiohal-cli`.

mod executor;
mod mixer;
pub mod testing;

pub use executor::execute;
pub use mixer::Mixer;
