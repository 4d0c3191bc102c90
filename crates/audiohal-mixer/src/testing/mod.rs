//! Test and demonstration instrumentation: a [`MockMixer`] implementation
//! of [`crate::Mixer`] and a [`LeakTracker`] for open/release bookkeeping.
//!
//! Kept in its own module, separate from the production `Mixer`/executor
//! surface, so it reads as what it is: a harness for driving the engine
//! without real hardware, reused by `audiohal-cli` for interactive
//! exploration and by `audiohal-engine`'s own test suite.

mod leak_tracker;
mod mock_mixer;

pub use leak_tracker::LeakTracker;
pub use mock_mixer::MockMixer;
