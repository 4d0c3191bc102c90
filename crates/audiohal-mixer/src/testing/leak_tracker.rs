//! Process-wide, mutex-guarded open/release bookkeeping for tests.
//!
//! Nothing in `audiohal-engine`'s production code touches this: a test
//! wraps its own calls to `Engine::open_stream`/`OpenStream::release`
//! with [`LeakTracker::record_open`]/[`record_release`], then asserts
//! [`LeakTracker::live_count`] is zero once the scenario tears down.
//! Mirrors the source's test-only allocation-count instrumentation.
use std::sync::Mutex;

/// Counts outstanding open-stream handles across a test scenario.
#[derive(Debug, Default)]
pub struct LeakTracker {
    live: Mutex<i64>,
}

impl LeakTracker {
    /// Creates a tracker starting at zero live handles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one more live handle.
    pub fn record_open(&self) {
        let mut live = self.live.lock().expect("leak tracker mutex poisoned");
        *live += 1;
    }

    /// Records one fewer live handle.
    pub fn record_release(&self) {
        let mut live = self.live.lock().expect("leak tracker mutex poisoned");
        *live -= 1;
    }

    /// The current outstanding-handle count. Zero once every opened
    /// stream has been released.
    #[must_use]
    pub fn live_count(&self) -> i64 {
        *self.live.lock().expect("leak tracker mutex poisoned")
    }
}
