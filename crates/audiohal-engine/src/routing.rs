//! Per-device and global activation refcounts.
//!
//! Sized once at load time from the parsed device list (a `Vec<u32>`
//! indexed directly by [`DeviceId`], not a hash map or bit-scan) per the
//! closed, load-time-known device space.

use audiohal_core::{DeviceBits, DeviceId, device_bits::BIT_IN};

/// Activation refcounts for every declared device, plus the shared
/// global-activation counter that drives the global pseudo-device's
/// `on`/`off` paths.
#[derive(Debug)]
pub struct RoutingState {
    refcounts: Vec<u32>,
    global_count: u32,
}

impl RoutingState {
    /// Creates a routing state with every refcount at zero.
    #[must_use]
    pub fn new(device_count: usize) -> Self {
        Self {
            refcounts: vec![0; device_count],
            global_count: 0,
        }
    }

    /// The current refcount for `device`.
    #[must_use]
    pub fn refcount(&self, device: DeviceId) -> u32 {
        self.refcounts[device.0]
    }

    /// Increments `device`'s refcount, returning `true` if this is the
    /// 0→1 transition.
    pub fn increment(&mut self, device: DeviceId) -> bool {
        self.refcounts[device.0] += 1;
        self.refcounts[device.0] == 1
    }

    /// Decrements `device`'s refcount, returning `true` if this is the
    /// 1→0 transition. A no-op below zero (defensive; the engine never
    /// decrements past a matching increment).
    pub fn decrement(&mut self, device: DeviceId) -> bool {
        self.refcounts[device.0] = self.refcounts[device.0].saturating_sub(1);
        self.refcounts[device.0] == 0
    }

    /// The shared global-activation count.
    #[must_use]
    pub fn global_count(&self) -> u32 {
        self.global_count
    }

    /// Increments the global-activation count, returning `true` on 0→1.
    pub fn increment_global(&mut self) -> bool {
        self.global_count += 1;
        self.global_count == 1
    }

    /// Decrements the global-activation count, returning `true` on 1→0.
    pub fn decrement_global(&mut self) -> bool {
        self.global_count = self.global_count.saturating_sub(1);
        self.global_count == 0
    }
}

/// `true` if `device_bits` and `mask` tag the same direction (both input,
/// via [`BIT_IN`], or both output) — guards against a coincidental bit
/// collision between an output device and an input device that happen to
/// share the same low-bit position.
#[must_use]
pub fn same_direction(device_bits: DeviceBits, mask: DeviceBits) -> bool {
    (device_bits.0 & BIT_IN) == (mask.0 & BIT_IN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refcount_transitions_are_reported_once() {
        let mut routing = RoutingState::new(2);
        assert!(routing.increment(DeviceId(0)));
        assert!(!routing.increment(DeviceId(0)));
        assert_eq!(routing.refcount(DeviceId(0)), 2);
        assert!(!routing.decrement(DeviceId(0)));
        assert!(routing.decrement(DeviceId(0)));
        assert_eq!(routing.refcount(DeviceId(0)), 0);
    }

    #[test]
    fn decrement_below_zero_saturates() {
        let mut routing = RoutingState::new(1);
        assert!(routing.decrement(DeviceId(0)));
        assert_eq!(routing.refcount(DeviceId(0)), 0);
    }

    #[test]
    fn same_direction_ignores_shared_low_bits() {
        use audiohal_core::device_bits::{MIC, SPEAKER};
        assert!(!same_direction(DeviceBits(SPEAKER), DeviceBits(MIC)));
        assert!(same_direction(DeviceBits(MIC), DeviceBits(MIC)));
    }
}
