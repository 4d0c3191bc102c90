//! The engine's sole interface to live control state.

use audiohal_core::{Control, ControlId, ControlLookup, Result};

/// An opaque, externally-owned mixer. The engine drives it by handle; it
/// never assumes anything about where the controls actually live.
///
/// Implementors own the storage for every [`Control`]; `audiohal-mixer`
/// only defines the contract and the [`crate::executor`] that drives it.
/// A [`Mixer`] is also a [`ControlLookup`] so the same value can be handed
/// to `audiohal_xml::load` at configuration time and to the engine at
/// runtime.
pub trait Mixer: ControlLookup {
    /// Returns the current state of a control, or `None` if `id` is not
    /// present (a configuration loaded against a different mixer than the
    /// one now in use, or a stale id).
    fn control(&self, id: ControlId) -> Option<&Control>;

    /// Writes one element of a bool, int, or enum control: `index` must
    /// be `0` for enum controls. `value` is the raw integer to store (the
    /// already-resolved enum index for enum controls, the already
    /// bool-normalized 0/1 for bool controls).
    ///
    /// Implementations should reject an out-of-range `index` or a value
    /// outside the control's declared range with
    /// [`audiohal_core::Error::InvalidArgument`].
    fn set_element(&mut self, id: ControlId, index: usize, value: i64) -> Result<()>;

    /// Overwrites a byte control's payload with `bytes`, left-aligned at
    /// offset 0. Callers are expected to have already truncated `bytes`
    /// to at most the control's element count; trailing octets beyond
    /// `bytes.len()` are left unchanged.
    fn set_bytes(&mut self, id: ControlId, bytes: &[u8]) -> Result<()>;
}
