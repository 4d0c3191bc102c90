//! The load-time seam between the configuration loader and whatever owns
//! the real mixer controls.
//!
//! The XML loader never talks to a mixer directly — it only needs to turn
//! a control name into its [`ControlId`] and [`ControlKind`] so it can
//! validate and parse `<ctl>` values. Any type that can answer that
//! question (a live mixer handle, a mock, a static table) implements
//! [`ControlLookup`].

use crate::control::{ControlId, ControlKind};

/// Resolves mixer control names to their id and kind at configuration
/// load time.
pub trait ControlLookup {
    /// Looks up a control by name. Returns `None` if the mixer has no
    /// control by that name — the loader turns that into
    /// [`crate::BadConfigReason::UnknownControl`].
    fn lookup_control(&self, name: &str) -> Option<(ControlId, ControlKind)>;
}
