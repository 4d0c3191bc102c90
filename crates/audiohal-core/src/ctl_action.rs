//! Resolved control writes: [`CtlValue`] and [`CtlAction`].
//!
//! A `CtlAction` never outlives its [`ControlId`] — the id is resolved
//! once, at load time, against the mixer's control table, and the action
//! carries it by value from then on.

use crate::control::ControlId;

/// The parsed representation of a `<ctl val="…">` / `<ctl file="…">`
/// attribute, before it is matched against a control's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CtlValue {
    /// A literal decimal or `0x`-prefixed hex integer (bool or int ctls).
    Integer(i64),
    /// An inline `val="0xNN,0xNN,…"` byte sequence.
    Bytes(Vec<u8>),
    /// A literal string matched against an enum control's strings.
    EnumString(String),
    /// A `file="…"` path whose contents are loaded at execution time
    /// (byte controls only). Already resolved to an absolute path.
    File(std::path::PathBuf),
}

/// A single resolved control write within a [`crate::Path`].
#[derive(Debug, Clone, PartialEq)]
pub struct CtlAction {
    /// The control this action targets.
    pub control: ControlId,
    /// Name of the control, kept for error messages and by-name fallback
    /// lookup if the cached id goes stale.
    pub control_name: String,
    /// Element index to write, or `None` to write all elements.
    pub index: Option<usize>,
    /// The value to write.
    pub value: CtlValue,
}

impl CtlAction {
    /// Creates a new ctl action.
    #[must_use]
    pub fn new(
        control: ControlId,
        control_name: impl Into<String>,
        index: Option<usize>,
        value: CtlValue,
    ) -> Self {
        Self {
            control,
            control_name: control_name.into(),
            index,
            value,
        }
    }
}
