//! Named, ordered control-write sequences.

use crate::ctl_action::CtlAction;

/// Identifies a [`Path`] within a loaded configuration model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathId(pub usize);

/// A named ordered sequence of [`CtlAction`]s.
///
/// Order is significant: actions execute in declaration order, and the
/// same control may appear more than once (the last write wins on the
/// mixer).
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// The path's name, as declared in `<path name="…">` or implied by
    /// `<enable>`/`<disable>`/`<usecase><case>` lookup.
    pub name: String,
    /// Actions in declaration order.
    pub actions: Vec<CtlAction>,
}

impl Path {
    /// Creates a new, empty path.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
        }
    }

    /// Appends an action, preserving declaration order.
    pub fn push(&mut self, action: CtlAction) {
        self.actions.push(action);
    }
}
