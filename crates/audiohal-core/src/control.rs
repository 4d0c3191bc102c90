//! Mixer control types: the tagged [`Control`] variant and its kind.
//!
//! A `Control` mirrors a single mixer endpoint. It is not owned by the
//! configuration model — the model only holds [`ControlId`]s resolved
//! against whatever [`crate::Mixer`]-like thing is backing it at load
//! time — but the shape here is what both the loader and the path
//! executor agree on.

/// Identifies a control within a mixer: a name, unique within that mixer,
/// and the small integer id the mixer itself assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(pub u32);

/// The kind of value a [`Control`] holds.
///
/// Bool and int controls carry `N` elements; enum is always single-valued;
/// byte controls carry a fixed-length octet vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    /// `N` boolean elements, each 0 or 1.
    Bool {
        /// Number of elements.
        count: usize,
    },
    /// `N` integer elements sharing one `(min, max)` range queried from the
    /// mixer.
    Int {
        /// Number of elements.
        count: usize,
        /// Minimum value reported by the mixer.
        min: i64,
        /// Maximum value reported by the mixer.
        max: i64,
    },
    /// A single element selecting one of a fixed ordered list of strings.
    Enum {
        /// The control's enumeration, in mixer-reported order.
        strings: Vec<String>,
    },
    /// A fixed-length vector of octets.
    Byte {
        /// Number of octets the control holds.
        count: usize,
    },
}

impl ControlKind {
    /// Number of elements this control kind carries (always 1 for enum).
    #[must_use]
    pub fn element_count(&self) -> usize {
        match self {
            ControlKind::Bool { count } | ControlKind::Byte { count } => *count,
            ControlKind::Int { count, .. } => *count,
            ControlKind::Enum { .. } => 1,
        }
    }

    /// Short name of the kind, for error messages and the controls-file format.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ControlKind::Bool { .. } => "bool",
            ControlKind::Int { .. } => "int",
            ControlKind::Enum { .. } => "enum",
            ControlKind::Byte { .. } => "byte",
        }
    }
}

/// A mixer control: its name, kind, current value, and a `changed` flag
/// used by tests to observe whether a write reached it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    /// Name, unique within the mixer.
    pub name: String,
    /// The mixer-assigned id.
    pub id: ControlId,
    /// The control's kind and static shape.
    pub kind: ControlKind,
    /// Current element values for bool/int (len == element_count), current
    /// selected index for enum (len == 1), current octets for byte.
    pub values: Vec<i64>,
    /// Current enum selection index, meaningful only for `ControlKind::Enum`.
    pub enum_index: usize,
    /// Current byte payload, meaningful only for `ControlKind::Byte`.
    pub bytes: Vec<u8>,
    /// Set whenever the path executor writes this control.
    pub changed: bool,
}

impl Control {
    /// Creates a fresh bool control, all elements initialized to 0.
    #[must_use]
    pub fn new_bool(name: impl Into<String>, id: ControlId, count: usize) -> Self {
        Self {
            name: name.into(),
            id,
            kind: ControlKind::Bool { count },
            values: vec![0; count.max(1)],
            enum_index: 0,
            bytes: Vec::new(),
            changed: false,
        }
    }

    /// Creates a fresh int control with a `(min, max)` range, all elements
    /// initialized to `min`.
    #[must_use]
    pub fn new_int(name: impl Into<String>, id: ControlId, count: usize, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            id,
            kind: ControlKind::Int { count, min, max },
            values: vec![min; count.max(1)],
            enum_index: 0,
            bytes: Vec::new(),
            changed: false,
        }
    }

    /// Creates a fresh enum control selecting index 0.
    #[must_use]
    pub fn new_enum(name: impl Into<String>, id: ControlId, strings: Vec<String>) -> Self {
        Self {
            name: name.into(),
            id,
            kind: ControlKind::Enum { strings },
            values: Vec::new(),
            enum_index: 0,
            bytes: Vec::new(),
            changed: false,
        }
    }

    /// Creates a fresh byte control with `count` zeroed octets.
    #[must_use]
    pub fn new_byte(name: impl Into<String>, id: ControlId, count: usize) -> Self {
        Self {
            name: name.into(),
            id,
            kind: ControlKind::Byte { count },
            values: Vec::new(),
            enum_index: 0,
            bytes: vec![0; count],
            changed: false,
        }
    }

    /// The control's native `(min, max)` range, if it's an int control.
    #[must_use]
    pub fn int_range(&self) -> Option<(i64, i64)> {
        match &self.kind {
            ControlKind::Int { min, max, .. } => Some((*min, *max)),
            _ => None,
        }
    }
}
