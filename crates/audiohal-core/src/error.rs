//! Error types for the routing engine and its supporting crates.

use std::path::PathBuf;
use thiserror::Error;

/// The five error kinds the engine's public API can return.
///
/// `BadConfig` is fatal to loading: the caller never receives a handle.
/// `NotFound`, `InvalidArgument`, and `ResourceLimit` are returned to the
/// caller with no side effect. `Io` failures during load are wrapped as
/// `BadConfig`; at runtime (on-demand byte-file reads) they are logged and
/// treated as a failed write rather than propagated.
#[derive(Debug, Error)]
pub enum Error {
    /// The XML configuration is malformed or references something that
    /// doesn't exist. Fatal at load time.
    #[error("bad configuration: {0}")]
    BadConfig(#[from] BadConfigReason),

    /// A requested stream, case, or constant does not exist.
    #[error("not found: {0}")]
    NotFound(NotFoundKind),

    /// An argument was out of its valid range or the wrong kind for the
    /// operation. No mixer writes occur.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The stream definition's `instances` cap has been reached.
    #[error("instance limit reached")]
    ResourceLimit,

    /// A file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// Path of the file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build an [`Error::Io`] from a path and the underlying error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Build an [`Error::InvalidArgument`].
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

/// Reasons a configuration fails to load.
#[derive(Debug, Error)]
pub enum BadConfigReason {
    /// The XML could not be parsed at all.
    #[error("XML parse error in '{path}': {message}")]
    ParseError {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser's error message.
        message: String,
    },

    /// A `<ctl name="…">` names a control the mixer doesn't have.
    #[error("control '{0}' not present on the mixer")]
    UnknownControl(String),

    /// A `<device name="…">` is not in the device-bit table.
    #[error("device '{0}' is not a known device name")]
    UnknownDevice(String),

    /// Two streams declare the same `name` attribute.
    #[error("stream name '{0}' declared more than once")]
    DuplicateStreamName(String),

    /// An enum `<ctl val="…">` doesn't match any of the control's strings.
    #[error("'{value}' is not a valid value for enum control '{control}'")]
    UnknownEnumValue {
        /// The enum control's name.
        control: String,
        /// The offending literal.
        value: String,
    },

    /// Inline byte data (`val="0xNN,…"`) is longer than the control's N.
    #[error("inline byte data for control '{control}' has {got} bytes, control holds {max}")]
    ByteDataTooLong {
        /// The byte control's name.
        control: String,
        /// Number of bytes supplied.
        got: usize,
        /// The control's element count.
        max: usize,
    },

    /// A `<ctl>` specifies neither or both of `val`/`file`, or the wrong
    /// one for the control's kind.
    #[error("ctl '{control}': {reason}")]
    MalformedCtl {
        /// The control's name.
        control: String,
        /// Human-readable description of the mismatch.
        reason: String,
    },

    /// `<mixer>` is missing, or appears more than once.
    #[error("exactly one <mixer> element is required, found {found}")]
    MixerElementCount {
        /// Number of `<mixer>` elements found.
        found: usize,
    },

    /// The codec-probe chain exceeded its recursion depth guard.
    #[error("codec probe chain exceeded maximum depth of {0}")]
    ProbeDepthExceeded(usize),

    /// A file read failed while loading (probe file, byte-control file, or
    /// a redirected XML document).
    #[error("failed to read '{path}': {source}")]
    Unreadable {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// What kind of thing a `NotFound` error refers to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotFoundKind {
    /// No stream definition matches the requested type/direction or name.
    #[error("no matching stream definition")]
    Stream,
    /// `is_named_stream_defined` / `open_named` found no such name.
    #[error("no stream named '{0}'")]
    NamedStream(String),
    /// `apply_use_case` referenced an unknown usecase or case name.
    #[error("no such use-case/case: {usecase}.{case}")]
    UseCase {
        /// Use-case name.
        usecase: String,
        /// Case name within the use-case.
        case: String,
    },
    /// A stream constant lookup by name failed.
    #[error("no constant named '{0}'")]
    Constant(String),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
