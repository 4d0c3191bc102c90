//! Static stream declarations parsed from `<stream>` elements.

use std::collections::HashMap;

use crate::control::ControlId;
use crate::ctl_action::CtlAction;

/// The three stream types the schema recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamType {
    /// Uncompressed PCM playback/capture.
    Pcm,
    /// Compressed-audio decode/encode.
    Compress,
    /// Direct hardware path (always named).
    Hw,
}

/// Direction of a stream definition. Absent only for the named `global`
/// stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Capture.
    In,
    /// Playback.
    Out,
}

/// A `<ctl function="leftvol|rightvol" …>` entry used by the volume scaler.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeCtl {
    /// The target control.
    pub control: ControlId,
    /// The control's name (for error messages).
    pub control_name: String,
    /// Element index to write, or `None` for all elements.
    pub index: Option<usize>,
    /// Ctl-level range override; falls back to the control's native range
    /// when absent.
    pub range: Option<(i64, i64)>,
}

/// One named use-case, a map from case name to its control sequence.
pub type UseCase = HashMap<String, Vec<CtlAction>>;

/// The static declaration of a stream: its type, direction, fixed
/// attributes, enable/disable paths, constants, and use-cases.
///
/// Immutable for the lifetime of the configuration model; [`crate::OpenStream`]
/// instances borrow from one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamDefinition {
    /// `type` attribute.
    pub stream_type: StreamType,
    /// `dir` attribute; `None` only for the named `global` stream.
    pub direction: Option<Direction>,
    /// `name` attribute, if the stream is named rather than anonymous.
    pub name: Option<String>,
    /// `card` attribute.
    pub card: Option<u32>,
    /// `device` attribute.
    pub device: Option<u32>,
    /// `rate` attribute, defaults to 0 if absent.
    pub rate: u32,
    /// `period_size` attribute, defaults to 0 if absent.
    pub period_size: u32,
    /// `period_count` attribute, defaults to 0 if absent.
    pub period_count: u32,
    /// `instances` attribute; 0 means unlimited.
    pub instances: u32,
    /// `<set name="…" val="…">` constants. Values are stored as strings;
    /// [`crate::OpenStream`] parses them as decimal/hex on demand.
    pub constants: HashMap<String, String>,
    /// `<enable path="…">` — the per-stream enable path name, looked up on
    /// whichever device is being activated.
    pub enable_path: Option<String>,
    /// `<disable path="…">` — mirror of `enable_path`.
    pub disable_path: Option<String>,
    /// `<ctl function="leftvol">`.
    pub left_vol: Option<VolumeCtl>,
    /// `<ctl function="rightvol">`.
    pub right_vol: Option<VolumeCtl>,
    /// `<usecase name="…">` entries, keyed by use-case name.
    pub usecases: HashMap<String, UseCase>,
}

impl StreamDefinition {
    /// `true` if this is a named stream definition (anonymous streams are
    /// matched by `(type, direction)` only).
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// `true` if `direction` is `In`.
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self.direction, Some(Direction::In))
    }

    #[must_use]
    /// `true` for `type="pcm"`.
    pub fn is_pcm(&self) -> bool {
        self.stream_type == StreamType::Pcm
    }

    #[must_use]
    /// `true` for `type="compress"`.
    pub fn is_compressed(&self) -> bool {
        self.stream_type == StreamType::Compress
    }

    #[must_use]
    /// `true` for `type="hw"`.
    pub fn is_hardware(&self) -> bool {
        self.stream_type == StreamType::Hw
    }

    #[must_use]
    /// `true` for an output-direction PCM stream.
    pub fn is_pcm_out(&self) -> bool {
        self.is_pcm() && !self.is_input()
    }

    #[must_use]
    /// `true` for an input-direction PCM stream.
    pub fn is_pcm_in(&self) -> bool {
        self.is_pcm() && self.is_input()
    }

    #[must_use]
    /// `true` for an output-direction compressed stream.
    pub fn is_compressed_out(&self) -> bool {
        self.is_compressed() && !self.is_input()
    }

    #[must_use]
    /// `true` for an input-direction compressed stream.
    pub fn is_compressed_in(&self) -> bool {
        self.is_compressed() && self.is_input()
    }

    /// `device_number`, defaulting to -1 (represented as `None`) when unset.
    #[must_use]
    pub fn device_number(&self) -> Option<u32> {
        self.device
    }
}
