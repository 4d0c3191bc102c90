//! Device definitions: a named logical sink/source with up to three paths
//! plus an open set of per-stream enable/disable paths.

use std::collections::HashMap;

use crate::device_bits::DeviceBits;
use crate::path::PathId;

/// The reserved name of the singleton global pseudo-device.
pub const GLOBAL_DEVICE_NAME: &str = "global";

/// Identifies a [`Device`] within a loaded configuration model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub usize);

/// A named logical destination, its bit in the audio-device bitmap, and the
/// paths attached to it.
///
/// `on`/`off` fire on the device's activation refcount transitioning 0→1
/// and 1→0 respectively. The remaining entries in `paths` are per-stream
/// enable/disable paths, looked up by the name a [`crate::StreamDefinition`]
/// declares in its `enable_path`/`disable_path` fields — a device need not
/// carry a path for every stream that might route through it.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    /// The device's well-known name (`speaker`, `mic`, `global`, …).
    pub name: String,
    /// The device's bit, or `DeviceBits::NONE` for the global pseudo-device
    /// (which is not part of the output/input bitmaps at all).
    pub bits: DeviceBits,
    /// `on` path, fired on 0→1 refcount transition.
    pub on: Option<PathId>,
    /// `off` path, fired on 1→0 refcount transition.
    pub off: Option<PathId>,
    /// Every other named path declared under this device (including
    /// per-stream enable/disable paths), keyed by path name.
    pub paths: HashMap<String, PathId>,
}

impl Device {
    /// Creates a device with no paths yet attached.
    #[must_use]
    pub fn new(name: impl Into<String>, bits: DeviceBits) -> Self {
        Self {
            name: name.into(),
            bits,
            on: None,
            off: None,
            paths: HashMap::new(),
        }
    }

    /// Creates the singleton global pseudo-device.
    #[must_use]
    pub fn global() -> Self {
        Self::new(GLOBAL_DEVICE_NAME, DeviceBits::NONE)
    }

    /// `true` if this is the reserved global pseudo-device.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.name == GLOBAL_DEVICE_NAME
    }

    /// Resolves a named path attached to this device (`"on"`, `"off"`, or
    /// any per-stream enable/disable path name).
    #[must_use]
    pub fn path(&self, name: &str) -> Option<PathId> {
        match name {
            "on" => self.on,
            "off" => self.off,
            other => self.paths.get(other).copied(),
        }
    }

    /// Registers a named path under this device.
    pub fn set_path(&mut self, name: impl Into<String>, id: PathId) {
        let name = name.into();
        match name.as_str() {
            "on" => self.on = Some(id),
            "off" => self.off = Some(id),
            _ => {
                self.paths.insert(name, id);
            }
        }
    }
}
