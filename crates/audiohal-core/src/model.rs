//! The assembled, immutable configuration model: the in-memory tree the
//! XML loader builds and the routing engine queries for the lifetime of
//! the handle.

use std::collections::HashMap;

use crate::device::{Device, DeviceId, GLOBAL_DEVICE_NAME};
use crate::device_bits::{BIT_IN, DeviceBits};
use crate::error::{BadConfigReason, Error, NotFoundKind, Result};
use crate::path::{Path, PathId};
use crate::stream_def::{Direction, StreamDefinition, StreamType};

/// Identifies a [`StreamDefinition`] within a loaded [`ConfigModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamDefId(pub usize);

/// The parsed, validated configuration: every [`Path`], [`Device`], and
/// [`StreamDefinition`] declared in the XML, plus the lookup tables the
/// routing engine needs to resolve names at runtime.
///
/// Built once by `audiohal-xml::load` and held immutable for the lifetime
/// of the engine handle.
#[derive(Debug, Clone)]
pub struct ConfigModel {
    /// `<mixer card="…">`.
    pub card: u32,
    /// `<pre_init>` control sequence, run once before `init`.
    pub pre_init: Vec<crate::ctl_action::CtlAction>,
    /// `<init>` control sequence, run once at load.
    pub init: Vec<crate::ctl_action::CtlAction>,

    paths: Vec<Path>,
    path_index: HashMap<String, PathId>,

    devices: Vec<Device>,
    device_index: HashMap<String, DeviceId>,
    global_device: DeviceId,

    streams: Vec<StreamDefinition>,
    named_stream_index: HashMap<String, StreamDefId>,
    /// `(type, direction)` → definitions matching it, in declaration order
    /// (the anonymous-stream pool).
    anonymous_pool: HashMap<(StreamType, Direction), Vec<StreamDefId>>,
}

impl ConfigModel {
    /// Builds a model from its constituent parts. Used by the XML loader
    /// after it has validated every cross-reference; callers outside the
    /// loader should not normally need this constructor.
    #[must_use]
    pub fn assemble(
        card: u32,
        pre_init: Vec<crate::ctl_action::CtlAction>,
        init: Vec<crate::ctl_action::CtlAction>,
        paths: Vec<Path>,
        devices: Vec<Device>,
        streams: Vec<StreamDefinition>,
    ) -> Result<Self> {
        let mut path_index = HashMap::new();
        for (i, p) in paths.iter().enumerate() {
            path_index.insert(p.name.clone(), PathId(i));
        }

        let mut device_index = HashMap::new();
        let mut global_device = None;
        for (i, d) in devices.iter().enumerate() {
            if d.is_global() {
                global_device = Some(DeviceId(i));
            }
            device_index.insert(d.name.clone(), DeviceId(i));
        }
        let global_device = global_device.unwrap_or_else(|| {
            // Callers that never declared an explicit <device name="global">
            // still get a well-defined (but path-less) global device; the
            // loader normally appends one if absent.
            DeviceId(devices.len())
        });

        let mut named_stream_index = HashMap::new();
        let mut anonymous_pool: HashMap<(StreamType, Direction), Vec<StreamDefId>> =
            HashMap::new();
        for (i, s) in streams.iter().enumerate() {
            let id = StreamDefId(i);
            if let Some(name) = &s.name {
                if named_stream_index.insert(name.clone(), id).is_some() {
                    return Err(Error::BadConfig(BadConfigReason::DuplicateStreamName(
                        name.clone(),
                    )));
                }
            } else if let Some(direction) = s.direction {
                anonymous_pool
                    .entry((s.stream_type, direction))
                    .or_default()
                    .push(id);
            }
        }

        Ok(Self {
            card,
            pre_init,
            init,
            paths,
            path_index,
            devices,
            device_index,
            global_device,
            streams,
            named_stream_index,
            anonymous_pool,
        })
    }

    /// Resolves a path by id.
    #[must_use]
    pub fn path(&self, id: PathId) -> &Path {
        &self.paths[id.0]
    }

    /// Resolves a path by name.
    #[must_use]
    pub fn path_by_name(&self, name: &str) -> Option<PathId> {
        self.path_index.get(name).copied()
    }

    /// Resolves a device by id.
    #[must_use]
    pub fn device(&self, id: DeviceId) -> &Device {
        &self.devices[id.0]
    }

    /// Resolves a device by name.
    #[must_use]
    pub fn device_by_name(&self, name: &str) -> Option<DeviceId> {
        self.device_index.get(name).copied()
    }

    /// The id of the singleton global pseudo-device.
    #[must_use]
    pub fn global_device_id(&self) -> DeviceId {
        self.global_device
    }

    /// Every declared device, paired with its id, output devices first.
    pub fn devices(&self) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.devices.iter().enumerate().map(|(i, d)| (DeviceId(i), d))
    }

    /// Every declared output device (bit has `BIT_IN` clear, not global).
    pub fn output_devices(&self) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.devices()
            .filter(|(_, d)| !d.is_global() && d.bits.0 & BIT_IN == 0)
    }

    /// Every declared input device (bit has `BIT_IN` set).
    pub fn input_devices(&self) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.devices()
            .filter(|(_, d)| !d.is_global() && d.bits.0 & BIT_IN != 0)
    }

    /// OR of the bits of every declared output device.
    #[must_use]
    pub fn supported_output_devices(&self) -> DeviceBits {
        self.output_devices()
            .fold(DeviceBits::NONE, |acc, (_, d)| acc | d.bits)
    }

    /// OR of the bits of every declared input device.
    #[must_use]
    pub fn supported_input_devices(&self) -> DeviceBits {
        self.input_devices()
            .fold(DeviceBits::NONE, |acc, (_, d)| acc | d.bits)
    }

    /// Looks up a stream definition by id.
    #[must_use]
    pub fn stream_def(&self, id: StreamDefId) -> &StreamDefinition {
        &self.streams[id.0]
    }

    /// `is_named_stream_defined`.
    #[must_use]
    pub fn is_named_stream_defined(&self, name: &str) -> bool {
        name == GLOBAL_DEVICE_NAME || self.named_stream_index.contains_key(name)
    }

    /// Resolves a named stream definition, or [`NotFoundKind::NamedStream`]
    /// if `name` isn't declared. The reserved name `global` never appears
    /// in `named_stream_index`: callers that need the global pseudo-stream
    /// should check for it before calling this.
    pub fn named_stream(&self, name: &str) -> std::result::Result<StreamDefId, NotFoundKind> {
        self.named_stream_index
            .get(name)
            .copied()
            .ok_or_else(|| NotFoundKind::NamedStream(name.to_string()))
    }

    /// The anonymous-stream pool matching `(type, direction)`, in
    /// declaration order. Empty if nothing matches.
    #[must_use]
    pub fn anonymous_pool(&self, stream_type: StreamType, direction: Direction) -> &[StreamDefId] {
        self.anonymous_pool
            .get(&(stream_type, direction))
            .map_or(&[], Vec::as_slice)
    }
}
