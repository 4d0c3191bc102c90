//! The engine handle: owns the configuration model, the mixer, and the
//! routing refcount state for the lifetime of the loaded configuration.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::path::Path as FsPath;

use audiohal_core::{
    ConfigModel, CtlAction, DeviceBits, DeviceId, Direction, Error, GLOBAL_DEVICE_NAME,
    NotFoundKind, Path, PathId, Result, StreamDefId, StreamDefinition, StreamType,
};
use audiohal_mixer::Mixer;

use crate::open_stream::OpenStream;
use crate::routing::{RoutingState, same_direction};

/// Reserved for caller-side open hints (e.g. non-blocking intent). The
/// routing engine never opens real PCM devices, so nothing here changes
/// engine behavior; the field exists because the public API shape names
/// it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    /// Caller-declared non-blocking intent. Unused by the engine itself.
    pub non_blocking: bool,
}

/// Selects which anonymous stream definition `Engine::open_stream` should
/// match, mirroring the subset of the real format negotiation the engine
/// actually cares about: the stream's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// The stream type to match in the anonymous pool.
    pub stream_type: StreamType,
}

struct EngineInner<M: Mixer> {
    mixer: M,
    routing: RoutingState,
    instance_counts: HashMap<StreamDefId, u32>,
}

/// The loaded configuration plus live mixer and routing state.
///
/// Holds the configuration model (immutable once loaded) alongside the
/// mixer and routing refcounts behind a `RefCell`: [`OpenStream`] handles
/// borrow `&Engine` rather than `&mut Engine` so that several can be open
/// at once (the routing scenarios in this crate's integration tests need
/// exactly that), with interior mutability standing in for the "single
/// conceptual handle, serialized access" contract instead of the borrow
/// checker enforcing mutual exclusion between open streams. No custom
/// `Drop` impl is needed: `OpenStream<'e, M>` borrows `&'e Engine<M>`, so
/// the borrow checker already guarantees no stream handle survives past
/// the engine, and there is no shutdown sequence to run — dropping the
/// model and the mixer is the whole of "closing" the engine.
pub struct Engine<M: Mixer> {
    model: ConfigModel,
    inner: RefCell<EngineInner<M>>,
}

impl<M: Mixer> Engine<M> {
    /// Loads a configuration from `path`, resolving control names against
    /// `mixer`, and takes ownership of `mixer` for the engine's lifetime.
    pub fn load(path: impl AsRef<FsPath>, mixer: M) -> Result<Self> {
        let model = audiohal_xml::load(path, &mixer)?;
        let device_count = model.devices().count();
        Ok(Self {
            model,
            inner: RefCell::new(EngineInner {
                mixer,
                routing: RoutingState::new(device_count),
                instance_counts: HashMap::new(),
            }),
        })
    }

    /// Borrows the mixer.
    #[must_use]
    pub fn mixer(&self) -> Ref<'_, M> {
        Ref::map(self.inner.borrow(), |inner| &inner.mixer)
    }

    /// Mutably borrows the mixer (for tests/CLI that need to seed or
    /// inspect raw control state outside the routing API).
    #[must_use]
    pub fn mixer_mut(&self) -> RefMut<'_, M> {
        RefMut::map(self.inner.borrow_mut(), |inner| &mut inner.mixer)
    }

    /// The device model this engine was loaded with.
    #[must_use]
    pub fn model(&self) -> &ConfigModel {
        &self.model
    }

    /// OR of the bits of every declared output device.
    #[must_use]
    pub fn supported_output_devices(&self) -> DeviceBits {
        self.model.supported_output_devices()
    }

    /// OR of the bits of every declared input device.
    #[must_use]
    pub fn supported_input_devices(&self) -> DeviceBits {
        self.model.supported_input_devices()
    }

    /// `true` if a named stream (or the reserved `global` pseudo-stream)
    /// is declared.
    #[must_use]
    pub fn is_named_stream_defined(&self, name: &str) -> bool {
        self.model.is_named_stream_defined(name)
    }

    /// Opens a stream from the anonymous pool matching `config`'s type
    /// and the direction implied by `devices`, routing it to `devices`
    /// immediately. Fails with [`Error::NotFound`] if no definition
    /// matches, or [`Error::ResourceLimit`] if every matching definition
    /// is already at its instance cap.
    pub fn open_stream(
        &self,
        devices: DeviceBits,
        _flags: OpenFlags,
        config: StreamConfig,
    ) -> Result<OpenStream<'_, M>> {
        let direction = if devices.is_input() { Direction::In } else { Direction::Out };
        let pool = self.model.anonymous_pool(config.stream_type, direction);
        let def_id = {
            let inner = self.inner.borrow();
            pool.iter()
                .copied()
                .find(|id| {
                    let def = self.model.stream_def(*id);
                    let open = inner.instance_counts.get(id).copied().unwrap_or(0);
                    def.instances == 0 || open < def.instances
                })
                .ok_or(Error::NotFound(NotFoundKind::Stream))?
        };
        self.open_def(Some(def_id), devices)
    }

    /// Opens a named stream definition, or the reserved `global`
    /// pseudo-stream, unrouted (current devices = none). `global` never
    /// resolves to a [`StreamDefinition`] and never touches any
    /// per-device refcount; opening and releasing it only drives the
    /// shared global-activation counter, per
    /// [`RoutingState::increment_global`]/[`decrement_global`].
    pub fn open_named_stream(&self, name: &str) -> Result<OpenStream<'_, M>> {
        if name == GLOBAL_DEVICE_NAME {
            self.note_global_activate()?;
            return Ok(OpenStream::new(self, None, DeviceBits::NONE));
        }
        let def_id = self
            .model
            .named_stream(name)
            .map_err(Error::NotFound)?;
        self.open_def(Some(def_id), DeviceBits::NONE)
    }

    fn open_def(&self, def_id: Option<StreamDefId>, devices: DeviceBits) -> Result<OpenStream<'_, M>> {
        if let Some(id) = def_id {
            let def = self.model.stream_def(id);
            let mut inner = self.inner.borrow_mut();
            let count = inner.instance_counts.entry(id).or_insert(0);
            if def.instances != 0 && *count >= def.instances {
                return Err(Error::ResourceLimit);
            }
            *count += 1;
        }
        // The global refcount tracks every open stream, not every device
        // activation: increment it here, unconditionally, rather than as a
        // side effect of `activate_device` below (which only runs at all
        // when `devices` is non-empty).
        self.note_global_activate()?;
        let mut stream = OpenStream::new(self, def_id, DeviceBits::NONE);
        stream.apply_route(devices)?;
        Ok(stream)
    }

    pub(crate) fn release_instance(&self, def_id: StreamDefId) {
        let mut inner = self.inner.borrow_mut();
        if let Some(count) = inner.instance_counts.get_mut(&def_id) {
            *count = count.saturating_sub(1);
        }
    }

    /// Diffs `current` against `new_bits` and fires every activation and
    /// deactivation the transition implies. Removed devices are fully
    /// processed (disable path, refcount) before any added device is
    /// touched, matching the "disables precede enables" ordering rule.
    /// Does not touch the global-activation counter: that tracks stream
    /// lifetime, not routing, and is driven by `open_def`/`OpenStream::release`.
    pub(crate) fn retarget(
        &self,
        def: Option<StreamDefId>,
        current: DeviceBits,
        new_bits: DeviceBits,
    ) -> Result<()> {
        let removed = current.difference(new_bits);
        let added = new_bits.difference(current);

        for (id, device) in self.model.devices() {
            if device.is_global() || !same_direction(device.bits, removed) {
                continue;
            }
            if device.bits.intersects(removed) {
                self.deactivate_device(id, def)?;
            }
        }
        for (id, device) in self.model.devices() {
            if device.is_global() || !same_direction(device.bits, added) {
                continue;
            }
            if device.bits.intersects(added) {
                self.activate_device(id, def)?;
            }
        }
        Ok(())
    }

    fn activate_device(&self, device_id: DeviceId, def: Option<StreamDefId>) -> Result<()> {
        tracing::debug!(device = %self.model.device(device_id).name, "activating device");
        if let Some(def_id) = def {
            if let Some(name) = self.model.stream_def(def_id).enable_path.as_deref() {
                if let Some(path_id) = self.model.device(device_id).path(name) {
                    self.run_path(path_id)?;
                }
            }
        }
        let became_active = self.inner.borrow_mut().routing.increment(device_id);
        if became_active {
            if let Some(on) = self.model.device(device_id).on {
                self.run_path(on)?;
            }
        }
        Ok(())
    }

    fn deactivate_device(&self, device_id: DeviceId, def: Option<StreamDefId>) -> Result<()> {
        tracing::debug!(device = %self.model.device(device_id).name, "deactivating device");
        if let Some(def_id) = def {
            if let Some(name) = self.model.stream_def(def_id).disable_path.as_deref() {
                if let Some(path_id) = self.model.device(device_id).path(name) {
                    self.run_path(path_id)?;
                }
            }
        }
        let became_idle = self.inner.borrow_mut().routing.decrement(device_id);
        if became_idle {
            if let Some(off) = self.model.device(device_id).off {
                self.run_path(off)?;
            }
        }
        Ok(())
    }

    pub(crate) fn note_global_activate(&self) -> Result<()> {
        let became_active = self.inner.borrow_mut().routing.increment_global();
        if became_active {
            let id = self.model.global_device_id();
            if let Some(on) = self.model.device(id).on {
                self.run_path(on)?;
            }
        }
        Ok(())
    }

    pub(crate) fn note_global_deactivate(&self) -> Result<()> {
        let became_idle = self.inner.borrow_mut().routing.decrement_global();
        if became_idle {
            let id = self.model.global_device_id();
            if let Some(off) = self.model.device(id).off {
                self.run_path(off)?;
            }
        }
        Ok(())
    }

    pub(crate) fn run_path(&self, id: PathId) -> Result<()> {
        let path = self.model.path(id);
        tracing::debug!(path = %path.name, "executing path");
        let mut inner = self.inner.borrow_mut();
        audiohal_mixer::execute(path, &mut inner.mixer)
    }

    /// Runs an ad-hoc, unnamed action list (a use-case case) without
    /// going through a declared [`Path`] id — use-case ctl lists live
    /// inline on the stream definition, not in the model's path table.
    pub(crate) fn run_actions(&self, name: &str, actions: &[CtlAction]) -> Result<()> {
        tracing::debug!(path = name, "executing path");
        let mut path = Path::new(name);
        for action in actions {
            path.push(action.clone());
        }
        let mut inner = self.inner.borrow_mut();
        audiohal_mixer::execute(&path, &mut inner.mixer)
    }

    pub(crate) fn stream_def(&self, id: StreamDefId) -> &StreamDefinition {
        self.model.stream_def(id)
    }

    /// The current activation refcount for `device`, for tests and CLI
    /// introspection against the invariants in the testable-properties
    /// section.
    #[must_use]
    pub fn device_refcount(&self, device_id: DeviceId) -> u32 {
        self.inner.borrow().routing.refcount(device_id)
    }

    /// The current global-activation count (≥ 1 iff any stream is open,
    /// regardless of whether it is routed to any device).
    #[must_use]
    pub fn global_activation_count(&self) -> u32 {
        self.inner.borrow().routing.global_count()
    }
}
