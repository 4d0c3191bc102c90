//! Data model for the `audiohal` routing configuration engine.
//!
//! This crate has no knowledge of XML, mixer I/O, or routing policy — it
//! only defines the shapes those crates build and query:
//!
//! - [`Control`]/[`ControlKind`] — the mixer's own control shape.
//! - [`CtlAction`]/[`CtlValue`] — a resolved control write.
//! - [`Path`] — a named, ordered sequence of ctl actions.
//! - [`Device`] — a named destination with on/off/enable/disable paths.
//! - [`StreamDefinition`] — the static declaration of a stream.
//! - [`ConfigModel`] — the assembled, immutable tree plus lookup tables.
//! - [`DeviceBits`] and the well-known device-bit table.
//! - [`Error`] — the five error kinds shared across the workspace.

pub mod control;
pub mod ctl_action;
pub mod device;
pub mod device_bits;
pub mod error;
pub mod lookup;
pub mod model;
pub mod path;
pub mod stream_def;

pub use control::{Control, ControlId, ControlKind};
pub use ctl_action::{CtlAction, CtlValue};
pub use device::{Device, DeviceId, GLOBAL_DEVICE_NAME};
pub use device_bits::{
    BIT_DEFAULT_MASK, BIT_IN, DeviceBits, IN_DEFAULT, INPUT_DEVICE_NAMES, OUT_DEFAULT,
    OUTPUT_DEVICE_NAMES, lookup_device_bit,
};
pub use error::{BadConfigReason, Error, NotFoundKind, Result};
pub use lookup::ControlLookup;
pub use model::{ConfigModel, StreamDefId};
pub use path::{Path, PathId};
pub use stream_def::{Direction, StreamDefinition, StreamType, UseCase, VolumeCtl};
