//! A live routing handle over one open stream.

use audiohal_core::{Control, DeviceBits, Error, NotFoundKind, Result, StreamDefId, StreamDefinition, VolumeCtl};
use audiohal_mixer::Mixer;

use crate::engine::Engine;
use crate::volume;

/// A runtime instantiation of a stream definition (or, for the reserved
/// `global` pseudo-stream, no definition at all).
///
/// Borrows `&'e Engine<M>` rather than owning it, so it cannot outlive
/// the engine it came from — the borrow checker rejects the program
/// before it runs rather than the engine rejecting calls against a
/// stale handle at runtime.
pub struct OpenStream<'e, M: Mixer> {
    engine: &'e Engine<M>,
    def: Option<StreamDefId>,
    current_bits: DeviceBits,
}

impl<'e, M: Mixer> OpenStream<'e, M> {
    pub(crate) fn new(engine: &'e Engine<M>, def: Option<StreamDefId>, current_bits: DeviceBits) -> Self {
        Self { engine, def, current_bits }
    }

    fn definition(&self) -> Result<&'e StreamDefinition> {
        self.def
            .map(|id| self.engine.stream_def(id))
            .ok_or(Error::NotFound(NotFoundKind::Stream))
    }

    /// Re-routes this stream to `devices`, firing every disable/enable
    /// and on/off transition the change implies. A no-op (zero mixer
    /// writes, zero refcount changes) if `devices` equals the current
    /// routing.
    pub fn apply_route(&mut self, devices: DeviceBits) -> Result<()> {
        let new_bits = devices.without_default();
        self.engine.retarget(self.def, self.current_bits, new_bits)?;
        self.current_bits = new_bits;
        Ok(())
    }

    /// The device bits this stream is currently routed to. Preserves the
    /// input tag even when the bitmap is otherwise empty.
    #[must_use]
    pub fn current_routes(&self) -> DeviceBits {
        self.current_bits
    }

    /// Runs a named use-case case's ctl list against the mixer. Does not
    /// change routing.
    pub fn apply_use_case(&mut self, usecase: &str, case: &str) -> Result<()> {
        let def = self.definition()?;
        let actions = def
            .usecases
            .get(usecase)
            .and_then(|cases| cases.get(case))
            .ok_or_else(|| {
                Error::NotFound(NotFoundKind::UseCase {
                    usecase: usecase.to_string(),
                    case: case.to_string(),
                })
            })?;
        self.engine.run_actions(&format!("{usecase}.{case}"), actions)
    }

    /// Sets hardware volume from a left/right percent pair, each
    /// `0..=100`. See [`volume::scale`] for the exact integer mapping;
    /// a stream with only a `leftvol` ctl scales from the average of
    /// both percentages, while a `rightvol`-only stream uses the right
    /// percentage alone (the asymmetry is deliberate, not a bug).
    pub fn set_hw_volume(&mut self, left_pc: u8, right_pc: u8) -> Result<()> {
        if left_pc > 100 || right_pc > 100 {
            return Err(Error::invalid_argument(format!(
                "volume percent must be 0..=100, got left={left_pc} right={right_pc}"
            )));
        }
        let def = self.definition()?;
        let left = def.left_vol.clone();
        let right = def.right_vol.clone();
        match (&left, &right) {
            (Some(l), None) => {
                let averaged = ((u32::from(left_pc) + u32::from(right_pc)) / 2) as u8;
                self.write_volume_ctl(l, averaged)?;
            }
            (None, Some(r)) => self.write_volume_ctl(r, right_pc)?,
            (Some(l), Some(r)) => {
                self.write_volume_ctl(l, left_pc)?;
                self.write_volume_ctl(r, right_pc)?;
            }
            (None, None) => {}
        }
        Ok(())
    }

    fn write_volume_ctl(&self, ctl: &VolumeCtl, pc: u8) -> Result<()> {
        let (min, max) = match ctl.range {
            Some(range) => range,
            None => {
                let mixer = self.engine.mixer();
                mixer
                    .control(ctl.control)
                    .and_then(Control::int_range)
                    .ok_or_else(|| {
                        Error::invalid_argument(format!(
                            "control '{}' has no int range to scale against",
                            ctl.control_name
                        ))
                    })?
            }
        };
        let value = volume::scale(pc, min, max);
        match ctl.index {
            Some(index) => self.engine.mixer_mut().set_element(ctl.control, index, value),
            None => {
                let count = self
                    .engine
                    .mixer()
                    .control(ctl.control)
                    .map_or(1, |c| c.kind.element_count());
                for index in 0..count {
                    self.engine.mixer_mut().set_element(ctl.control, index, value)?;
                }
                Ok(())
            }
        }
    }

    /// Reads a `<set name="…" val="…">` constant as a raw string.
    pub fn constant_str(&self, name: &str) -> Result<&'e str> {
        self.definition()?
            .constants
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::NotFound(NotFoundKind::Constant(name.to_string())))
    }

    /// Reads a stream constant parsed as `u32` (decimal or `0x`-hex).
    pub fn constant_u32(&self, name: &str) -> Result<u32> {
        let raw = self.constant_str(name)?;
        parse_constant(raw).ok_or_else(|| {
            Error::invalid_argument(format!("constant '{name}' = '{raw}' is not a valid u32"))
        })
    }

    /// Reads a stream constant parsed as `i32` (decimal or `0x`-hex).
    pub fn constant_i32(&self, name: &str) -> Result<i32> {
        let raw = self.constant_str(name)?;
        parse_constant::<i32>(raw)
            .ok_or_else(|| Error::invalid_argument(format!("constant '{name}' = '{raw}' is not a valid i32")))
    }

    /// `true` if this stream's direction is `in`. `false` for the
    /// `global` pseudo-stream, which has no direction.
    #[must_use]
    pub fn is_input(&self) -> bool {
        self.def.is_some_and(|id| self.engine.stream_def(id).is_input())
    }

    /// `true` for `type="pcm"`.
    #[must_use]
    pub fn is_pcm(&self) -> bool {
        self.def.is_some_and(|id| self.engine.stream_def(id).is_pcm())
    }

    /// `true` for `type="compress"`.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.def.is_some_and(|id| self.engine.stream_def(id).is_compressed())
    }

    /// `true` for `type="hw"`.
    #[must_use]
    pub fn is_hardware(&self) -> bool {
        self.def.is_some_and(|id| self.engine.stream_def(id).is_hardware())
    }

    /// `true` for an output-direction PCM stream.
    #[must_use]
    pub fn is_pcm_out(&self) -> bool {
        self.def.is_some_and(|id| self.engine.stream_def(id).is_pcm_out())
    }

    /// `true` for an input-direction PCM stream.
    #[must_use]
    pub fn is_pcm_in(&self) -> bool {
        self.def.is_some_and(|id| self.engine.stream_def(id).is_pcm_in())
    }

    /// `true` for an output-direction compressed stream.
    #[must_use]
    pub fn is_compressed_out(&self) -> bool {
        self.def.is_some_and(|id| self.engine.stream_def(id).is_compressed_out())
    }

    /// `true` for an input-direction compressed stream.
    #[must_use]
    pub fn is_compressed_in(&self) -> bool {
        self.def.is_some_and(|id| self.engine.stream_def(id).is_compressed_in())
    }

    /// The mixer card number, defaulting to 0 when the stream definition
    /// left `card` unset.
    #[must_use]
    pub fn card_number(&self) -> u32 {
        self.def.and_then(|id| self.engine.stream_def(id).card).unwrap_or(0)
    }

    /// The device number, or `None` if unset (the wire default is -1).
    #[must_use]
    pub fn device_number(&self) -> Option<u32> {
        self.def.and_then(|id| self.engine.stream_def(id).device_number())
    }

    /// Sample rate, 0 if unset.
    #[must_use]
    pub fn rate(&self) -> u32 {
        self.def.map_or(0, |id| self.engine.stream_def(id).rate)
    }

    /// Period size, 0 if unset.
    #[must_use]
    pub fn period_size(&self) -> u32 {
        self.def.map_or(0, |id| self.engine.stream_def(id).period_size)
    }

    /// Period count, 0 if unset.
    #[must_use]
    pub fn period_count(&self) -> u32 {
        self.def.map_or(0, |id| self.engine.stream_def(id).period_count)
    }

    /// Tears down routing (equivalent to `apply_route(0)`), releases this
    /// stream's instance slot, and retires its share of the global
    /// activation count — the global refcount tracks every open stream
    /// regardless of routing, so it is decremented here unconditionally,
    /// not only for the reserved `global` pseudo-stream. Consumes the
    /// handle: once released, there is no longer a `StreamDefId` instance
    /// to double-free.
    pub fn release(mut self) -> Result<()> {
        self.apply_route(DeviceBits::NONE)?;
        if let Some(id) = self.def {
            self.engine.release_instance(id);
        }
        self.engine.note_global_deactivate()
    }
}

fn parse_constant<T>(raw: &str) -> Option<T>
where
    T: TryFrom<i64>,
{
    let value = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        raw.parse::<i64>().ok()?
    };
    T::try_from(value).ok()
}
