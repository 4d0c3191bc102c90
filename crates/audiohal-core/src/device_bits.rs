//! The published audio-device bitmap and the well-known name → bit table.
//!
//! Output devices occupy the low bits of a 32-bit word. Input devices set
//! [`BIT_IN`] in addition to their own bit, so an input bitmap and an
//! output bitmap never collide even though both are `u32`s.

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Marks a device bitmap as describing input devices rather than output.
pub const BIT_IN: u32 = 1 << 31;

/// "No device" placeholder for output streams (treated as inert: no paths
/// fire when routed here).
pub const OUT_DEFAULT: u32 = 1 << 30;

/// "No device" placeholder for input streams.
pub const IN_DEFAULT: u32 = BIT_IN | (1 << 30);

/// Mask covering both default-device placeholders.
pub const BIT_DEFAULT_MASK: u32 = OUT_DEFAULT | IN_DEFAULT;

macro_rules! output_bits {
    ($($name:ident = $shift:expr => $label:expr),+ $(,)?) => {
        $(
            #[doc = concat!("Output device bit for `", $label, "`.")]
            pub const $name: u32 = 1 << $shift;
        )+
        /// Well-known output device names in declaration order, paired with their bit.
        pub const OUTPUT_DEVICE_NAMES: &[(&str, u32)] = &[
            $(($label, $name)),+
        ];
    };
}

macro_rules! input_bits {
    ($($name:ident = $shift:expr => $label:expr),+ $(,)?) => {
        $(
            #[doc = concat!("Input device bit for `", $label, "` (", stringify!($name), " | BIT_IN).")]
            pub const $name: u32 = BIT_IN | (1 << $shift);
        )+
        /// Well-known input device names in declaration order, paired with their bit.
        pub const INPUT_DEVICE_NAMES: &[(&str, u32)] = &[
            $(($label, $name)),+
        ];
    };
}

output_bits! {
    SPEAKER = 0 => "speaker",
    EARPIECE = 1 => "earpiece",
    HEADSET = 2 => "headset",
    HEADPHONE = 3 => "headphone",
    SCO = 4 => "sco",
    AUX = 5 => "aux",
    BLUETOOTH_A2DP = 6 => "bluetooth_a2dp",
    HDMI = 7 => "hdmi",
    USB = 8 => "usb",
}

input_bits! {
    MIC = 0 => "mic",
    BACK_MIC = 1 => "back mic",
    HEADSET_MIC = 2 => "headset_mic",
    SCO_IN = 3 => "sco_in",
    VOICE = 4 => "voice",
    USB_IN = 5 => "usb_in",
}

/// A bitmap of active devices, tagged as input or output by [`BIT_IN`].
///
/// Wire-compatible with the published device-bit constants: the inner
/// value is exactly what the XML/runtime API exchanges, so this type is a
/// thin, `Copy`, zero-cost wrapper rather than an opaque handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct DeviceBits(pub u32);

impl DeviceBits {
    /// The empty bitmap (no devices).
    pub const NONE: DeviceBits = DeviceBits(0);

    /// Returns `true` if [`BIT_IN`] is set.
    #[must_use]
    pub const fn is_input(self) -> bool {
        self.0 & BIT_IN != 0
    }

    /// Returns `true` if no device bits (other than `BIT_IN` itself) are set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 & !BIT_IN == 0
    }

    /// Returns `true` if this bitmap is one of the "no device" placeholders.
    #[must_use]
    pub const fn is_default_device(self) -> bool {
        self.0 & !BIT_DEFAULT_MASK == 0 && self.0 & BIT_DEFAULT_MASK != 0
    }

    /// Returns `true` if `self` and `other` share any device bit (ignoring
    /// the `BIT_IN` tag itself, which callers are expected to have already
    /// matched on direction).
    #[must_use]
    pub const fn intersects(self, other: DeviceBits) -> bool {
        (self.0 & other.0 & !BIT_IN) != 0
    }

    /// Bits present in `self` but not in `other`.
    #[must_use]
    pub const fn difference(self, other: DeviceBits) -> DeviceBits {
        DeviceBits(self.0 & !other.0)
    }

    /// Strips the default-device placeholder bits, per
    /// `devices & ~BIT_DEFAULT_MASK` in `open_anonymous`.
    #[must_use]
    pub const fn without_default(self) -> DeviceBits {
        DeviceBits(self.0 & !BIT_DEFAULT_MASK)
    }
}

impl BitOr for DeviceBits {
    type Output = DeviceBits;
    fn bitor(self, rhs: Self) -> Self::Output {
        DeviceBits(self.0 | rhs.0)
    }
}

impl BitOrAssign for DeviceBits {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for DeviceBits {
    type Output = DeviceBits;
    fn bitand(self, rhs: Self) -> Self::Output {
        DeviceBits(self.0 & rhs.0)
    }
}

impl Not for DeviceBits {
    type Output = DeviceBits;
    fn not(self) -> Self::Output {
        DeviceBits(!self.0)
    }
}

impl From<u32> for DeviceBits {
    fn from(value: u32) -> Self {
        DeviceBits(value)
    }
}

/// Looks up a well-known device name, returning its bit and direction.
///
/// Returns `None` if `name` is not in the published table.
#[must_use]
pub fn lookup_device_bit(name: &str) -> Option<DeviceBits> {
    OUTPUT_DEVICE_NAMES
        .iter()
        .chain(INPUT_DEVICE_NAMES.iter())
        .find(|(n, _)| *n == name)
        .map(|(_, bit)| DeviceBits(*bit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_bits_have_no_bit_in() {
        assert_eq!(SPEAKER & BIT_IN, 0);
        assert_eq!(EARPIECE & BIT_IN, 0);
    }

    #[test]
    fn input_bits_have_bit_in() {
        assert_ne!(MIC & BIT_IN, 0);
        assert_ne!(SCO_IN & BIT_IN, 0);
    }

    #[test]
    fn lookup_known_names() {
        assert_eq!(lookup_device_bit("speaker"), Some(DeviceBits(SPEAKER)));
        assert_eq!(lookup_device_bit("mic"), Some(DeviceBits(MIC)));
        assert_eq!(lookup_device_bit("back mic"), Some(DeviceBits(BACK_MIC)));
        assert_eq!(lookup_device_bit("nonexistent"), None);
    }

    #[test]
    fn intersects_ignores_bit_in() {
        let a = DeviceBits(MIC);
        let b = DeviceBits(MIC | SCO_IN);
        assert!(a.intersects(b));
        assert!(!DeviceBits(SPEAKER).intersects(DeviceBits(EARPIECE)));
    }

    #[test]
    fn default_device_placeholders_are_empty_of_real_bits() {
        assert!(DeviceBits(OUT_DEFAULT).is_default_device());
        assert!(DeviceBits(IN_DEFAULT).is_default_device());
        assert!(!DeviceBits(SPEAKER).is_default_device());
    }

    #[test]
    fn without_default_strips_placeholder() {
        let bits = DeviceBits(SPEAKER | OUT_DEFAULT);
        assert_eq!(bits.without_default(), DeviceBits(SPEAKER));
    }

    #[test]
    fn difference_removes_shared_bits() {
        let a = DeviceBits(SPEAKER | EARPIECE);
        let b = DeviceBits(EARPIECE);
        assert_eq!(a.difference(b), DeviceBits(SPEAKER));
    }
}
