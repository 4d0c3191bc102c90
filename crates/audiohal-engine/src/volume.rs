//! Integer percent-to-range scaling for hardware volume controls.
//!
//! Grounded on `sonido-platform`'s `ParamDescriptor::denormalize` shape
//! (map a normalized input to a native range) but kept in signed 64-bit
//! integer arithmetic rather than floating point: the contract requires
//! `scaled(0) == min` and `scaled(100) == max` exactly, which float
//! denormalization can't guarantee bit-for-bit.

/// Scales `pc` (0..=100) into `[min, max]` as
/// `min + ((max - min) * pc) / 100`, truncating toward zero — Rust's
/// integer division already truncates toward zero, so no extra rounding
/// step is needed even for a negative `min`.
#[must_use]
pub fn scale(pc: u8, min: i64, max: i64) -> i64 {
    min + ((max - min) * i64::from(pc)) / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_percent_is_min() {
        assert_eq!(scale(0, -64, 50), -64);
    }

    #[test]
    fn hundred_percent_is_max() {
        assert_eq!(scale(100, -64, 50), 50);
    }

    #[test]
    fn midpoint_truncates_toward_zero() {
        assert_eq!(scale(50, -64, 50), -64 + (114 * 50) / 100);
        assert_eq!(scale(33, 0, 10), 3);
    }

    #[test]
    fn negative_range_truncates_toward_zero_not_down() {
        assert_eq!(scale(1, -100, -1), -100 + (99 * 1) / 100);
    }
}
