//! Parses a `<ctl>` element's `val`/`file`/`index` attributes into a
//! [`CtlAction`], validated against the target control's kind.

use std::path::Path;

use audiohal_core::{BadConfigReason, Control, ControlId, ControlKind, CtlAction, CtlValue, Error};

use crate::paths::resolve_relative_to;

/// The raw attributes lifted straight off a `<ctl>` XML element, before
/// any kind-specific interpretation.
#[derive(Debug, Clone, Copy)]
pub struct RawCtl<'a> {
    /// `name` attribute (required).
    pub name: &'a str,
    /// `val` attribute.
    pub val: Option<&'a str>,
    /// `file` attribute.
    pub file: Option<&'a str>,
    /// `index` attribute.
    pub index: Option<usize>,
}

/// Parses a raw `<ctl>` into a [`CtlAction`], validating the value against
/// `kind`. `control_id` is the id already resolved via
/// [`audiohal_core::ControlLookup`]. `referencing_file` anchors a relative
/// `file=` attribute.
pub fn parse(
    raw: RawCtl<'_>,
    control_id: ControlId,
    kind: &ControlKind,
    referencing_file: &Path,
) -> Result<CtlAction, Error> {
    let malformed = |reason: &str| {
        Error::BadConfig(BadConfigReason::MalformedCtl {
            control: raw.name.to_string(),
            reason: reason.to_string(),
        })
    };

    let value = match (raw.val, raw.file) {
        (Some(_), Some(_)) => return Err(malformed("val and file are mutually exclusive")),
        (None, None) => return Err(malformed("one of val or file is required")),
        (None, Some(file)) => {
            if !matches!(kind, ControlKind::Byte { .. }) {
                return Err(malformed("file= is only valid for byte controls"));
            }
            CtlValue::File(resolve_relative_to(file, referencing_file))
        }
        (Some(val), None) => parse_val(val, raw.name, kind)?,
    };

    Ok(CtlAction::new(control_id, raw.name, raw.index, value))
}

fn parse_val(val: &str, control_name: &str, kind: &ControlKind) -> Result<CtlValue, Error> {
    match kind {
        ControlKind::Bool { .. } | ControlKind::Int { .. } => parse_integer(val)
            .map(CtlValue::Integer)
            .ok_or_else(|| {
                Error::BadConfig(BadConfigReason::MalformedCtl {
                    control: control_name.to_string(),
                    reason: format!("'{val}' is not a valid decimal or 0x-hex integer"),
                })
            }),
        ControlKind::Enum { strings } => {
            if strings.iter().any(|s| s == val) {
                Ok(CtlValue::EnumString(val.to_string()))
            } else {
                Err(Error::BadConfig(BadConfigReason::UnknownEnumValue {
                    control: control_name.to_string(),
                    value: val.to_string(),
                }))
            }
        }
        ControlKind::Byte { count } => {
            let bytes = parse_byte_list(val).ok_or_else(|| {
                Error::BadConfig(BadConfigReason::MalformedCtl {
                    control: control_name.to_string(),
                    reason: format!("'{val}' is not a comma-separated 0xNN byte list"),
                })
            })?;
            if bytes.len() > *count {
                return Err(Error::BadConfig(BadConfigReason::ByteDataTooLong {
                    control: control_name.to_string(),
                    got: bytes.len(),
                    max: *count,
                }));
            }
            Ok(CtlValue::Bytes(bytes))
        }
    }
}

/// Parses a decimal (optionally signed) or `0x`/`0X`-prefixed hex integer.
fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else {
        raw.parse::<i64>().ok()
    }
}

fn parse_byte_list(raw: &str) -> Option<Vec<u8>> {
    raw.split(',')
        .map(|tok| {
            let tok = tok.trim();
            let hex = tok.strip_prefix("0x").or_else(|| tok.strip_prefix("0X"))?;
            u8::from_str_radix(hex, 16).ok()
        })
        .collect()
}

/// Checks a literal `<ctl>` value is sane for `control`'s element count
/// (used by the loader for `<usecase>`/`<path>` entries, where the caller
/// already has a live [`Control`] rather than a bare kind).
#[must_use]
pub fn index_in_range(control: &Control, index: Option<usize>) -> bool {
    index.is_none_or(|i| i < control.kind.element_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn bool_kind() -> ControlKind {
        ControlKind::Bool { count: 2 }
    }

    fn int_kind() -> ControlKind {
        ControlKind::Int { count: 2, min: -64, max: 50 }
    }

    fn enum_kind() -> ControlKind {
        ControlKind::Enum {
            strings: vec!["off".into(), "speaker".into()],
        }
    }

    fn byte_kind() -> ControlKind {
        ControlKind::Byte { count: 4 }
    }

    #[test]
    fn parses_decimal_bool_value() {
        let raw = RawCtl { name: "Sw", val: Some("1"), file: None, index: None };
        let action = parse(raw, ControlId(0), &bool_kind(), Path::new("/cfg/a.xml")).unwrap();
        assert_eq!(action.value, CtlValue::Integer(1));
    }

    #[test]
    fn parses_hex_int_value() {
        let raw = RawCtl { name: "Vol", val: Some("0x7FFFFFFF"), file: None, index: None };
        let action = parse(raw, ControlId(0), &int_kind(), Path::new("/cfg/a.xml")).unwrap();
        assert_eq!(action.value, CtlValue::Integer(0x7FFF_FFFF));
    }

    #[test]
    fn parses_negative_decimal_int() {
        let raw = RawCtl { name: "Vol", val: Some("-64"), file: None, index: None };
        let action = parse(raw, ControlId(0), &int_kind(), Path::new("/cfg/a.xml")).unwrap();
        assert_eq!(action.value, CtlValue::Integer(-64));
    }

    #[test]
    fn enum_value_must_match_a_known_string() {
        let raw = RawCtl { name: "Route", val: Some("speaker"), file: None, index: None };
        let action = parse(raw, ControlId(0), &enum_kind(), Path::new("/cfg/a.xml")).unwrap();
        assert_eq!(action.value, CtlValue::EnumString("speaker".into()));

        let raw = RawCtl { name: "Route", val: Some("nonexistent"), file: None, index: None };
        assert!(parse(raw, ControlId(0), &enum_kind(), Path::new("/cfg/a.xml")).is_err());
    }

    #[test]
    fn inline_bytes_parse_and_enforce_length() {
        let raw = RawCtl { name: "Cal", val: Some("0x01,0x02,0x03"), file: None, index: None };
        let action = parse(raw, ControlId(0), &byte_kind(), Path::new("/cfg/a.xml")).unwrap();
        assert_eq!(action.value, CtlValue::Bytes(vec![1, 2, 3]));

        let raw = RawCtl {
            name: "Cal",
            val: Some("0x01,0x02,0x03,0x04,0x05"),
            file: None,
            index: None,
        };
        let err = parse(raw, ControlId(0), &byte_kind(), Path::new("/cfg/a.xml")).unwrap_err();
        assert!(matches!(
            err,
            Error::BadConfig(BadConfigReason::ByteDataTooLong { got: 5, max: 4, .. })
        ));
    }

    #[test]
    fn file_attribute_only_valid_for_byte_controls() {
        let raw = RawCtl { name: "Sw", val: None, file: Some("cal.bin"), index: None };
        assert!(parse(raw, ControlId(0), &bool_kind(), Path::new("/cfg/a.xml")).is_err());

        let raw = RawCtl { name: "Cal", val: None, file: Some("cal.bin"), index: None };
        let action = parse(raw, ControlId(0), &byte_kind(), Path::new("/cfg/a.xml")).unwrap();
        assert_eq!(action.value, CtlValue::File(PathBuf::from("/cfg/cal.bin")));
    }

    #[test]
    fn val_and_file_are_mutually_exclusive() {
        let raw = RawCtl { name: "Cal", val: Some("0x01"), file: Some("cal.bin"), index: None };
        assert!(parse(raw, ControlId(0), &byte_kind(), Path::new("/cfg/a.xml")).is_err());
    }

    #[test]
    fn neither_val_nor_file_is_an_error() {
        let raw = RawCtl { name: "Cal", val: None, file: None, index: None };
        assert!(parse(raw, ControlId(0), &byte_kind(), Path::new("/cfg/a.xml")).is_err());
    }
}
