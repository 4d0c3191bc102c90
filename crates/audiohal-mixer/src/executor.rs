//! Executes a [`Path`]'s control writes against a [`Mixer`], in order.
//!
//! Grounded on `sonido-platform::control_mapper`'s "resolve control,
//! denormalize, write" sequencing, generalized from a single `f32`
//! parameter to a multi-kind, multi-element, best-effort batch write.

use audiohal_core::{Control, ControlId, ControlKind, CtlAction, CtlValue, Error, Path, Result};
use tracing::warn;

use crate::mixer::Mixer;

/// Executes every action in `path` against `mixer`, in declaration order.
///
/// Individual write failures are logged via [`tracing::warn!`] and do not
/// stop the sequence — the mixer contract treats each write as
/// best-effort. The first failure encountered is returned to the caller
/// once every action has been attempted, so a caller can detect "the path
/// didn't fully apply" without the mixer being left half-configured in an
/// unpredictable way.
pub fn execute(path: &Path, mixer: &mut impl Mixer) -> Result<()> {
    let mut first_err = None;
    for action in &path.actions {
        if let Err(e) = execute_action(action, mixer) {
            warn!(
                path = %path.name,
                control = %action.control_name,
                error = %e,
                "ctl write failed"
            );
            first_err.get_or_insert(e);
        }
    }
    first_err.map_or(Ok(()), Err)
}

fn execute_action(action: &CtlAction, mixer: &mut impl Mixer) -> Result<()> {
    let control = control_or_err(mixer, action)?;
    let kind = control.kind.clone();

    match (&action.value, &kind) {
        (CtlValue::Integer(v), ControlKind::Bool { count }) => {
            let normalized = i64::from(*v != 0);
            write_elements(mixer, action.control, *count, action.index, normalized)
        }
        (CtlValue::Integer(v), ControlKind::Int { count, .. }) => {
            write_elements(mixer, action.control, *count, action.index, *v)
        }
        (CtlValue::EnumString(s), ControlKind::Enum { strings }) => {
            let index = strings.iter().position(|candidate| candidate == s).ok_or_else(|| {
                Error::invalid_argument(format!(
                    "'{s}' is not a known value for enum control '{}'",
                    action.control_name
                ))
            })?;
            mixer.set_element(action.control, 0, i64::try_from(index).unwrap_or(i64::MAX))
        }
        (CtlValue::Bytes(data), ControlKind::Byte { count }) => {
            let n = data.len().min(*count);
            mixer.set_bytes(action.control, &data[..n])
        }
        (CtlValue::File(file_path), ControlKind::Byte { count }) => {
            let data = std::fs::read(file_path).map_err(|e| Error::io(file_path.clone(), e))?;
            let n = data.len().min(*count);
            mixer.set_bytes(action.control, &data[..n])
        }
        _ => Err(Error::invalid_argument(format!(
            "ctl '{}' carries a value that does not match its control's kind",
            action.control_name
        ))),
    }
}

fn control_or_err<'m>(mixer: &'m impl Mixer, action: &CtlAction) -> Result<&'m Control> {
    mixer.control(action.control).ok_or_else(|| {
        Error::invalid_argument(format!(
            "control '{}' is not present on this mixer",
            action.control_name
        ))
    })
}

/// Writes `value` to `index` if given, otherwise expands it to all `count`
/// elements. Attempts every element even if an earlier one fails, and
/// returns the first failure.
fn write_elements(
    mixer: &mut impl Mixer,
    id: ControlId,
    count: usize,
    index: Option<usize>,
    value: i64,
) -> Result<()> {
    match index {
        Some(i) => mixer.set_element(id, i, value),
        None => {
            let mut first_err = None;
            for i in 0..count.max(1) {
                if let Err(e) = mixer.set_element(id, i, value) {
                    first_err.get_or_insert(e);
                }
            }
            first_err.map_or(Ok(()), Err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockMixer;

    fn mixer_with_bool() -> (MockMixer, ControlId) {
        let mut m = MockMixer::new();
        let id = m.add_bool("Speaker Switch", 2);
        (m, id)
    }

    #[test]
    fn bool_write_normalizes_nonzero_to_one() {
        let (mut mixer, id) = mixer_with_bool();
        let path = {
            let mut p = Path::new("on");
            p.push(CtlAction::new(id, "Speaker Switch", None, CtlValue::Integer(42)));
            p
        };
        execute(&path, &mut mixer).unwrap();
        assert_eq!(mixer.control(id).unwrap().values, vec![1, 1]);
    }

    #[test]
    fn indexed_int_write_touches_only_that_element() {
        let mut mixer = MockMixer::new();
        let id = mixer.add_int("Master Volume", 2, -64, 50);
        let mut path = Path::new("on");
        path.push(CtlAction::new(id, "Master Volume", Some(1), CtlValue::Integer(10)));
        execute(&path, &mut mixer).unwrap();
        assert_eq!(mixer.control(id).unwrap().values, vec![-64, 10]);
    }

    #[test]
    fn byte_write_truncates_to_control_capacity() {
        let mut mixer = MockMixer::new();
        let id = mixer.add_byte("Calibration", 3);
        let mut path = Path::new("on");
        path.push(CtlAction::new(
            id,
            "Calibration",
            None,
            CtlValue::Bytes(vec![1, 2, 3, 4, 5]),
        ));
        execute(&path, &mut mixer).unwrap();
        assert_eq!(mixer.control(id).unwrap().bytes, vec![1, 2, 3]);
    }

    #[test]
    fn enum_write_resolves_string_to_index() {
        let mut mixer = MockMixer::new();
        let id = mixer.add_enum("Route", vec!["off".into(), "speaker".into()]);
        let mut path = Path::new("on");
        path.push(CtlAction::new(id, "Route", None, CtlValue::EnumString("speaker".into())));
        execute(&path, &mut mixer).unwrap();
        assert_eq!(mixer.control(id).unwrap().enum_index, 1);
    }

    #[test]
    fn a_failing_action_does_not_stop_later_actions() {
        let mut mixer = MockMixer::new();
        let bogus_id = ControlId(999);
        let real_id = mixer.add_bool("Speaker Switch", 1);
        let mut path = Path::new("on");
        path.push(CtlAction::new(bogus_id, "Nonexistent", None, CtlValue::Integer(1)));
        path.push(CtlAction::new(real_id, "Speaker Switch", None, CtlValue::Integer(1)));

        let result = execute(&path, &mut mixer);
        assert!(result.is_err());
        assert_eq!(mixer.control(real_id).unwrap().values, vec![1]);
    }

    #[test]
    fn value_kind_mismatch_is_reported() {
        let mut mixer = MockMixer::new();
        let id = mixer.add_bool("Speaker Switch", 1);
        let mut path = Path::new("on");
        path.push(CtlAction::new(id, "Speaker Switch", None, CtlValue::EnumString("x".into())));
        assert!(execute(&path, &mut mixer).is_err());
    }
}
