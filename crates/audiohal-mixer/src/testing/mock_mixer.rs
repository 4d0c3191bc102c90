//! An in-memory [`Mixer`] built programmatically or from a controls file.
//!
//! Exists only to let test suites (and `audiohal-cli`'s demonstration
//! mode, which has no real kernel mixer to talk to) drive the engine
//! without hardware. Grounded on `sonido-config::factory_presets`' pattern
//! of building runtime structures from a flat, declarative on-disk
//! format.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use audiohal_core::{Control, ControlId, ControlKind, ControlLookup, Error, Result};

use crate::mixer::Mixer;

/// An in-memory mixer: a flat vector of [`Control`]s plus a name index.
///
/// Control ids are assigned sequentially as controls are added, starting
/// at 0, and never reused — `ControlId(i)` always indexes
/// `self.controls[i]`.
#[derive(Debug, Default)]
pub struct MockMixer {
    controls: Vec<Control>,
    by_name: HashMap<String, usize>,
}

impl MockMixer {
    /// Creates an empty mixer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bool control with `count` elements, all initialized to 0.
    pub fn add_bool(&mut self, name: impl Into<String>, count: usize) -> ControlId {
        let name = name.into();
        let id = ControlId(self.controls.len() as u32);
        self.by_name.insert(name.clone(), self.controls.len());
        self.controls.push(Control::new_bool(name, id, count));
        id
    }

    /// Adds an int control with `count` elements and range `(min, max)`,
    /// all initialized to `min`.
    pub fn add_int(&mut self, name: impl Into<String>, count: usize, min: i64, max: i64) -> ControlId {
        let name = name.into();
        let id = ControlId(self.controls.len() as u32);
        self.by_name.insert(name.clone(), self.controls.len());
        self.controls.push(Control::new_int(name, id, count, min, max));
        id
    }

    /// Adds an enum control selecting `strings[0]` initially.
    pub fn add_enum(&mut self, name: impl Into<String>, strings: Vec<String>) -> ControlId {
        let name = name.into();
        let id = ControlId(self.controls.len() as u32);
        self.by_name.insert(name.clone(), self.controls.len());
        self.controls.push(Control::new_enum(name, id, strings));
        id
    }

    /// Adds a byte control with `count` zeroed octets.
    pub fn add_byte(&mut self, name: impl Into<String>, count: usize) -> ControlId {
        let name = name.into();
        let id = ControlId(self.controls.len() as u32);
        self.by_name.insert(name.clone(), self.controls.len());
        self.controls.push(Control::new_byte(name, id, count));
        id
    }

    /// Builds a mixer from a controls file: one control per line, CSV
    /// with fields `name,kind,num_elements,initial_value,valueset`, where
    /// `valueset` is `min:max` for `int`, colon-separated strings for
    /// `enum`, and empty for `bool`/`byte`. Byte controls always start
    /// zeroed; `initial_value` is ignored for them since the format has
    /// no byte-literal encoding.
    pub fn from_controls_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())
            .map_err(|source| Error::io(path.as_ref(), source))?;
        let mut mixer = Self::new();
        for (line_no, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            mixer.add_from_line(line, line_no + 1)?;
        }
        Ok(mixer)
    }

    fn add_from_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        let fields: Vec<&str> = line.split(',').collect();
        let [name, kind, num_elements, initial_value, valueset] = fields.as_slice() else {
            return Err(Error::invalid_argument(format!(
                "controls file line {line_no}: expected 5 comma-separated fields, got {}",
                fields.len()
            )));
        };
        let count: usize = num_elements.parse().map_err(|_| {
            Error::invalid_argument(format!(
                "controls file line {line_no}: '{num_elements}' is not a valid element count"
            ))
        })?;

        match *kind {
            "bool" => {
                let id = self.add_bool(*name, count);
                if let Ok(v) = initial_value.parse::<i64>() {
                    let normalized = i64::from(v != 0);
                    if let Some(control) = self.controls.get_mut(id.0 as usize) {
                        control.values.iter_mut().for_each(|slot| *slot = normalized);
                    }
                }
            }
            "int" => {
                let (min, max) = parse_range(valueset, line_no)?;
                let id = self.add_int(*name, count, min, max);
                if let Ok(v) = initial_value.parse::<i64>() {
                    if let Some(control) = self.controls.get_mut(id.0 as usize) {
                        control.values.iter_mut().for_each(|slot| *slot = v);
                    }
                }
            }
            "enum" => {
                let strings: Vec<String> = valueset.split(':').map(String::from).collect();
                let id = self.add_enum(*name, strings);
                if let Ok(index) = initial_value.parse::<i64>() {
                    if let (Ok(index), Some(control)) =
                        (usize::try_from(index), self.controls.get_mut(id.0 as usize))
                    {
                        let len = match &control.kind {
                            ControlKind::Enum { strings } => strings.len(),
                            _ => 0,
                        };
                        if index < len {
                            control.enum_index = index;
                        }
                    }
                }
            }
            "byte" => {
                self.add_byte(*name, count);
            }
            other => {
                return Err(Error::invalid_argument(format!(
                    "controls file line {line_no}: unknown control kind '{other}'"
                )));
            }
        }
        Ok(())
    }
}

fn parse_range(valueset: &str, line_no: usize) -> Result<(i64, i64)> {
    let (min, max) = valueset.split_once(':').ok_or_else(|| {
        Error::invalid_argument(format!(
            "controls file line {line_no}: int control valueset must be 'min:max'"
        ))
    })?;
    let min = min.parse::<i64>().map_err(|_| {
        Error::invalid_argument(format!("controls file line {line_no}: invalid min '{min}'"))
    })?;
    let max = max.parse::<i64>().map_err(|_| {
        Error::invalid_argument(format!("controls file line {line_no}: invalid max '{max}'"))
    })?;
    Ok((min, max))
}

impl ControlLookup for MockMixer {
    fn lookup_control(&self, name: &str) -> Option<(ControlId, ControlKind)> {
        let &index = self.by_name.get(name)?;
        let control = &self.controls[index];
        Some((control.id, control.kind.clone()))
    }
}

impl Mixer for MockMixer {
    fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id.0 as usize)
    }

    fn set_element(&mut self, id: ControlId, index: usize, value: i64) -> Result<()> {
        let control = self
            .controls
            .get_mut(id.0 as usize)
            .ok_or_else(|| Error::invalid_argument(format!("no such control id {}", id.0)))?;

        match &control.kind {
            ControlKind::Bool { count } | ControlKind::Int { count, .. } => {
                if index >= *count {
                    return Err(Error::invalid_argument(format!(
                        "index {index} out of range for control '{}' ({count} elements)",
                        control.name
                    )));
                }
                if let ControlKind::Int { min, max, .. } = &control.kind {
                    if value < *min || value > *max {
                        return Err(Error::invalid_argument(format!(
                            "value {value} out of range [{min}, {max}] for control '{}'",
                            control.name
                        )));
                    }
                }
                control.values[index] = value;
            }
            ControlKind::Enum { strings } => {
                if index != 0 {
                    return Err(Error::invalid_argument(format!(
                        "enum control '{}' has a single element",
                        control.name
                    )));
                }
                let new_index = usize::try_from(value).ok().filter(|i| *i < strings.len());
                let Some(new_index) = new_index else {
                    return Err(Error::invalid_argument(format!(
                        "{value} is not a valid enum index for control '{}'",
                        control.name
                    )));
                };
                control.enum_index = new_index;
            }
            ControlKind::Byte { .. } => {
                return Err(Error::invalid_argument(format!(
                    "control '{}' is a byte control; use set_bytes",
                    control.name
                )));
            }
        }
        control.changed = true;
        Ok(())
    }

    fn set_bytes(&mut self, id: ControlId, bytes: &[u8]) -> Result<()> {
        let control = self
            .controls
            .get_mut(id.0 as usize)
            .ok_or_else(|| Error::invalid_argument(format!("no such control id {}", id.0)))?;
        let ControlKind::Byte { count } = &control.kind else {
            return Err(Error::invalid_argument(format!(
                "control '{}' is not a byte control",
                control.name
            )));
        };
        if bytes.len() > *count {
            return Err(Error::invalid_argument(format!(
                "{} bytes do not fit control '{}' ({count} octets)",
                bytes.len(),
                control.name
            )));
        }
        control.bytes[..bytes.len()].copy_from_slice(bytes);
        control.changed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn programmatic_controls_are_lookup_able() {
        let mut mixer = MockMixer::new();
        let id = mixer.add_bool("Speaker Switch", 1);
        let (found_id, kind) = mixer.lookup_control("Speaker Switch").unwrap();
        assert_eq!(found_id, id);
        assert_eq!(kind, ControlKind::Bool { count: 1 });
    }

    #[test]
    fn set_element_rejects_out_of_range_value() {
        let mut mixer = MockMixer::new();
        let id = mixer.add_int("Master Volume", 1, -64, 50);
        assert!(mixer.set_element(id, 0, 100).is_err());
        assert_eq!(mixer.control(id).unwrap().values, vec![-64]);
    }

    #[test]
    fn from_controls_file_parses_every_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controls.csv");
        std::fs::write(
            &path,
            "Speaker Switch,bool,1,0,\n\
             Master Volume,int,2,-64,-64:50\n\
             Route,enum,1,1,off:speaker\n\
             Calibration,byte,4,,\n",
        )
        .unwrap();

        let mixer = MockMixer::from_controls_file(&path).unwrap();
        assert!(mixer.lookup_control("Speaker Switch").is_some());

        let (_, kind) = mixer.lookup_control("Master Volume").unwrap();
        assert_eq!(kind, ControlKind::Int { count: 2, min: -64, max: 50 });

        let (route_id, _) = mixer.lookup_control("Route").unwrap();
        assert_eq!(mixer.control(route_id).unwrap().enum_index, 1);

        let (cal_id, _) = mixer.lookup_control("Calibration").unwrap();
        assert_eq!(mixer.control(cal_id).unwrap().bytes, vec![0, 0, 0, 0]);
    }

    #[test]
    fn malformed_line_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controls.csv");
        std::fs::write(&path, "Incomplete,bool\n").unwrap();
        assert!(MockMixer::from_controls_file(&path).is_err());
    }
}
