//! Walks a resolved `<audiohal>` document into a validated
//! [`audiohal_core::ConfigModel`].
//!
//! Parsing happens in two passes over the file system: [`crate::codec_probe`]
//! walks just far enough into each candidate document to find a
//! `<codec_probe>` element, then this module re-parses the final document in
//! full. XML is read once per candidate either way, so the extra pass costs
//! nothing a probe chain wasn't already going to cost.

use std::fs;
use std::path::Path as FsPath;

use audiohal_core::{
    BadConfigReason, ConfigModel, ControlLookup, CtlAction, Device, Direction, Error,
    GLOBAL_DEVICE_NAME, Path as ConfigPath, PathId, Result, StreamDefinition, StreamType,
    VolumeCtl, lookup_device_bit,
};
use roxmltree::Node;
use tracing::debug;

use crate::codec_probe::{self, ProbeCase, ProbeSpec};
use crate::ctl_value::{self, RawCtl};
use crate::paths::resolve_root;

/// Loads and validates the configuration rooted at `path` against `mixer`.
///
/// `path` is resolved per [`crate::paths`] rules, a codec-probe chain (if
/// any) is followed to the document that should actually describe the
/// mixer, and that document is parsed and cross-referenced against
/// `mixer`'s controls.
pub fn load(path: impl AsRef<FsPath>, mixer: &impl ControlLookup) -> Result<ConfigModel> {
    let raw = path.as_ref().to_string_lossy();
    let root = resolve_root(&raw);
    let final_path = codec_probe::resolve(root, |candidate| probe_spec_for(candidate))?;
    debug!(path = %final_path.display(), "loading audiohal configuration");
    load_document(&final_path, mixer)
}

fn read_source(path: &FsPath) -> Result<String> {
    fs::read_to_string(path).map_err(|source| {
        Error::BadConfig(BadConfigReason::Unreadable { path: path.to_path_buf(), source })
    })
}

fn parse_source<'a>(path: &FsPath, text: &'a str) -> Result<roxmltree::Document<'a>> {
    roxmltree::Document::parse(text).map_err(|e| {
        Error::BadConfig(BadConfigReason::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    })
}

fn probe_spec_for(path: &FsPath) -> Result<Option<ProbeSpec>> {
    let text = read_source(path)?;
    let doc = parse_source(path, &text)?;
    let Some(probe_el) = child(doc.root_element(), "codec_probe") else {
        return Ok(None);
    };
    let file = required_attr(probe_el, "file", path)?;
    let cases = probe_el
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "case")
        .map(|c| {
            let name = required_attr(c, "name", path)?.to_string();
            let file = required_attr(c, "file", path)?;
            Ok(ProbeCase {
                name,
                file: codec_probe::resolve_case_file(file, path),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(ProbeSpec {
        file: codec_probe::resolve_case_file(file, path),
        cases,
    }))
}

fn load_document(path: &FsPath, mixer: &impl ControlLookup) -> Result<ConfigModel> {
    let text = read_source(path)?;
    let doc = parse_source(path, &text)?;
    let root = doc.root_element();

    let mixer_elements: Vec<Node<'_, '_>> = root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "mixer")
        .collect();
    let mixer_el = match mixer_elements.as_slice() {
        [one] => *one,
        other => {
            return Err(Error::BadConfig(BadConfigReason::MixerElementCount {
                found: other.len(),
            }));
        }
    };
    let card = parse_u32(required_attr(mixer_el, "card", path)?, "mixer/@card", path)?;

    let pre_init = child(mixer_el, "pre_init")
        .map(|el| parse_ctl_list(el, mixer, path))
        .transpose()?
        .unwrap_or_default();
    let init = child(mixer_el, "init")
        .map(|el| parse_ctl_list(el, mixer, path))
        .transpose()?
        .unwrap_or_default();

    let mut paths: Vec<ConfigPath> = Vec::new();
    let mut devices: Vec<Device> = Vec::new();
    for el in elements(root, "device") {
        devices.push(parse_device(el, mixer, path, &mut paths)?);
    }
    if !devices.iter().any(Device::is_global) {
        devices.push(Device::global());
    }

    let mut streams = Vec::new();
    for el in elements(root, "stream") {
        streams.push(parse_stream(el, mixer, path)?);
    }

    ConfigModel::assemble(card, pre_init, init, paths, devices, streams)
}

fn parse_device(
    el: Node<'_, '_>,
    mixer: &impl ControlLookup,
    path: &FsPath,
    paths: &mut Vec<ConfigPath>,
) -> Result<Device> {
    let name = required_attr(el, "name", path)?;
    let bits = if name == GLOBAL_DEVICE_NAME {
        audiohal_core::DeviceBits::NONE
    } else {
        lookup_device_bit(name)
            .ok_or_else(|| Error::BadConfig(BadConfigReason::UnknownDevice(name.to_string())))?
    };
    let mut device = Device::new(name, bits);

    for path_el in elements(el, "path") {
        let path_name = required_attr(path_el, "name", path)?;
        let mut p = ConfigPath::new(path_name);
        for ctl_el in elements(path_el, "ctl") {
            p.push(parse_ctl(ctl_el, mixer, path)?);
        }
        let id = PathId(paths.len());
        paths.push(p);
        device.set_path(path_name, id);
    }

    Ok(device)
}

fn parse_stream(el: Node<'_, '_>, mixer: &impl ControlLookup, path: &FsPath) -> Result<StreamDefinition> {
    let stream_type = match required_attr(el, "type", path)? {
        "pcm" => StreamType::Pcm,
        "compress" => StreamType::Compress,
        "hw" => StreamType::Hw,
        other => {
            return Err(Error::BadConfig(BadConfigReason::ParseError {
                path: path.to_path_buf(),
                message: format!("unknown stream type '{other}'"),
            }));
        }
    };
    let direction = match el.attribute("dir") {
        None => None,
        Some("in") => Some(Direction::In),
        Some("out") => Some(Direction::Out),
        Some(other) => {
            return Err(Error::BadConfig(BadConfigReason::ParseError {
                path: path.to_path_buf(),
                message: format!("unknown stream direction '{other}'"),
            }));
        }
    };

    let mut constants = std::collections::HashMap::new();
    for set_el in elements(el, "set") {
        let name = required_attr(set_el, "name", path)?.to_string();
        let val = required_attr(set_el, "val", path)?.to_string();
        constants.insert(name, val);
    }

    let enable_path = child(el, "enable")
        .map(|n| required_attr(n, "path", path))
        .transpose()?
        .map(str::to_string);
    let disable_path = child(el, "disable")
        .map(|n| required_attr(n, "path", path))
        .transpose()?
        .map(str::to_string);

    let mut left_vol = None;
    let mut right_vol = None;
    for ctl_el in elements(el, "ctl") {
        match ctl_el.attribute("function") {
            Some("leftvol") => left_vol = Some(parse_volume_ctl(ctl_el, mixer, path)?),
            Some("rightvol") => right_vol = Some(parse_volume_ctl(ctl_el, mixer, path)?),
            _ => {}
        }
    }

    let mut usecases = std::collections::HashMap::new();
    for usecase_el in elements(el, "usecase") {
        let usecase_name = required_attr(usecase_el, "name", path)?.to_string();
        let mut cases = std::collections::HashMap::new();
        for case_el in elements(usecase_el, "case") {
            let case_name = required_attr(case_el, "name", path)?.to_string();
            cases.insert(case_name, parse_ctl_list(case_el, mixer, path)?);
        }
        usecases.insert(usecase_name, cases);
    }

    Ok(StreamDefinition {
        stream_type,
        direction,
        name: el.attribute("name").map(str::to_string),
        card: optional_u32(el, "card", path)?,
        device: optional_u32(el, "device", path)?,
        rate: optional_u32(el, "rate", path)?.unwrap_or(0),
        period_size: optional_u32(el, "period_size", path)?.unwrap_or(0),
        period_count: optional_u32(el, "period_count", path)?.unwrap_or(0),
        instances: optional_u32(el, "instances", path)?.unwrap_or(0),
        constants,
        enable_path,
        disable_path,
        left_vol,
        right_vol,
        usecases,
    })
}

fn parse_volume_ctl(el: Node<'_, '_>, mixer: &impl ControlLookup, path: &FsPath) -> Result<VolumeCtl> {
    let name = required_attr(el, "name", path)?;
    let (control, _kind) = mixer
        .lookup_control(name)
        .ok_or_else(|| Error::BadConfig(BadConfigReason::UnknownControl(name.to_string())))?;
    let index = optional_usize(el, "index", path)?;
    let min = el.attribute("min").map(|s| parse_i64(s, "ctl/@min", path)).transpose()?;
    let max = el.attribute("max").map(|s| parse_i64(s, "ctl/@max", path)).transpose()?;
    let range = match (min, max) {
        (Some(min), Some(max)) => Some((min, max)),
        _ => None,
    };
    Ok(VolumeCtl {
        control,
        control_name: name.to_string(),
        index,
        range,
    })
}

fn parse_ctl_list(parent: Node<'_, '_>, mixer: &impl ControlLookup, path: &FsPath) -> Result<Vec<CtlAction>> {
    elements(parent, "ctl").map(|el| parse_ctl(el, mixer, path)).collect()
}

fn parse_ctl(el: Node<'_, '_>, mixer: &impl ControlLookup, path: &FsPath) -> Result<CtlAction> {
    let name = required_attr(el, "name", path)?;
    let (control_id, kind) = mixer
        .lookup_control(name)
        .ok_or_else(|| Error::BadConfig(BadConfigReason::UnknownControl(name.to_string())))?;
    let index = optional_usize(el, "index", path)?;
    let raw = RawCtl {
        name,
        val: el.attribute("val"),
        file: el.attribute("file"),
        index,
    };
    ctl_value::parse(raw, control_id, &kind, path)
}

fn elements<'a, 'input>(
    parent: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent.children().filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

fn child<'a, 'input>(parent: Node<'a, 'input>, tag: &'static str) -> Option<Node<'a, 'input>> {
    elements(parent, tag).next()
}

fn required_attr<'input>(el: Node<'_, 'input>, attr: &str, path: &FsPath) -> Result<&'input str> {
    el.attribute(attr).ok_or_else(|| {
        Error::BadConfig(BadConfigReason::ParseError {
            path: path.to_path_buf(),
            message: format!("<{}> missing required attribute '{attr}'", el.tag_name().name()),
        })
    })
}

fn optional_u32(el: Node<'_, '_>, attr: &str, path: &FsPath) -> Result<Option<u32>> {
    el.attribute(attr).map(|s| parse_u32(s, attr, path)).transpose()
}

fn optional_usize(el: Node<'_, '_>, attr: &str, path: &FsPath) -> Result<Option<usize>> {
    el.attribute(attr)
        .map(|s| {
            s.parse::<usize>().map_err(|_| {
                Error::BadConfig(BadConfigReason::ParseError {
                    path: path.to_path_buf(),
                    message: format!("'{s}' is not a valid non-negative index for '{attr}'"),
                })
            })
        })
        .transpose()
}

fn parse_u32(raw: &str, attr: &str, path: &FsPath) -> Result<u32> {
    raw.parse::<u32>().map_err(|_| {
        Error::BadConfig(BadConfigReason::ParseError {
            path: path.to_path_buf(),
            message: format!("'{raw}' is not a valid unsigned integer for '{attr}'"),
        })
    })
}

fn parse_i64(raw: &str, attr: &str, path: &FsPath) -> Result<i64> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else {
        raw.parse::<i64>()
    }
    .map_err(|_| {
        Error::BadConfig(BadConfigReason::ParseError {
            path: path.to_path_buf(),
            message: format!("'{raw}' is not a valid integer for '{attr}'"),
        })
    })
}
