//! Resolves a `<codec_probe file="P"><case name="N" file="F"/>…</codec_probe>`
//! chain to the final document that should actually be parsed.
//!
//! Modeled as an iterative loop rather than recursion: each redirect
//! produces a new path to read and reconsider, bounded by
//! [`MAX_PROBE_DEPTH`] so a cyclic chain of probe files cannot hang the
//! loader.

use std::fs;
use std::path::{Path, PathBuf};

use audiohal_core::{BadConfigReason, Error};

use crate::paths::resolve_relative_to;

/// Maximum number of redirects a codec-probe chain may take before load
/// fails with [`BadConfigReason::ProbeDepthExceeded`].
pub const MAX_PROBE_DEPTH: usize = 16;

/// A single `<case name="…" file="…">` entry read off a `<codec_probe>`
/// element, with `file` already resolved relative to the document that
/// declared it.
#[derive(Debug, Clone)]
pub struct ProbeCase {
    /// The `name` attribute, compared against the probe file's contents.
    pub name: String,
    /// The resolved path to load if this case matches.
    pub file: PathBuf,
}

/// A `<codec_probe file="…">` element: the file whose contents select a
/// case, plus the cases themselves.
#[derive(Debug, Clone)]
pub struct ProbeSpec {
    /// Resolved path of the probe file to read.
    pub file: PathBuf,
    /// Ordered list of cases; the first name match wins.
    pub cases: Vec<ProbeCase>,
}

/// Given the document currently under consideration (`current`) and an
/// optional `<codec_probe>` parsed out of it, resolves the entire chain
/// and returns the path of the document that should actually be parsed.
///
/// `read_probe` is called for every document visited; it must parse that
/// document far enough to report whether it has a `<codec_probe>` and, if
/// so, what it specifies. This lets the caller reuse one XML parse for
/// both probe detection and the eventual mixer walk.
pub fn resolve<F>(current: PathBuf, mut read_probe: F) -> Result<PathBuf, Error>
where
    F: FnMut(&Path) -> Result<Option<ProbeSpec>, Error>,
{
    let mut path = current;
    for _ in 0..MAX_PROBE_DEPTH {
        let Some(spec) = read_probe(&path)? else {
            return Ok(path);
        };
        match select_case(&spec) {
            Some(next) => path = next,
            None => return Ok(path),
        }
    }
    Err(Error::BadConfig(BadConfigReason::ProbeDepthExceeded(MAX_PROBE_DEPTH)))
}

/// Reads the probe file named by `spec.file` and returns the resolved path
/// of the first case whose name matches its contents, or `None` if the
/// probe file is unreadable, empty, or matches no case — in which case the
/// current document is used as-is.
fn select_case(spec: &ProbeSpec) -> Option<PathBuf> {
    let contents = fs::read_to_string(&spec.file).ok()?;
    let trimmed = contents.strip_suffix('\n').unwrap_or(&contents);
    if trimmed.is_empty() {
        return None;
    }
    spec.cases
        .iter()
        .find(|case| case.name == trimmed)
        .map(|case| case.file.clone())
}

/// Resolves a `<case file="…">` attribute against the document that
/// declared the enclosing `<codec_probe>`.
#[must_use]
pub fn resolve_case_file(raw: &str, referencing_file: &Path) -> PathBuf {
    resolve_relative_to(raw, referencing_file)
}
