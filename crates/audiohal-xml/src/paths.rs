//! Path resolution for the root config, codec-probe files, and `<case
//! file="…">` targets.
//!
//! Unlike `sonido-config::paths`, which resolves user preset directories
//! per-OS (this engine targets exactly one kind of host: the embedded
//! mixer device, so there's no per-OS branching to do), there is a single
//! *default system configuration directory* fixed at build time. Only the
//! root path supplied to [`crate::load`] is resolved against it; every
//! other reference (`codec_probe/@file`, `case/@file`) resolves against
//! the directory of the file that names it.

use std::path::{Path, PathBuf};

/// The default system configuration directory, used only for the root
/// path when it is relative. Mirrors `/etc/audiohal` on a typical embedded
/// Linux audio host.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/audiohal";

/// `true` if `raw` is an absolute path once leading whitespace is
/// stripped.
///
/// The source tolerates a stray leading space or tab in XML-supplied path
/// attributes; we preserve that leniency rather than failing load on
/// whitespace a hand-edited config file is likely to contain.
#[must_use]
pub fn is_absolute(raw: &str) -> bool {
    Path::new(raw.trim_start()).is_absolute()
}

/// Resolves the root config path: used verbatim if absolute, otherwise
/// joined to [`DEFAULT_CONFIG_DIR`].
#[must_use]
pub fn resolve_root(raw: &str) -> PathBuf {
    let trimmed = raw.trim_start();
    if is_absolute(trimmed) {
        PathBuf::from(trimmed)
    } else {
        Path::new(DEFAULT_CONFIG_DIR).join(trimmed)
    }
}

/// Resolves a path referenced *from within* an already-resolved XML file:
/// used verbatim if absolute, otherwise joined to `referencing_file`'s
/// parent directory.
#[must_use]
pub fn resolve_relative_to(raw: &str, referencing_file: &Path) -> PathBuf {
    let trimmed = raw.trim_start();
    if is_absolute(trimmed) {
        return PathBuf::from(trimmed);
    }
    referencing_file
        .parent()
        .map_or_else(|| PathBuf::from(trimmed), |dir| dir.join(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_used_verbatim() {
        assert_eq!(resolve_root("/opt/audio/card0.xml"), PathBuf::from("/opt/audio/card0.xml"));
    }

    #[test]
    fn relative_root_joins_default_dir() {
        assert_eq!(
            resolve_root("card0.xml"),
            PathBuf::from(DEFAULT_CONFIG_DIR).join("card0.xml")
        );
    }

    #[test]
    fn leading_whitespace_does_not_defeat_absoluteness_check() {
        assert!(is_absolute("   /opt/audio/card0.xml"));
        assert_eq!(
            resolve_root("   /opt/audio/card0.xml"),
            PathBuf::from("/opt/audio/card0.xml")
        );
    }

    #[test]
    fn relative_case_file_resolves_against_referencing_directory() {
        let referencing = Path::new("/opt/audio/probe/base.xml");
        assert_eq!(
            resolve_relative_to("variant_a.xml", referencing),
            PathBuf::from("/opt/audio/probe/variant_a.xml")
        );
    }

    #[test]
    fn absolute_case_file_ignores_referencing_directory() {
        let referencing = Path::new("/opt/audio/probe/base.xml");
        assert_eq!(
            resolve_relative_to("/other/variant_a.xml", referencing),
            PathBuf::from("/other/variant_a.xml")
        );
    }
}
