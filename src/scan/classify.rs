//! Pure predicates deciding whether a path is ignored and whether it is relevant.

use std::path::Path;

use tracing::debug;

use super::ignore::IgnoreRules;
use crate::ports::filesystem::EntryKind;

/// Directory names holding interpreter caches; ignored wherever they appear.
pub const CACHE_DIRS: &[&str] = &["__pycache__"];

/// Extensions of source and shell scripts.
pub const SCRIPT_EXTENSIONS: &[&str] = &["py", "sh", "bash"];

/// Extension of structured configuration files.
pub const CONFIG_EXTENSION: &str = "json";

/// Role of a non-ignored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A directory.
    Directory,
    /// A script, or a structured-data file under a config-named directory.
    RelevantFile,
    /// Any other file.
    OtherFile,
}

/// Returns `true` if the `/`-separated relative path must be left out.
///
/// A path is ignored when any segment is hidden (starts with `.`), when any
/// segment is a cache directory, or when it matches an ignore pattern.
#[must_use]
pub fn is_ignored(relative: &str, rules: &IgnoreRules) -> bool {
    let ignored = relative.split('/').any(|segment| segment.starts_with('.'))
        || relative.split('/').any(|segment| CACHE_DIRS.contains(&segment))
        || rules.is_match(relative);
    if ignored {
        debug!("Ignored: {relative}");
    } else {
        debug!("Not ignored: {relative}");
    }
    ignored
}

/// Classifies a non-ignored entry by its relative path and kind.
#[must_use]
pub fn classify(relative: &str, kind: EntryKind) -> Classification {
    if kind == EntryKind::Directory {
        return Classification::Directory;
    }
    if is_relevant(relative) {
        Classification::RelevantFile
    } else {
        Classification::OtherFile
    }
}

/// Relevance predicate for files.
fn is_relevant(relative: &str) -> bool {
    let path = Path::new(relative);
    let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    if SCRIPT_EXTENSIONS.contains(&extension) {
        return true;
    }
    extension == CONFIG_EXTENSION
        && path
            .parent()
            .and_then(Path::to_str)
            .is_some_and(|dir| dir.to_lowercase().contains("config"))
}
