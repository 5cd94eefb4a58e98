//! Project traversal: ignore rules, path classification and the tree walk.
//!
//! The walk visits a directory tree once, in lexicographic pre-order, and
//! hands every surviving entry to a [`walker::Collector`]. The structural
//! listing and the flat relevant-file list are two collectors over that
//! single traversal, so they always agree on what is ignored.

pub mod classify;
pub mod ignore;
pub mod walker;

use std::path::PathBuf;

use serde::Serialize;

pub use crate::ports::filesystem::EntryKind;
pub use classify::{classify, is_ignored, Classification};
pub use ignore::IgnoreRules;
pub use walker::{find_relevant_files, walk, walk_project, Collector};

/// One non-ignored entry visited by the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Path relative to the project root, `/`-separated.
    pub relative: String,
    /// Entry name (last path component).
    pub name: String,
    /// Directory or file.
    pub kind: EntryKind,
    /// Nesting depth; children of the root are at depth 0.
    pub depth: usize,
}

/// A file eligible for description and dependency inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelevantFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Path relative to the project root, `/`-separated.
    pub relative: String,
}

/// The rendered nested listing of a project, one line per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectStructure {
    lines: Vec<String>,
}

impl ProjectStructure {
    /// Rendered lines in traversal order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of rendered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` when no entry survived the ignore rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines joined by `\n`, as written to `PROJECT_STRUCTURE.md`.
    #[must_use]
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    /// Appends the line for one entry: `- **name/**` for directories,
    /// `- name` for files, indented two spaces per depth level.
    pub fn push(&mut self, entry: &ScanEntry) {
        let indent = "  ".repeat(entry.depth);
        let line = match entry.kind {
            EntryKind::Directory => format!("{indent}- **{}/**", entry.name),
            EntryKind::File => format!("{indent}- {}", entry.name),
        };
        self.lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: EntryKind, depth: usize) -> ScanEntry {
        ScanEntry {
            path: PathBuf::from("/p").join(name),
            relative: name.to_string(),
            name: name.to_string(),
            kind,
            depth,
        }
    }

    #[test]
    fn renders_directories_and_files_distinctly() {
        let mut structure = ProjectStructure::default();
        structure.push(&entry("src", EntryKind::Directory, 0));
        structure.push(&entry("main.py", EntryKind::File, 1));
        structure.push(&entry("setup.py", EntryKind::File, 0));

        assert_eq!(structure.render(), "- **src/**\n  - main.py\n- setup.py");
        assert_eq!(structure.len(), 3);
    }
}
