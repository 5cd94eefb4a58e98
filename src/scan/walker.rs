//! Lexicographic pre-order traversal of a project tree.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::classify::{classify, is_ignored, Classification};
use super::ignore::IgnoreRules;
use super::{ProjectStructure, RelevantFile, ScanEntry};
use crate::error::{Error, Result};
use crate::ports::filesystem::EntryKind;
use crate::ports::FileSystem;

/// Receives every non-ignored entry of a walk, parents before children.
pub trait Collector {
    /// Called once per surviving entry.
    fn visit(&mut self, entry: &ScanEntry, classification: Classification);
}

impl Collector for ProjectStructure {
    fn visit(&mut self, entry: &ScanEntry, _classification: Classification) {
        self.push(entry);
    }
}

impl Collector for Vec<RelevantFile> {
    fn visit(&mut self, entry: &ScanEntry, classification: Classification) {
        if classification == Classification::RelevantFile {
            self.push(RelevantFile { path: entry.path.clone(), relative: entry.relative.clone() });
        }
    }
}

impl<A: Collector, B: Collector> Collector for (A, B) {
    fn visit(&mut self, entry: &ScanEntry, classification: Classification) {
        self.0.visit(entry, classification);
        self.1.visit(entry, classification);
    }
}

/// Walks `root` and feeds every non-ignored entry to `collector`.
///
/// Children are visited sorted by name; ignored entries are skipped and,
/// for directories, not descended into. A directory whose canonical path is
/// already on the current ancestor chain is rendered but not entered, so
/// symlink cycles terminate while plain aliases are walked in full.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `root` does not exist and [`Error::Read`]
/// if any directory on the way cannot be listed.
pub fn walk(
    fs: &dyn FileSystem,
    root: &Path,
    rules: &IgnoreRules,
    collector: &mut dyn Collector,
) -> Result<()> {
    if !fs.exists(root) {
        return Err(Error::NotFound(root.to_path_buf()));
    }
    let root = fs.canonicalize(root).map_err(|e| Error::read(root, e))?;

    let mut walker = Walker { fs, rules, ancestors: HashSet::new() };
    walker.ancestors.insert(root.clone());
    walker.descend(&root, "", 0, collector)
}

/// Loads the root's ignore file and walks once, producing both the
/// structural listing and the relevant-file list.
///
/// # Errors
///
/// Returns an error if the ignore file or any directory cannot be read,
/// or if `root` does not exist.
pub fn walk_project(
    fs: &dyn FileSystem,
    root: &Path,
) -> Result<(ProjectStructure, Vec<RelevantFile>)> {
    info!("Scanning project structure of {}", root.display());
    let rules = IgnoreRules::load(fs, root)?;
    let mut collected = (ProjectStructure::default(), Vec::new());
    walk(fs, root, &rules, &mut collected)?;
    info!("Found {} entries, {} relevant files", collected.0.len(), collected.1.len());
    Ok(collected)
}

/// Collects only the relevant files under `root`, flattened, in walk order.
///
/// # Errors
///
/// Returns an error if `root` does not exist or a directory cannot be read.
pub fn find_relevant_files(
    fs: &dyn FileSystem,
    root: &Path,
    rules: &IgnoreRules,
) -> Result<Vec<RelevantFile>> {
    info!("Finding all scripts in {}", root.display());
    let mut files = Vec::new();
    walk(fs, root, rules, &mut files)?;
    info!("Found {} scripts", files.len());
    for file in &files {
        debug!("{}", file.path.display());
    }
    Ok(files)
}

struct Walker<'a> {
    fs: &'a dyn FileSystem,
    rules: &'a IgnoreRules,
    /// Canonical paths of the directories currently being walked.
    ancestors: HashSet<PathBuf>,
}

impl Walker<'_> {
    fn descend(
        &mut self,
        dir: &Path,
        prefix: &str,
        depth: usize,
        collector: &mut dyn Collector,
    ) -> Result<()> {
        let children = self.fs.read_dir(dir).map_err(|e| Error::read(dir, e))?;

        for child in children {
            let relative =
                if prefix.is_empty() { child.name.clone() } else { format!("{prefix}/{}", child.name) };
            if is_ignored(&relative, self.rules) {
                continue;
            }

            let entry = ScanEntry {
                path: dir.join(&child.name),
                relative,
                name: child.name,
                kind: child.kind,
                depth,
            };
            collector.visit(&entry, classify(&entry.relative, entry.kind));

            if entry.kind == EntryKind::Directory {
                let canonical =
                    self.fs.canonicalize(&entry.path).map_err(|e| Error::read(&entry.path, e))?;
                if self.ancestors.contains(&canonical) {
                    warn!("Not descending into {}: symlink cycle", entry.path.display());
                    continue;
                }
                self.ancestors.insert(canonical.clone());
                let walked = self.descend(&entry.path, &entry.relative, depth + 1, collector);
                self.ancestors.remove(&canonical);
                walked?;
            }
        }
        Ok(())
    }
}
