//! Live filesystem adapter using `std::fs`.

use std::path::{Path, PathBuf};

use crate::ports::filesystem::{DirEntry, EntryKind, FileSystem};

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<DirEntry>, Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            // `Path::is_dir` follows symlinks; dangling links count as files.
            let kind =
                if entry.path().is_dir() { EntryKind::Directory } else { EntryKind::File };
            entries.push(DirEntry { name, kind });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn canonicalize(
        &self,
        path: &Path,
    ) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::canonicalize(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_dir_sorts_and_reports_kinds() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("C.md"), "").unwrap();

        let entries = LiveFileSystem.read_dir(dir.path()).unwrap();

        assert_eq!(
            entries,
            vec![
                DirEntry { name: "C.md".into(), kind: EntryKind::File },
                DirEntry { name: "a".into(), kind: EntryKind::Directory },
                DirEntry { name: "b.txt".into(), kind: EntryKind::File },
            ]
        );
    }

    #[test]
    fn write_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output/demo/README.md");

        LiveFileSystem.write(&path, "# Demo").unwrap();

        assert_eq!(LiveFileSystem.read_to_string(&path).unwrap(), "# Demo");
    }

    #[test]
    fn read_dir_on_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LiveFileSystem.read_dir(&dir.path().join("missing")).is_err());
    }
}
