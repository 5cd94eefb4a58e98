//! Ignore-file parsing into glob exclusion patterns.

use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::ports::FileSystem;

/// Name of the ignore file looked up at the project root.
pub const IGNORE_FILE: &str = ".gitignore";

/// Compiled exclusion patterns from an ignore file.
///
/// A path is ignored when it matches *any* pattern; pattern order is kept
/// only so that logs and tests are deterministic.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    patterns: Vec<String>,
    set: GlobSet,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::empty()
    }
}

impl IgnoreRules {
    /// A rule set matching nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self { patterns: Vec::new(), set: GlobSet::empty() }
    }

    /// Parses ignore-file contents.
    ///
    /// Blank lines and `#` comments contribute nothing. Each remaining line
    /// is trimmed and loses one leading `/`; a trailing `/` gains a `*` so
    /// the pattern covers everything below that directory. Matching follows
    /// `fnmatch`: `*` and `?` also match `/`, and case is significant.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut patterns = Vec::new();
        let mut builder = GlobSetBuilder::new();

        for line in content.lines() {
            let Some(pattern) = normalize_line(line) else {
                continue;
            };
            match GlobBuilder::new(&pattern).literal_separator(false).build() {
                Ok(glob) => {
                    builder.add(glob);
                    patterns.push(pattern);
                }
                Err(e) => warn!("Skipping invalid ignore pattern {pattern:?}: {e}"),
            }
        }

        let set = builder.build().unwrap_or_else(|e| {
            warn!("Failed to compile ignore patterns, ignoring none: {e}");
            GlobSet::empty()
        });
        Self { patterns, set }
    }

    /// Loads `.gitignore` from the project root. A missing file yields an
    /// empty rule set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(fs: &dyn FileSystem, root: &Path) -> Result<Self> {
        let path = root.join(IGNORE_FILE);
        if !fs.exists(&path) {
            info!("No {IGNORE_FILE} found in {}", root.display());
            return Ok(Self::empty());
        }
        let content = fs.read_to_string(&path).map_err(|e| Error::read(&path, e))?;
        let rules = Self::parse(&content);
        info!("{IGNORE_FILE} patterns: {:?}", rules.patterns);
        Ok(rules)
    }

    /// The normalized patterns, in file order.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns `true` if the `/`-separated relative path matches any pattern.
    #[must_use]
    pub fn is_match(&self, relative: &str) -> bool {
        self.set.is_match(relative)
    }
}

/// Turns one ignore-file line into a pattern, or `None` if it contributes nothing.
fn normalize_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    if trimmed.starts_with('!') {
        debug!("Negated ignore pattern not supported: {trimmed}");
        return None;
    }
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    let mut pattern = trimmed.to_string();
    if pattern.ends_with('/') {
        pattern.push('*');
    }
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;

    #[test]
    fn blank_and_comment_lines_contribute_nothing() {
        let rules = IgnoreRules::parse("\n   \n# build output\n  # indented comment\n\t\n");
        assert!(rules.patterns().is_empty());
        assert!(!rules.is_match("anything"));
    }

    #[test]
    fn normalizes_leading_and_trailing_separators() {
        let rules = IgnoreRules::parse("/dist\nbuild/\n  *.log  \n");
        assert_eq!(rules.patterns(), ["dist", "build/*", "*.log"]);
    }

    #[test]
    fn only_one_leading_separator_is_stripped() {
        let rules = IgnoreRules::parse("//weird");
        assert_eq!(rules.patterns(), ["/weird"]);
    }

    #[test]
    fn directory_pattern_matches_descendants_but_not_sibling_file() {
        let rules = IgnoreRules::parse("build/");
        assert!(rules.is_match("build/x"));
        assert!(rules.is_match("build/x/y"));
        assert!(!rules.is_match("build"));
    }

    #[test]
    fn star_crosses_directory_separators() {
        let rules = IgnoreRules::parse("*.log");
        assert!(rules.is_match("debug.log"));
        assert!(rules.is_match("logs/2024/debug.log"));
        assert!(!rules.is_match("debug.txt"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let rules = IgnoreRules::parse("Secrets.json");
        assert!(rules.is_match("Secrets.json"));
        assert!(!rules.is_match("secrets.json"));
    }

    #[test]
    fn character_classes_and_single_wildcards() {
        let rules = IgnoreRules::parse("tmp?.py\nout[0-9].txt");
        assert!(rules.is_match("tmp1.py"));
        assert!(!rules.is_match("tmp10.py"));
        assert!(rules.is_match("out7.txt"));
        assert!(!rules.is_match("outx.txt"));
    }

    #[test]
    fn negated_and_invalid_patterns_are_skipped() {
        let rules = IgnoreRules::parse("!keep.py\n[unclosed\nvalid.py");
        assert_eq!(rules.patterns(), ["valid.py"]);
        assert!(!rules.is_match("keep.py"));
    }

    #[test]
    fn missing_ignore_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let rules = IgnoreRules::load(&LiveFileSystem, dir.path()).unwrap();
        assert!(rules.patterns().is_empty());
    }

    #[test]
    fn loads_ignore_file_from_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(IGNORE_FILE), "venv/\n*.pyc\n").unwrap();
        let rules = IgnoreRules::load(&LiveFileSystem, dir.path()).unwrap();
        assert_eq!(rules.patterns(), ["venv/*", "*.pyc"]);
    }
}
