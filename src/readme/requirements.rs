//! Dependency inference helpers: import extraction, reply parsing and the
//! merge with the environment snapshot.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Why a text-generation reply could not be read as a requirements list.
#[derive(Error, Debug)]
pub enum RequirementsError {
    /// The (unfenced) reply is not a `{"requirements": [...]}` JSON object.
    #[error("reply is not a requirements object: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Shape the collaborator is asked to reply with.
#[derive(Debug, Deserialize)]
struct RequirementsReply {
    requirements: Vec<String>,
}

/// Strips an optional fenced-code-block wrapper such as
/// ```` ```json {...} ``` ````, with or without line breaks.
#[must_use]
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Info string, e.g. `json`.
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let rest = rest.trim_end().strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parses a reply into its requirement lines.
///
/// # Errors
///
/// Returns [`RequirementsError::InvalidJson`] if the unfenced reply is not
/// a JSON object with a `requirements` array of strings.
pub fn parse_requirements(reply: &str) -> Result<Vec<String>, RequirementsError> {
    let parsed: RequirementsReply = serde_json::from_str(strip_code_fence(reply))?;
    Ok(parsed.requirements)
}

/// Lines that look like Python import statements, in file order.
pub fn extract_imports(content: &str) -> impl Iterator<Item = &str> {
    content.lines().filter(|line| line.starts_with("import") || line.starts_with("from"))
}

/// Non-empty, non-comment lines of a `name==version` listing.
#[must_use]
pub fn parse_snapshot(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// One requirement line split into its normalized name and the line itself.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Requirement {
    key: String,
    line: String,
    pinned: bool,
    versioned: bool,
}

impl Requirement {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let end = line.find(['=', '<', '>', '!', '~', ';', '[', ' ', '@']).unwrap_or(line.len());
        let name = &line[..end];
        if name.is_empty() {
            return None;
        }
        let key = name.to_lowercase().replace(['_', '.'], "-");
        let rest = line[end..].trim_start();
        Some(Self {
            key,
            line: line.to_string(),
            pinned: rest.starts_with("=="),
            versioned: rest.starts_with(['=', '<', '>', '!', '~']),
        })
    }
}

/// Builds the final dependency list.
///
/// The inferred list is authoritative: entries are unique by normalized
/// name (case-insensitive, `_` and `.` equal `-`), a later entry replaces an
/// earlier one in place, and an entry without a version specifier takes the
/// pinned version from the snapshot when it has one. Packages that appear
/// only in the snapshot are not added.
#[must_use]
pub fn merge_requirements(inferred: &[String], snapshot: &[String]) -> Vec<String> {
    let pins: HashMap<String, Requirement> = snapshot
        .iter()
        .filter_map(|line| Requirement::parse(line))
        .filter(|req| req.pinned)
        .map(|req| (req.key.clone(), req))
        .collect();

    let mut merged: Vec<Requirement> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for line in inferred {
        let Some(mut req) = Requirement::parse(line) else {
            continue;
        };
        if !req.versioned {
            if let Some(pin) = pins.get(&req.key) {
                req = pin.clone();
            }
        }
        match positions.get(&req.key) {
            Some(&index) => merged[index] = req,
            None => {
                positions.insert(req.key.clone(), merged.len());
                merged.push(req);
            }
        }
    }

    merged.into_iter().map(|req| req.line).collect()
}
