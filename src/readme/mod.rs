//! Artifact generation: dependency inference, per-file descriptions and
//! the README itself.
//!
//! [`ReadmeGenerator::generate_dependency`] walks the project once and writes
//! every intermediate artifact; [`ReadmeGenerator::generate_readme`] reads
//! those back from the output directory and asks for the final README.

pub mod prompts;
pub mod requirements;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;
use tracing::{debug, error, info, warn};

use crate::config::ProjectConfig;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::ports::{CompletionRequest, EntryKind, Message};
use crate::scan::{walk_project, ProjectStructure, RelevantFile};
use requirements::{extract_imports, merge_requirements, parse_requirements, parse_snapshot};

/// Markdown listing of the project tree.
pub const PROJECT_STRUCTURE_FILE: &str = "PROJECT_STRUCTURE.md";
/// Final dependency list, one per line.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";
/// Raw environment snapshot.
pub const ENVIRONMENT_FILE: &str = "requirements_env.txt";
/// Path-to-description map.
pub const DESCRIPTIONS_FILE: &str = "SCRIPT_DESCRIPTION.json";
/// Generated README.
pub const README_FILE: &str = "README.md";

/// Characters of each description shown at either end in the log.
const BRIEF_LEN: usize = 20;

/// Descriptions keyed by absolute file path, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptDescriptions {
    entries: Vec<(String, String)>,
}

impl ScriptDescriptions {
    /// Adds or replaces the description for `path`.
    pub fn insert(&mut self, path: impl Into<String>, description: impl Into<String>) {
        let path = path.into();
        let description = description.into();
        match self.entries.iter_mut().find(|(key, _)| *key == path) {
            Some(entry) => entry.1 = description,
            None => self.entries.push((path, description)),
        }
    }

    /// Description recorded for `path`, if any.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.iter().find(|(key, _)| key == path).map(|(_, value)| value.as_str())
    }

    /// Number of described files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no file was described.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Pretty JSON with four-space indentation; non-ASCII text is kept as is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)
            .map_err(|e| Error::Serialize(format!("{DESCRIPTIONS_FILE}: {e}")))?;
        String::from_utf8(buf).map_err(|e| Error::Serialize(format!("{DESCRIPTIONS_FILE}: {e}")))
    }
}

impl Serialize for ScriptDescriptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(key, value)| (key, value)))
    }
}

/// Everything `generate_dependency` produced, as written to disk.
#[derive(Debug, Clone)]
pub struct DependencyArtifacts {
    /// Rendered project tree.
    pub structure: ProjectStructure,
    /// Files that were described and scanned for imports.
    pub relevant: Vec<RelevantFile>,
    /// Final dependency list.
    pub requirements: Vec<String>,
    /// Per-file descriptions.
    pub descriptions: ScriptDescriptions,
}

/// Drives artifact generation for one project.
pub struct ReadmeGenerator<'a> {
    ctx: &'a ServiceContext,
    config: &'a ProjectConfig,
}

impl<'a> ReadmeGenerator<'a> {
    /// Creates a generator over the given ports and configuration.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a ProjectConfig) -> Self {
        info!(
            "AutoReadme initialized for {}, project directory: {}, author: {}, config directory: {}, model: {}",
            config.project_name,
            config.project_dir.display(),
            config.author,
            config.config_dir.display(),
            config.model
        );
        Self { ctx, config }
    }

    /// Writes the project structure, environment snapshot, requirements and
    /// per-file descriptions to the output directory.
    ///
    /// # Errors
    ///
    /// Fails if the project cannot be walked, the snapshot command fails, a
    /// description request fails, or an artifact cannot be written. A reply
    /// to the requirements request that cannot be parsed is logged and
    /// yields an empty list instead.
    pub async fn generate_dependency(&self) -> Result<DependencyArtifacts> {
        info!("Generating project structure...");
        let (structure, relevant) = walk_project(self.ctx.fs.as_ref(), &self.config.project_dir)?;
        let rendered = structure.render();
        debug!("Project structure:\n{rendered}");
        self.save(PROJECT_STRUCTURE_FILE, &rendered)?;

        let requirements = self.generate_requirements(&relevant).await?;
        debug!("Project requirements:\n{}", requirements.join("\n"));
        self.save(REQUIREMENTS_FILE, &requirements.join("\n"))?;

        let descriptions = self.describe_files(&relevant).await?;
        self.save(DESCRIPTIONS_FILE, &descriptions.to_json()?)?;

        info!("Dependencies have been generated and saved to {}", self.config.output_dir.display());
        Ok(DependencyArtifacts { structure, relevant, requirements, descriptions })
    }

    /// Writes `README.md` from whatever dependency artifacts exist.
    ///
    /// Returns the README path, or `None` when the output directory holds
    /// no inputs; nothing is written in that case.
    ///
    /// # Errors
    ///
    /// Fails if an input cannot be read, the request fails, or the README
    /// cannot be written.
    pub async fn generate_readme(&self) -> Result<Option<PathBuf>> {
        let inputs = self.readme_inputs()?;
        if inputs.is_empty() {
            error!("No dependency files found. Please run `autoreadme deps` first.");
            return Ok(None);
        }

        let messages = prompts::readme_messages(self.config, &inputs);
        let readme = self.complete(messages).await?;
        debug!("***** README *****\n{readme}\n*****");

        let path = self.save(README_FILE, &readme)?;
        info!("README has been generated and saved to {}", path.display());
        Ok(Some(path))
    }

    /// Environment snapshot, import lines and one inference request, merged.
    async fn generate_requirements(&self, relevant: &[RelevantFile]) -> Result<Vec<String>> {
        let snapshot = self.environment_snapshot()?;

        info!("Generating project requirements...");
        let imports = self.collect_imports(relevant)?;
        let messages = prompts::requirements_messages(&imports, &snapshot);

        let inferred = match self.complete(messages).await {
            Ok(reply) => parse_requirements(&reply).unwrap_or_else(|e| {
                error!("Error parsing requirements output: {reply}, {e}");
                Vec::new()
            }),
            Err(e) => {
                error!("Requirements inference failed, continuing without it: {e}");
                Vec::new()
            }
        };
        debug!("Inferred requirements: {inferred:?}");

        Ok(merge_requirements(&inferred, &snapshot))
    }

    fn environment_snapshot(&self) -> Result<Vec<String>> {
        info!("Generating environment requirements...");
        warn!("Please ensure that the environment requirements are accurate and up-to-date!");

        let command = &self.config.freeze_command;
        let output =
            self.ctx.shell.run(command).map_err(|e| Error::Snapshot(format!("`{command}`: {e}")))?;
        if !output.success() {
            return Err(Error::Snapshot(format!(
                "`{command}` exited with status {}: {}",
                output.exit_code,
                output.stderr.trim()
            )));
        }

        let path = self.save(ENVIRONMENT_FILE, &output.stdout)?;
        info!("Environment requirements have been saved to {}", path.display());
        let snapshot = parse_snapshot(&output.stdout);
        debug!("{snapshot:?}");
        Ok(snapshot)
    }

    /// Import lines of every relevant file, first occurrence kept.
    fn collect_imports(&self, relevant: &[RelevantFile]) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut imports = Vec::new();
        for file in relevant {
            debug!("Reading script: {}", file.path.display());
            let content = self.read(&file.path)?;
            for line in extract_imports(&content) {
                if seen.insert(line.to_string()) {
                    imports.push(line.to_string());
                }
            }
        }
        Ok(imports)
    }

    async fn describe_files(&self, relevant: &[RelevantFile]) -> Result<ScriptDescriptions> {
        info!("Generating description of all scripts...");
        let mut descriptions = ScriptDescriptions::default();
        for file in relevant {
            let content = self.read(&file.path)?;
            let messages = prompts::description_messages(&content, self.config.language);
            let description = self.complete(messages).await?;
            debug!("***** description of {} *****\n{description}\n*****", file.path.display());

            let (start, end) = brief(&description);
            info!("Description of {}: {start}...{end}", file.path.display());
            descriptions.insert(file.path.display().to_string(), description);
        }
        Ok(descriptions)
    }

    /// Fixed-order artifacts followed by any README-named files, by name.
    fn readme_inputs(&self) -> Result<Vec<(String, String)>> {
        info!("Reading dependency content");
        let fs = self.ctx.fs.as_ref();
        let output_dir = &self.config.output_dir;

        let mut inputs = Vec::new();
        for name in [PROJECT_STRUCTURE_FILE, REQUIREMENTS_FILE, DESCRIPTIONS_FILE] {
            let path = output_dir.join(name);
            if fs.exists(&path) {
                inputs.push((name.to_string(), self.read(&path)?));
            }
        }

        if fs.exists(output_dir) {
            let entries = fs.read_dir(output_dir).map_err(|e| Error::read(output_dir, e))?;
            for entry in entries {
                if entry.kind == EntryKind::File && entry.name.contains("README") {
                    let content = self.read(&output_dir.join(&entry.name))?;
                    inputs.push((entry.name, content));
                }
            }
        }
        debug!("README inputs: {:?}", inputs.iter().map(|(name, _)| name).collect::<Vec<_>>());
        Ok(inputs)
    }

    async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        let request = CompletionRequest { model: self.config.model.clone(), messages, max_tokens: None };
        debug!("prompt: {:?}", request.messages);
        let response =
            self.ctx.llm.complete(&request).await.map_err(|e| Error::Completion(e.to_string()))?;
        Ok(response.text)
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.ctx.fs.read_to_string(path).map_err(|e| Error::read(path, e))
    }

    fn save(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.config.artifact(name);
        self.ctx.fs.write(&path, contents).map_err(|e| Error::write(&path, e))?;
        info!("Saved to {}", path.display());
        Ok(path)
    }
}

/// First and last few characters of `text`, line breaks removed.
fn brief(text: &str) -> (String, String) {
    let chars: Vec<char> = text.chars().collect();
    let start = chars.iter().take(BRIEF_LEN).filter(|c| **c != '\n').collect();
    let end = chars[chars.len().saturating_sub(BRIEF_LEN)..].iter().filter(|c| **c != '\n').collect();
    (start, end)
}
