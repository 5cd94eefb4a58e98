//! Run configuration: project metadata and text-generation settings.

use std::env;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::cli::ProjectArgs;
use crate::ports::FileSystem;

/// Model used when none is given on the command line.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Command used to capture the environment snapshot.
pub const DEFAULT_FREEZE_COMMAND: &str = "pip freeze";

/// Name of the settings file looked up inside the configuration directory.
pub const LLM_CONFIG_FILE: &str = "llm_config.json";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Language of the generated prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Chinese.
    Cn,
}

impl Language {
    /// Suffix appended to every system instruction.
    #[must_use]
    pub fn instruction_suffix(self) -> &'static str {
        match self {
            Self::En => "",
            Self::Cn => "用中文回答。",
        }
    }
}

/// Everything one run needs to know about the target project.
///
/// Built once from CLI arguments and passed by reference; nothing reads
/// these values from ambient state.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    /// Display name of the project.
    pub project_name: String,
    /// Root of the tree to scan.
    pub project_dir: PathBuf,
    /// Project author.
    pub author: String,
    /// Optional author contact details.
    pub author_info: Option<String>,
    /// Model identifier passed to the text-generation collaborator.
    pub model: String,
    /// Directory receiving every artifact.
    pub output_dir: PathBuf,
    /// Optional one-line project description.
    pub description: Option<String>,
    /// Directory holding `llm_config.json`.
    pub config_dir: PathBuf,
    /// Language of generated prose.
    pub language: Language,
    /// Shell command producing the `name==version` environment listing.
    pub freeze_command: String,
}

impl ProjectConfig {
    /// Creates a config with every optional setting at its default.
    pub fn new(
        project_name: impl Into<String>,
        project_dir: impl Into<PathBuf>,
        author: impl Into<String>,
    ) -> Self {
        let project_name = project_name.into();
        let output_dir = default_output_dir(&project_name);
        Self {
            project_name,
            project_dir: project_dir.into(),
            author: author.into(),
            author_info: None,
            model: DEFAULT_MODEL.to_string(),
            output_dir,
            description: None,
            config_dir: PathBuf::from("config"),
            language: Language::default(),
            freeze_command: DEFAULT_FREEZE_COMMAND.to_string(),
        }
    }

    /// Builds the config from parsed command-line arguments.
    #[must_use]
    pub fn from_args(args: &ProjectArgs) -> Self {
        let mut config =
            Self::new(args.project_name.clone(), args.project_dir.clone(), args.author.clone());
        config.author_info.clone_from(&args.author_info);
        config.description.clone_from(&args.project_description);
        config.language = args.language;
        if let Some(model) = &args.model_name {
            config.model.clone_from(model);
        }
        if let Some(dir) = &args.output_dir {
            config.output_dir.clone_from(dir);
        }
        if let Some(dir) = &args.config_dir {
            config.config_dir.clone_from(dir);
        }
        if let Some(command) = &args.freeze_command {
            config.freeze_command.clone_from(command);
        }
        config
    }

    /// Path of an artifact inside the output directory.
    #[must_use]
    pub fn artifact(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// `output/<project_name>` relative to the working directory.
fn default_output_dir(project_name: &str) -> PathBuf {
    Path::new("output").join(project_name)
}

/// Contents of `llm_config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// OpenAI-compatible endpoint settings.
    #[serde(rename = "OPENAI_CONFIG")]
    pub openai: OpenAiSettings,
}

/// The `OPENAI_CONFIG` block.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    /// Candidate key/base pairs; the first one is used.
    #[serde(rename = "OPENAI_KEYS_BASES", default)]
    pub keys_bases: Vec<KeyBase>,
    /// Default completion budget.
    #[serde(rename = "OPENAI_MAX_TOKENS", default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature.
    #[serde(rename = "OPENAI_TEMPERATURE", default = "default_temperature")]
    pub temperature: f32,
}

/// One API key with its base URL.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyBase {
    /// API key.
    #[serde(rename = "OPENAI_KEY")]
    pub key: String,
    /// Base URL; the public endpoint when absent.
    #[serde(rename = "OPENAI_BASE", default)]
    pub base: Option<String>,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

/// A fully resolved chat-completions endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmEndpoint {
    /// Bearer token.
    pub api_key: String,
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    /// Default completion budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl LlmSettings {
    /// Parses the settings file contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the expected layout.
    pub fn parse(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| format!("malformed {LLM_CONFIG_FILE}: {e}"))
    }

    /// Turns the settings into an endpoint using the first key/base pair.
    ///
    /// # Errors
    ///
    /// Returns an error if no key is configured.
    pub fn endpoint(&self) -> Result<LlmEndpoint, String> {
        let first = self
            .openai
            .keys_bases
            .first()
            .ok_or_else(|| format!("{LLM_CONFIG_FILE} has no OPENAI_KEYS_BASES entry"))?;
        Ok(LlmEndpoint {
            api_key: first.key.clone(),
            base_url: first.base.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_tokens: self.openai.max_tokens,
            temperature: self.openai.temperature,
        })
    }
}

/// Resolves the endpoint from `<config_dir>/llm_config.json` read through
/// `fs`, falling back to `OPENAI_API_KEY` / `OPENAI_BASE_URL` when the file
/// is absent.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed, or if neither
/// the file nor the environment provides an API key.
pub fn resolve_endpoint(fs: &dyn FileSystem, config_dir: &Path) -> Result<LlmEndpoint, String> {
    let path = config_dir.join(LLM_CONFIG_FILE);
    if fs.exists(&path) {
        let content = fs
            .read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        return LlmSettings::parse(&content)?.endpoint();
    }

    let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
        format!("{} not found and OPENAI_API_KEY environment variable not set", path.display())
    })?;
    let base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    Ok(LlmEndpoint {
        api_key,
        base_url,
        max_tokens: DEFAULT_MAX_TOKENS,
        temperature: DEFAULT_TEMPERATURE,
    })
}
