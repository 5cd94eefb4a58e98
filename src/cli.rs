//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Language;

/// Top-level CLI parser for `autoreadme`.
#[derive(Debug, Parser)]
#[command(
    name = "autoreadme",
    version,
    about = "Generate a README and its supporting artifacts for a project"
)]
pub struct Cli {
    /// Project metadata and run settings.
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute; `generate` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Name of the project.
    #[arg(long, global = true, default_value = "project")]
    pub project_name: String,

    /// Directory of the project.
    #[arg(long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Author of the project.
    #[arg(long, global = true, default_value = "")]
    pub author: String,

    /// Author contact details (email, phone, ...).
    #[arg(long, global = true)]
    pub author_info: Option<String>,

    /// Model identifier for text generation.
    #[arg(long, global = true)]
    pub model_name: Option<String>,

    /// Directory for generated artifacts [default: output/<project-name>].
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Short description of the project.
    #[arg(long, global = true)]
    pub project_description: Option<String>,

    /// Directory holding `llm_config.json` [default: config].
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Language of the generated prose.
    #[arg(long, global = true, value_enum, default_value_t = Language::En)]
    pub language: Language,

    /// Command listing installed packages as `name==version` [default: pip freeze].
    #[arg(long, global = true)]
    pub freeze_command: Option<String>,
}

/// Supported top-level subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Write the dependency artifacts, then the README.
    Generate,
    /// Write the project structure, requirements and file descriptions.
    Deps,
    /// Write the README from existing dependency artifacts.
    Readme,
    /// Print the project structure without writing anything.
    Tree,
}
