//! Command dispatch and handlers.

pub mod deps;
pub mod generate;
pub mod readme;
pub mod tree;

use std::env;
use std::path::PathBuf;

use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::ProjectConfig;
use crate::context::ServiceContext;
use crate::error::Error;

/// Environment variable naming a directory to record port interactions into.
pub const RECORD_ENV: &str = "AUTOREADME_RECORD";

/// Dispatch a parsed command line to its handler.
///
/// When `AUTOREADME_RECORD` is set to a directory path, all port
/// interactions are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = ProjectConfig::from_args(&cli.project);
    let command = cli.command.unwrap_or(Command::Generate);

    let (ctx, session) = if let Ok(path) = env::var(RECORD_ENV) {
        let session = RecordingSession::new(&PathBuf::from(path), &config.project_dir)?;
        (ServiceContext::recording(&session, &config.config_dir), Some(session))
    } else {
        (ServiceContext::live(&config.config_dir), None)
    };

    let result = dispatch_with_context(command, &ctx, &config);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the handler fails.
pub fn dispatch_with_context(
    command: Command,
    ctx: &ServiceContext,
    config: &ProjectConfig,
) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()).to_string())?;

    let result = match command {
        Command::Generate => runtime.block_on(generate::run(ctx, config)),
        Command::Deps => runtime.block_on(deps::run(ctx, config)),
        Command::Readme => runtime.block_on(readme::run(ctx, config)),
        Command::Tree => tree::run(ctx, config),
    };
    result.map_err(|e| e.to_string())
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::config::CassetteConfig;

    fn offline() -> ServiceContext {
        ServiceContext::replaying_collaborators(&CassetteConfig::panic_on_unspecified()).unwrap()
    }

    #[test]
    fn readme_without_artifacts_succeeds_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ProjectConfig::new("demo", dir.path(), "Ada");
        config.output_dir = dir.path().join("out");

        assert!(dispatch_with_context(Command::Readme, &offline(), &config).is_ok());
        assert!(!config.output_dir.join("README.md").exists());
    }

    #[test]
    fn handler_errors_become_messages() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig::new("demo", dir.path().join("missing"), "Ada");

        let err = dispatch_with_context(Command::Tree, &offline(), &config).unwrap_err();

        assert!(err.contains("does not exist"), "{err}");
    }
}
