//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::llm::LiveLlmClient;
use crate::adapters::live::shell::LiveShellExecutor;
use crate::adapters::recording::{RecordingFileSystem, RecordingLlmClient, RecordingShellExecutor};
use crate::adapters::replaying::{ReplayingFileSystem, ReplayingLlmClient, ReplayingShellExecutor};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::LlmClient;
use crate::ports::shell::ShellExecutor;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Filesystem for traversal and artifact I/O.
    pub fs: Box<dyn FileSystem>,
    /// Shell executor for the environment snapshot.
    pub shell: Box<dyn ShellExecutor>,
    /// LLM client for text generation.
    pub llm: Box<dyn LlmClient>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(
        fs: Box<dyn FileSystem>,
        shell: Box<dyn ShellExecutor>,
        llm: Box<dyn LlmClient>,
    ) -> Self {
        Self { fs, shell, llm }
    }

    /// Creates a live context; the LLM client reads its settings from `config_dir`.
    #[must_use]
    pub fn live(config_dir: &Path) -> Self {
        Self::new(
            Box::new(LiveFileSystem),
            Box::new(LiveShellExecutor),
            Box::new(LiveLlmClient::new(config_dir)),
        )
    }

    /// Creates a context whose live adapters record into `session`.
    ///
    /// Drop the context before calling [`RecordingSession::finish`] so the
    /// recorders are no longer shared.
    #[must_use]
    pub fn recording(session: &RecordingSession, config_dir: &Path) -> Self {
        let live = Self::live(config_dir);
        Self::new(
            Box::new(RecordingFileSystem::new(live.fs, Arc::clone(&session.fs))),
            Box::new(RecordingShellExecutor::new(live.shell, Arc::clone(&session.shell))),
            Box::new(RecordingLlmClient::new(live.llm, Arc::clone(&session.llm))),
        )
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Each port gets its own replayer over the same cassette so that
    /// per-port cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let config = CassetteConfig {
            llm: Some(path.to_path_buf()),
            fs: Some(path.to_path_buf()),
            shell: Some(path.to_path_buf()),
        };
        Self::replaying_from(&config)
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a cassette panic with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        let fs =
            replayers.fs.map_or_else(ReplayingFileSystem::unconfigured, ReplayingFileSystem::new);
        let shell = replayers
            .shell
            .map_or_else(ReplayingShellExecutor::unconfigured, ReplayingShellExecutor::new);
        let llm =
            replayers.llm.map_or_else(ReplayingLlmClient::unconfigured, ReplayingLlmClient::new);
        Ok(Self::new(Box::new(fs), Box::new(shell), Box::new(llm)))
    }

    /// Live filesystem with replayed shell and LLM collaborators.
    ///
    /// This is the usual shape for exercising the orchestrator against a
    /// real directory tree.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn replaying_collaborators(config: &CassetteConfig) -> Result<Self, String> {
        let mut ctx = Self::replaying_from(config)?;
        ctx.fs = Box::new(LiveFileSystem);
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        cassette.save(path).unwrap();
    }

    #[test]
    fn replaying_monolithic_cassette_serves_every_port() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all.cassette.yaml");
        write_cassette(
            &path,
            vec![
                Interaction {
                    seq: 0,
                    port: "fs".into(),
                    method: "exists".into(),
                    input: json!({"path": "/project"}),
                    output: json!(true),
                },
                Interaction {
                    seq: 1,
                    port: "shell".into(),
                    method: "run".into(),
                    input: json!({"command": "pip freeze"}),
                    output: json!({"ok": {"exit_code": 0, "stdout": "rich==13.7.0\n", "stderr": ""}}),
                },
            ],
        );

        let ctx = ServiceContext::replaying(&path).unwrap();

        assert!(ctx.fs.exists(Path::new("/project")));
        assert_eq!(ctx.shell.run("pip freeze").unwrap().stdout, "rich==13.7.0\n");
    }

    #[test]
    #[should_panic(expected = "not configured in CassetteConfig")]
    fn unspecified_port_panics_with_clear_message() {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::panic_on_unspecified()).unwrap();
        let _ = ctx.shell.run("pip freeze");
    }

    #[test]
    fn replaying_collaborators_uses_real_disk() {
        let dir = tempfile::tempdir().unwrap();
        let ctx =
            ServiceContext::replaying_collaborators(&CassetteConfig::panic_on_unspecified()).unwrap();
        assert!(ctx.fs.exists(dir.path()));
    }
}
