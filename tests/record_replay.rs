//! Record-replay integration tests over the full generation pipeline.
//!
//! 1. Hand-build shell and LLM cassettes and run `deps` + `readme` against a
//!    real project directory with replayed collaborators.
//! 2. Record a run through a `RecordingSession`, then replay every port from
//!    the session directory and assert identical results.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;

use autoreadme::adapters::live::filesystem::LiveFileSystem;
use autoreadme::adapters::recording::{
    RecordingFileSystem, RecordingLlmClient, RecordingShellExecutor,
};
use autoreadme::adapters::replaying::{ReplayingLlmClient, ReplayingShellExecutor};
use autoreadme::cassette::config::CassetteConfig;
use autoreadme::cassette::format::Cassette;
use autoreadme::cassette::recorder::CassetteRecorder;
use autoreadme::cassette::session::RecordingSession;
use autoreadme::config::ProjectConfig;
use autoreadme::context::ServiceContext;
use autoreadme::readme::{
    ReadmeGenerator, DESCRIPTIONS_FILE, ENVIRONMENT_FILE, PROJECT_STRUCTURE_FILE, README_FILE,
    REQUIREMENTS_FILE,
};

const FREEZE: &str = "requests==2.31.0\nrich==13.7.0\nsix==1.16.0\n";

/// Lays out a small project and returns its root.
fn sample_project(base: &Path) -> PathBuf {
    let root = base.join("project");
    let files = [
        (".gitignore", "# local\nbuild/\n*.log\n"),
        ("app/main.py", "import requests\nfrom rich import print\n\nprint('hi')\n"),
        ("app/config/defaults.json", "{\"retries\": 3}\n"),
        ("scripts/run.sh", "python -m app.main\n"),
        ("build/generated.py", "import never_seen\n"),
        ("debug.log", "noise\n"),
        ("README", "old notes\n"),
    ];
    for (relative, content) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    root
}

/// Writes shell and LLM cassettes the way a recording session would.
fn write_collaborator_cassettes(dir: &Path) -> CassetteConfig {
    let shell_path = dir.join("shell.cassette.yaml");
    let mut shell = CassetteRecorder::new(&shell_path, "pipeline-shell", "abc123");
    shell.record(
        "shell",
        "run",
        json!({"command": "pip freeze"}),
        json!({"ok": {"exit_code": 0, "stdout": FREEZE, "stderr": ""}}),
    );
    shell.finish().unwrap();

    let llm_path = dir.join("llm.cassette.yaml");
    let mut llm = CassetteRecorder::new(&llm_path, "pipeline-llm", "abc123");
    let replies = [
        "```json {\"requirements\": [\"requests\", \"rich==13.6.0\"]} ```",
        "Default settings for the app.",
        "Entry point; prints a greeting.",
        "Launches the app module.",
        "# Sample\n\nGenerated README.\n",
    ];
    for reply in replies {
        llm.record("llm", "complete", json!({}), json!({"ok": {"text": reply}}));
    }
    llm.finish().unwrap();

    CassetteConfig { llm: Some(llm_path), fs: None, shell: Some(shell_path) }
}

fn config_for(root: &Path, output_dir: PathBuf) -> ProjectConfig {
    let mut config = ProjectConfig::new("sample", root, "Ada");
    config.description = Some("A sample project.".into());
    config.output_dir = output_dir;
    config
}

#[tokio::test]
async fn pipeline_writes_all_artifacts_from_replayed_collaborators() {
    let dir = tempfile::tempdir().unwrap();
    let root = sample_project(dir.path());
    let cassettes = write_collaborator_cassettes(dir.path());
    let config = config_for(&root, dir.path().join("out"));
    let ctx = ServiceContext::replaying_collaborators(&cassettes).unwrap();

    let generator = ReadmeGenerator::new(&ctx, &config);
    let artifacts = generator.generate_dependency().await.unwrap();
    let readme = generator.generate_readme().await.unwrap();

    let read = |name: &str| fs::read_to_string(config.artifact(name)).unwrap();
    assert_eq!(
        read(PROJECT_STRUCTURE_FILE),
        [
            "- README",
            "- **app/**",
            "  - **config/**",
            "    - defaults.json",
            "  - main.py",
            "- **build/**",
            "- **scripts/**",
            "  - run.sh",
        ]
        .join("\n")
    );
    assert_eq!(read(ENVIRONMENT_FILE), FREEZE);
    assert_eq!(read(REQUIREMENTS_FILE), "requests==2.31.0\nrich==13.6.0");

    let relative: Vec<&str> = artifacts.relevant.iter().map(|f| f.relative.as_str()).collect();
    assert_eq!(relative, ["app/config/defaults.json", "app/main.py", "scripts/run.sh"]);

    let descriptions: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&read(DESCRIPTIONS_FILE)).unwrap();
    assert_eq!(descriptions.len(), 3);
    let main = artifacts.relevant[1].path.display().to_string();
    assert_eq!(descriptions[&main], "Entry point; prints a greeting.");

    assert_eq!(readme, Some(config.artifact(README_FILE)));
    assert_eq!(read(README_FILE), "# Sample\n\nGenerated README.\n");
}

#[tokio::test]
async fn recorded_session_replays_identically() {
    let dir = tempfile::tempdir().unwrap();
    let root = sample_project(dir.path());
    let collaborators = write_collaborator_cassettes(dir.path());
    let session = RecordingSession::new(&dir.path().join("cassettes"), &root).unwrap();
    let session_dir = session.output_dir().to_path_buf();

    // Record: real disk, replayed collaborators, every call captured.
    let recorded = {
        let replayers = collaborators.load_all().unwrap();
        let ctx = ServiceContext::new(
            Box::new(RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&session.fs))),
            Box::new(RecordingShellExecutor::new(
                Box::new(ReplayingShellExecutor::new(replayers.shell.unwrap())),
                Arc::clone(&session.shell),
            )),
            Box::new(RecordingLlmClient::new(
                Box::new(ReplayingLlmClient::new(replayers.llm.unwrap())),
                Arc::clone(&session.llm),
            )),
        );
        let config = config_for(&root, dir.path().join("recorded"));
        ReadmeGenerator::new(&ctx, &config).generate_dependency().await.unwrap()
    };
    session.finish().unwrap();

    let fs_cassette = Cassette::load(&session_dir.join("fs.cassette.yaml")).unwrap();
    assert!(fs_cassette.interactions.iter().any(|i| i.method == "read_dir"));

    // Replay every port, then once more to check determinism.
    for _ in 0..2 {
        let config = CassetteConfig::from_session_dir(&session_dir);
        let ctx = ServiceContext::replaying_from(&config).unwrap();
        let replay_config = config_for(&root, dir.path().join("recorded"));

        let replayed =
            ReadmeGenerator::new(&ctx, &replay_config).generate_dependency().await.unwrap();

        assert_eq!(replayed.structure, recorded.structure);
        assert_eq!(replayed.relevant, recorded.relevant);
        assert_eq!(replayed.requirements, recorded.requirements);
        assert_eq!(replayed.descriptions, recorded.descriptions);
    }
}
