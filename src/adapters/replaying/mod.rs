//! Replaying adapters that serve recorded interactions.

pub mod filesystem;
pub mod llm;
pub mod shell;

pub use filesystem::ReplayingFileSystem;
pub use llm::ReplayingLlmClient;
pub use shell::ReplayingShellExecutor;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

/// Take the next recorded output for `port::method`.
///
/// # Panics
///
/// Panics if the port has no cassette configured or the cassette is exhausted.
pub(crate) fn next_output(
    replayer: Option<&Arc<Mutex<CassetteReplayer>>>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let replayer = replayer.unwrap_or_else(|| {
        panic!("Port {port:?} called ({method}) but not configured in CassetteConfig")
    });
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output.clone()
}

/// Decode a recorded `Result` using the `{"ok": v}` / `{"err": "msg"}` convention.
///
/// A bare value without either key is treated as `ok`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").cloned().unwrap_or(output);
    serde_json::from_value(value).map_err(|e| format!("failed to deserialize replay: {e}").into())
}
