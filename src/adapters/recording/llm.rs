//! Recording adapter for the `LlmClient` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{CompletionFuture, CompletionRequest, LlmClient};

/// Records LLM interactions while delegating to an inner implementation.
pub struct RecordingLlmClient {
    inner: Box<dyn LlmClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingLlmClient {
    /// Creates a new recording LLM client wrapping the given implementation.
    pub fn new(inner: Box<dyn LlmClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl LlmClient for RecordingLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.complete(&request).await;
            record_result(&recorder, "llm", "complete", &request, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::ReplayingLlmClient;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;
    use crate::ports::Message;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn records_completion_with_messages() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("llm.cassette.yaml");

        let source = Cassette {
            name: "source".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "llm".into(),
                method: "complete".into(),
                input: json!({}),
                output: json!({"ok": {"text": "described"}}),
            }],
        };
        let inner = ReplayingLlmClient::new(Arc::new(Mutex::new(CassetteReplayer::new(&source))));
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test", "abc")));

        {
            let client = RecordingLlmClient::new(Box::new(inner), Arc::clone(&recorder));
            let request = CompletionRequest {
                model: "gpt-4o".into(),
                messages: vec![Message::system("Describe this script."), Message::user("print(1)")],
                max_tokens: None,
            };
            let response = client.complete(&request).await.unwrap();
            assert_eq!(response.text, "described");
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&cassette_path).unwrap();
        let cassette: Cassette = serde_yaml::from_str(&content).unwrap();
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].input["messages"][1]["content"], "print(1)");
        assert_eq!(cassette.interactions[0].output["ok"]["text"], "described");
    }
}
