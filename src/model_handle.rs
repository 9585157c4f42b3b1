//! Long-lived handle to one Gemini model.
//!
//! A [`ModelHandle`] only exists once the startup probe against its model has
//! succeeded, so holding one means the service and credentials were usable at
//! startup.  The chat session and the context replay talk to it through the
//! [`Completion`] trait.

use std::fmt;
use std::time::{Duration, Instant};

use crate::client::Gemini;
use crate::error::Result;
use crate::observability::{PROBE_FAILURES, PROBE_LATENCY};
use crate::types::{Content, GenerateContentRequest, GenerationConfig, Model};

/// Text sent by the startup probe.
pub const PROBE_PROMPT: &str = "Connection test";

/// Upper bound on the startup probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// A backend that answers a conversation.
#[async_trait::async_trait]
pub trait Completion: Send + Sync {
    /// Generate the model's reply to `contents`.
    ///
    /// The last entry of `contents` is the user message being answered.
    async fn generate(&self, contents: &[Content]) -> Result<String>;
}

/// Connectivity status shown at startup and by `/status`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionStatus {
    /// The model the handle talks to.
    pub model: Model,
    /// Round-trip time of the startup probe.
    pub latency: Duration,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Connected to {} (Latency: {:.2}s)",
            self.model,
            self.latency.as_secs_f64()
        )
    }
}

/// An initialized handle to the completion service.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    client: Gemini,
    model: Model,
    generation_config: GenerationConfig,
    status: ConnectionStatus,
}

impl ModelHandle {
    /// Probe `model` and return a handle to it.
    ///
    /// The probe is a one-message `generateContent` call bounded by
    /// `probe_timeout`.  Only `model` is tried.
    ///
    /// # Errors
    ///
    /// Returns the probe's error when the key is rejected, the model is
    /// unknown, the service is unreachable or the probe times out.
    pub async fn initialize(client: Gemini, model: Model, probe_timeout: Duration) -> Result<Self> {
        let request = GenerateContentRequest::new(vec![Content::user(PROBE_PROMPT)]);
        let start = Instant::now();
        if let Err(err) = client
            .generate_content(&model, &request, Some(probe_timeout))
            .await
        {
            PROBE_FAILURES.click();
            tracing::warn!(%model, error = %err, "startup probe failed");
            return Err(err);
        }
        let latency = start.elapsed();
        PROBE_LATENCY.add(latency.as_secs_f64());
        tracing::info!(%model, latency_secs = latency.as_secs_f64(), "connected");

        Ok(Self {
            client,
            status: ConnectionStatus {
                model: model.clone(),
                latency,
            },
            model,
            generation_config: GenerationConfig::default(),
        })
    }

    /// Sampling parameters sent with every generation.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = config;
        self
    }

    /// The model this handle talks to.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The status recorded by the startup probe.
    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }
}

#[async_trait::async_trait]
impl Completion for ModelHandle {
    async fn generate(&self, contents: &[Content]) -> Result<String> {
        let request = GenerateContentRequest::new(contents.to_vec())
            .with_generation_config(self.generation_config.clone());
        let response = self
            .client
            .generate_content(&self.model, &request, None)
            .await?;
        response.text()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::types::KnownModel;
    use mockito::Matcher;
    use serde_json::json;

    const PATH: &str = "/models/gemini-1.5-flash-latest:generateContent";

    fn client_for(server: &mockito::ServerGuard) -> Gemini {
        Gemini::with_options(Some("test-key".to_string()), Some(server.url()), None).unwrap()
    }

    fn reply(text: &str) -> String {
        json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn probe_success_yields_handle() {
        let mut server = mockito::Server::new_async().await;
        let probe = server
            .mock("POST", PATH)
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"role": "user", "parts": [{"text": PROBE_PROMPT}]}]
            })))
            .with_status(200)
            .with_body(reply("Connection OK"))
            .expect(1)
            .create_async()
            .await;

        let handle = ModelHandle::initialize(
            client_for(&server),
            Model::Known(KnownModel::Gemini15FlashLatest),
            DEFAULT_PROBE_TIMEOUT,
        )
        .await
        .unwrap();
        probe.assert_async().await;
        assert_eq!(handle.model(), &Model::Known(KnownModel::Gemini15FlashLatest));
        assert!(
            handle
                .status()
                .to_string()
                .starts_with("Connected to gemini-1.5-flash-latest (Latency: ")
        );
    }

    #[tokio::test]
    async fn probe_failure_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _probe = server
            .mock("POST", PATH)
            .with_status(403)
            .with_body(json!({"error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}}).to_string())
            .create_async()
            .await;

        let err = ModelHandle::initialize(
            client_for(&server),
            Model::default(),
            DEFAULT_PROBE_TIMEOUT,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Permission denied"));
    }

    #[tokio::test]
    async fn generate_sends_history_and_config() {
        let mut server = mockito::Server::new_async().await;
        let _probe = server
            .mock("POST", PATH)
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"role": "user", "parts": [{"text": PROBE_PROMPT}]}]
            })))
            .with_body(reply("ok"))
            .create_async()
            .await;
        let turn = server
            .mock("POST", PATH)
            .match_body(Matcher::PartialJson(json!({
                "contents": [
                    {"role": "model", "parts": [{"text": "Hello!"}]},
                    {"role": "user", "parts": [{"text": "Hi"}]}
                ],
                "generationConfig": {"temperature": 0.25}
            })))
            .with_body(reply("Hi yourself"))
            .expect(1)
            .create_async()
            .await;

        let handle = ModelHandle::initialize(
            client_for(&server),
            Model::default(),
            DEFAULT_PROBE_TIMEOUT,
        )
        .await
        .unwrap()
        .with_generation_config(GenerationConfig {
            temperature: Some(0.25),
            ..GenerationConfig::default()
        });

        let text = handle
            .generate(&[Content::model("Hello!"), Content::user("Hi")])
            .await
            .unwrap();
        assert_eq!(text, "Hi yourself");
        turn.assert_async().await;
    }

    #[tokio::test]
    async fn probe_gives_up_after_timeout() {
        let mut server = mockito::Server::new_async().await;
        let _probe = server
            .mock("POST", PATH)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(3));
                w.write_all(reply("too late").as_bytes())
            })
            .create_async()
            .await;

        let start = Instant::now();
        let err = ModelHandle::initialize(
            client_for(&server),
            Model::default(),
            Duration::from_millis(300),
        )
        .await
        .unwrap_err();
        let elapsed = start.elapsed();
        assert!(err.is_timeout(), "{err:?}");
        assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    }

    #[test]
    fn status_display() {
        let status = ConnectionStatus {
            model: Model::Known(KnownModel::Gemini25Flash),
            latency: Duration::from_millis(1234),
        };
        assert_eq!(
            status.to_string(),
            "Connected to gemini-2.5-flash (Latency: 1.23s)"
        );
    }
}
