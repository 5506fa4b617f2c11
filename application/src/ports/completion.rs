//! Text-completion port
//!
//! Defines how the orchestration engine talks to completion providers.
//! Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use colloquy_domain::ModelId;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during completion operations
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Missing credentials for provider '{0}'")]
    MissingCredentials(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
}

/// Generation parameters passed with every request
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// An event in a streaming completion response
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A text fragment from the model
    Delta(String),
    /// The complete response text (signals stream end)
    Completed(String),
    /// An error that occurred mid-stream
    Error(String),
}

/// Handle for receiving streaming events from a completion call.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`; the stream is consumed exactly
/// once and terminates naturally when the underlying model finishes.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, CompletionError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(CompletionError::StreamInterrupted(e));
                }
            }
        }
        // Channel closed without a Completed event; return what we have
        Ok(full_text)
    }
}

/// A text-completion client bound to one model
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// The model this client is bound to
    fn model(&self) -> &ModelId;

    /// Generate a full response in one call (consensus probes, summaries)
    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, CompletionError>;

    /// Generate a streaming response (expert turns).
    ///
    /// Default implementation calls `generate()` and wraps the result in a
    /// single `Completed` event, so non-streaming adapters work unchanged.
    async fn generate_streaming(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<StreamHandle, CompletionError> {
        let result = self.generate(prompt, params).await?;
        let (tx, rx) = mpsc::channel(1);
        let _ = tx.send(StreamEvent::Completed(result)).await;
        Ok(StreamHandle::new(rx))
    }
}

/// Creates completion clients per model.
///
/// Implementations must validate their configuration (credentials, provider
/// name) at construction time so a broken setup fails before any discussion
/// event is emitted, never mid-stream.
pub trait CompletionFactory: Send + Sync {
    fn create(&self, model: &ModelId) -> Result<Arc<dyn CompletionClient>, CompletionError>;
}
