//! HTTP completion client for OpenAI-compatible chat-completions APIs
//!
//! Covers both OpenRouter and OpenAI: same request shape, same SSE stream
//! framing, different base URL and credentials. One client instance is
//! bound to one model.

use colloquy_application::ports::completion::{
    CompletionClient, CompletionError, GenerationParams, StreamEvent, StreamHandle,
};
use colloquy_domain::ModelId;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Channel capacity for streamed fragments
const STREAM_BUFFER: usize = 32;

/// Non-streaming chat completion response (the parts we read)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// One SSE chunk of a streaming response
#[derive(Debug, Deserialize)]
struct ChatChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Debug, Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Completion client speaking the OpenAI chat-completions protocol
pub struct HttpCompletionClient {
    http: reqwest::Client,
    model: ModelId,
    base_url: String,
    api_key: String,
    /// Generate-level retries for the non-streaming path only
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpCompletionClient {
    pub fn new(
        http: reqwest::Client,
        model: ModelId,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            http,
            model,
            base_url: base_url.into(),
            api_key: api_key.into(),
            max_retries,
            retry_delay,
        }
    }

    fn request_body(&self, prompt: &str, params: GenerationParams, stream: bool) -> serde_json::Value {
        json!({
            "model": self.model.as_str(),
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "stream": stream,
        })
    }

    async fn post_completion(
        &self,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, CompletionError> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| CompletionError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CompletionError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                detail
            )));
        }
        Ok(response)
    }

    async fn generate_once(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, CompletionError> {
        let body = self.request_body(prompt, params, false);
        let response = self.post_completion(&body).await?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::RequestFailed(format!("malformed response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CompletionError::RequestFailed("response had no choices".to_string()))
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    fn model(&self) -> &ModelId {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, CompletionError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.retry_delay).await;
            }
            match self.generate_once(prompt, params).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!(model = %self.model, attempt, "generate failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            CompletionError::RequestFailed("generate produced no attempts".to_string())
        }))
    }

    async fn generate_streaming(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<StreamHandle, CompletionError> {
        let body = self.request_body(prompt, params, true);
        let response = self.post_completion(&body).await?;

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let model = self.model.clone();

        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut lines = SseLineBuffer::new();
            let mut full_text = String::new();

            while let Some(chunk) = byte_stream.next().await {
                let chunk = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                };

                for line in lines.push(&chunk) {
                    let Some(data) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    if data.trim() == "[DONE]" {
                        let _ = tx.send(StreamEvent::Completed(full_text)).await;
                        return;
                    }
                    match serde_json::from_str::<ChatChunk>(data) {
                        Ok(parsed) => {
                            if let Some(content) = parsed
                                .choices
                                .into_iter()
                                .next()
                                .and_then(|c| c.delta.content)
                            {
                                if !content.is_empty() {
                                    full_text.push_str(&content);
                                    if tx.send(StreamEvent::Delta(content)).await.is_err() {
                                        // Receiver gone; stop requesting fragments
                                        return;
                                    }
                                }
                            }
                        }
                        Err(e) => {
                            debug!(model = %model, "skipping malformed SSE chunk: {}", e);
                        }
                    }
                }
            }

            // Stream ended without [DONE]; report what we have
            let _ = tx.send(StreamEvent::Completed(full_text)).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

/// Reassembles SSE lines from arbitrary byte chunks.
///
/// SSE events are newline-delimited but network chunks split anywhere;
/// this keeps the trailing partial line buffered until it completes.
struct SseLineBuffer {
    pending: String,
}

impl SseLineBuffer {
    fn new() -> Self {
        Self {
            pending: String::new(),
        }
    }

    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.push_str(&String::from_utf8_lossy(bytes));

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let line = self.pending[..pos].trim_end_matches('\r').to_string();
            self.pending.drain(..=pos);
            if !line.is_empty() {
                lines.push(line);
            }
        }
        lines
    }
}
