use std::time::Instant;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::config::{DEFAULT_GROQ_MODEL, DEFAULT_GROQ_URL, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

use super::{LLMError, StreamChunk, LLM};

/// OpenAI-compatible API client.
///
/// Works with any provider that implements the OpenAI chat completions API:
/// - Groq (default for Career Compass)
/// - OpenAI
/// - Ollama (http://localhost:11434/v1)
/// - vLLM, llama.cpp, OpenRouter, Together AI
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    client: Client,
}

impl OpenAIClient {
    /// Creates a new OpenAI-compatible client.
    ///
    /// # Arguments
    /// * `base_url` - The API base URL (e.g., "https://api.groq.com/openai/v1")
    /// * `api_key` - The API key (can be empty for local providers like Ollama)
    /// * `model` - The model name (e.g., "llama3-8b-8192", "gpt-4o-mini")
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            client: Client::new(),
        }
    }

    /// Creates a client for Groq with the default model.
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::new(DEFAULT_GROQ_URL, api_key, DEFAULT_GROQ_MODEL)
    }

    /// Creates a client for Ollama (local).
    pub fn ollama(model: impl Into<String>) -> Self {
        Self::new("http://localhost:11434/v1", "", model)
    }

    /// Sets the maximum tokens for responses.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, system: Option<&str>, prompt: &str, stream: bool) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);

        if let Some(sys) = system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: sys.to_string(),
            });
        }

        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
            stream: stream.then_some(true),
        }
    }

    /// Posts a chat request and maps error statuses.
    async fn post(&self, request: &ChatRequest) -> Result<reqwest::Response, LLMError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut req = self.client
            .post(&url)
            .header("content-type", "application/json");

        // Only add authorization if api_key is not empty
        if !self.api_key.is_empty() {
            req = req.header("authorization", format!("Bearer {}", self.api_key));
        }

        let response = req.json(request).send().await?;
        let status = response.status();

        if status == 429 {
            tracing::warn!(model = %self.model, "llm.rate_limited");
            return Err(LLMError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.model, status = status.as_u16(), "llm.api_error");
            return Err(LLMError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        Ok(response)
    }

    async fn send_request(&self, request: &ChatRequest) -> Result<String, LLMError> {
        let started = Instant::now();
        let response = self.post(request).await?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        tracing::debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = content.len(),
            "llm.complete"
        );

        Ok(content)
    }

    /// Send a streaming request and forward chunks through the channel.
    async fn send_streaming_request(
        &self,
        request: &ChatRequest,
        tx: mpsc::UnboundedSender<StreamChunk>,
    ) -> Result<(), LLMError> {
        let response = self.post(request).await?;

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut finished = false;

        'events: while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| LLMError::Network(e.to_string()))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk).replace("\r\n", "\n"));

            while let Some(pos) = buffer.find("\n\n") {
                let event_data = buffer[..pos].to_string();
                buffer = buffer[pos + 2..].to_string();

                match parse_sse_event(&event_data) {
                    SseEvent::Text(text) => {
                        let _ = tx.send(StreamChunk::text(text));
                    }
                    SseEvent::Done => {
                        finished = true;
                        break 'events;
                    }
                    SseEvent::Skip => {}
                }
            }
        }

        // Servers may close without a trailing blank line.
        if !finished {
            if let SseEvent::Text(text) = parse_sse_event(&buffer) {
                let _ = tx.send(StreamChunk::text(text));
            }
        }

        let _ = tx.send(StreamChunk::done());
        Ok(())
    }
}

#[async_trait]
impl LLM for OpenAIClient {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        let request = self.build_request(None, prompt, false);
        self.send_request(&request).await
    }

    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, LLMError> {
        let request = self.build_request(Some(system), prompt, false);
        self.send_request(&request).await
    }

    async fn stream_complete(
        &self,
        system: &str,
        prompt: &str,
        tx: mpsc::UnboundedSender<StreamChunk>,
    ) -> Result<(), LLMError> {
        let request = self.build_request(Some(system), prompt, true);
        self.send_streaming_request(&request, tx).await
    }

    fn supports_streaming(&self) -> bool {
        true
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, PartialEq)]
enum SseEvent {
    Text(String),
    Done,
    Skip,
}

/// Parse one OpenAI-style SSE event.
///
/// ```text
/// data: {"choices":[{"index":0,"delta":{"content":"Hello"}}]}
///
/// data: [DONE]
/// ```
fn parse_sse_event(event_data: &str) -> SseEvent {
    #[derive(Deserialize)]
    struct StreamEvent {
        #[serde(default)]
        choices: Vec<StreamChoice>,
    }

    #[derive(Deserialize)]
    struct StreamChoice {
        #[serde(default)]
        delta: Delta,
    }

    #[derive(Deserialize, Default)]
    struct Delta {
        #[serde(default)]
        content: Option<String>,
    }

    let mut text = String::new();

    for line in event_data.lines() {
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();

        if data == "[DONE]" {
            return SseEvent::Done;
        }

        let Ok(event) = serde_json::from_str::<StreamEvent>(data) else {
            continue;
        };

        for choice in event.choices {
            if let Some(content) = choice.delta.content {
                text.push_str(&content);
            }
        }
    }

    if text.is_empty() {
        SseEvent::Skip
    } else {
        SseEvent::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenAIClient::new(
            "https://api.example.com/v1",
            "test-key",
            "gpt-4",
        );
        assert_eq!(client.base_url, "https://api.example.com/v1");
        assert_eq!(client.model, "gpt-4");
        assert_eq!(client.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_groq_client() {
        let client = OpenAIClient::groq("gsk-test");
        assert_eq!(client.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(client.model, "llama3-8b-8192");
        assert_eq!(client.max_tokens, 4096);
    }

    #[test]
    fn test_ollama_client() {
        let client = OpenAIClient::ollama("llama3");
        assert_eq!(client.base_url, "http://localhost:11434/v1");
        assert!(client.api_key.is_empty());
    }

    #[test]
    fn test_url_trailing_slash_removed() {
        let client = OpenAIClient::new("https://api.example.com/v1/", "key", "model");
        assert_eq!(client.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn test_request_carries_sampling_options() {
        let client = OpenAIClient::groq("key").with_temperature(0.2).with_max_tokens(128);
        let request = client.build_request(Some("sys"), "hi", false);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["max_tokens"], 128);
        assert!((json["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert!(json.get("stream").is_none());
    }

    #[test]
    fn test_parse_sse_text() {
        let event = r#"data: {"choices":[{"index":0,"delta":{"content":"Hello"}}]}"#;
        assert_eq!(parse_sse_event(event), SseEvent::Text("Hello".to_string()));
    }

    #[test]
    fn test_parse_sse_done_and_role_only() {
        assert_eq!(parse_sse_event("data: [DONE]"), SseEvent::Done);
        let role_only = r#"data: {"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_sse_event(role_only), SseEvent::Skip);
        assert_eq!(parse_sse_event(": keep-alive"), SseEvent::Skip);
    }
}
