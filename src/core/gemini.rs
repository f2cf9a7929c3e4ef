use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info};

use crate::core::generation::TextGenerator;
use crate::error::GenerationError;
use crate::models::GeminiConfig;

/// API key for the Generative Language API.
///
/// Read once at start-up and handed to [`GeminiClient::new`]; `Debug`
/// never prints the key.
#[derive(Clone, Default)]
pub struct ApiCredential(Option<String>);

impl ApiCredential {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        if key.trim().is_empty() {
            Self(None)
        } else {
            Self(Some(key))
        }
    }

    pub fn missing() -> Self {
        Self(None)
    }

    /// Read the key from the named environment variable
    pub fn from_env(var: &str) -> Self {
        match std::env::var(var) {
            Ok(key) => Self::new(key),
            Err(_) => {
                debug!("Environment variable {} is not set", var);
                Self::missing()
            }
        }
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    fn expose(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => write!(f, "ApiCredential(***)"),
            None => write!(f, "ApiCredential(missing)"),
        }
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    credential: ApiCredential,
    stream_to_stdout: bool,
}

/// Request body for generateContent / streamGenerateContent
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Response from generateContent, also the shape of each streamed chunk
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

impl GenerateContentResponse {
    /// Text of the first candidate's parts
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn log_usage(&self) {
        if let Some(usage) = &self.usage_metadata {
            debug!(
                "Gemini usage - prompt: {:?} tokens, response: {:?} tokens, total: {:?} tokens",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }
    }

    /// Reject responses that carry no usable text
    fn into_text(self) -> Result<String, GenerationError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(GenerationError::new(format!("prompt blocked: {}", reason)));
        }
        if self.candidates.is_empty() {
            return Err(GenerationError::new("no candidates in response"));
        }
        self.log_usage();
        let text = self.text();
        if text.is_empty() {
            let reason = self.candidates[0]
                .finish_reason
                .clone()
                .unwrap_or_else(|| "unknown".to_string());
            return Err(GenerationError::new(format!(
                "empty response (finish reason: {})",
                reason
            )));
        }
        Ok(text)
    }
}

/// Payload of one server-sent event line, if the line carries data
fn sse_data(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim).filter(|d| !d.is_empty())
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration
    pub fn new(
        config: GeminiConfig,
        credential: ApiCredential,
        stream_to_stdout: bool,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            credential,
            stream_to_stdout,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.url.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    async fn post(&self, url: &str, prompt: &str) -> Result<reqwest::Response, GenerationError> {
        let key = self.credential.expose().ok_or_else(|| {
            GenerationError::new(format!(
                "no API key configured (set {})",
                self.config.api_key_env
            ))
        })?;

        debug!("Sending request to Gemini: {}", url);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GenerationError::new(format!("could not connect to {}", self.config.url))
                } else if e.is_timeout() {
                    GenerationError::new(format!(
                        "request timed out after {} seconds",
                        self.config.timeout_seconds
                    ))
                } else {
                    GenerationError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::new(format!(
                "HTTP {} - {}",
                status.as_u16(),
                message
            )));
        }
        Ok(response)
    }

    /// Single request, whole response at once
    pub async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = self.endpoint("generateContent");
        let response = self.post(&url, prompt).await?;

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::new(format!("failed to parse response: {}", e)))?;

        let text = parsed.into_text()?;
        info!("Generated {} characters", text.len());
        Ok(text)
    }

    /// Streamed request; chunks are echoed to stdout when enabled
    pub async fn stream_generate_content(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let response = self.post(&url, prompt).await?;

        let mut full_response = String::new();
        let result = self.read_stream(response, &mut full_response).await;

        if self.stream_to_stdout && !full_response.is_empty() {
            println!();
            if let Err(ref e) = result {
                println!("--- Stream interrupted ({}); partial output discarded ---\n", e);
            }
        }
        let chunks = result?;

        if full_response.is_empty() {
            return Err(GenerationError::new("stream ended without any text"));
        }

        info!(
            "Generated {} characters in {} chunks",
            full_response.len(),
            chunks
        );
        Ok(full_response)
    }

    /// Collect event text into `full_response`, returning the number of events
    async fn read_stream(
        &self,
        response: reqwest::Response,
        full_response: &mut String,
    ) -> Result<usize, GenerationError> {
        let mut stream = response.bytes_stream();
        // Raw bytes: a multi-byte character may straddle two chunks
        let mut buffer: Vec<u8> = Vec::new();
        let mut chunks = 0usize;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result
                .map_err(|e| GenerationError::new(format!("stream error: {}", e)))?;
            buffer.extend_from_slice(&chunk);

            // Events are newline-delimited; keep any partial line for the next chunk
            while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline_pos).collect();
                chunks += self.handle_line(&line[..newline_pos], full_response)?;
            }
        }

        // Last event may arrive without a trailing newline
        if !buffer.is_empty() {
            chunks += self.handle_line(&buffer, full_response)?;
        }

        Ok(chunks)
    }

    /// Decode one SSE line and append its text; returns 1 if it carried an event
    fn handle_line(&self, line: &[u8], full_response: &mut String) -> Result<usize, GenerationError> {
        let line = std::str::from_utf8(line)
            .map_err(|e| GenerationError::new(format!("invalid UTF-8 in stream: {}", e)))?;
        let Some(data) = sse_data(line.trim_end_matches('\r')) else {
            return Ok(0);
        };

        let parsed: GenerateContentResponse = serde_json::from_str(data)
            .map_err(|e| GenerationError::new(format!("failed to parse stream chunk: {}", e)))?;
        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(GenerationError::new(format!("prompt blocked: {}", reason)));
        }

        let text = parsed.text();
        parsed.log_usage();

        if self.stream_to_stdout && !text.is_empty() {
            print!("{}", text);
            io::stdout().flush().ok();
        }
        full_response.push_str(&text);
        Ok(1)
    }

    pub fn streams_to_stdout(&self) -> bool {
        self.stream_to_stdout
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if self.stream_to_stdout {
            self.stream_generate_content(prompt).await
        } else {
            self.generate_content(prompt).await
        }
    }
}
