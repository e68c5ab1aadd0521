use crate::modules::enhancer::enhance_prompt;
use crate::modules::extractor::extract_modifications;
use crate::modules::protocol::{ErrorCode, ParameterModification, PatchResponse};
use crate::modules::system_prompt::{build_generate_prompt, build_modify_prompt};
use crate::modules::vector_db::VectorDatabase;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOGGED_CHARS: usize = 400;

#[derive(Debug, Error)]
pub enum ClaudeError {
    #[error("Invalid API key. Please set a valid Claude API key in settings.")]
    InvalidApiKey,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("claude request failed: status={status} message={message}")]
    Api { status: StatusCode, message: String },
    #[error("claude response parse failed: {0}")]
    Parse(String),
}

impl ClaudeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ClaudeError::InvalidApiKey => ErrorCode::InvalidApiKey,
            ClaudeError::Http(_) => ErrorCode::Network,
            ClaudeError::Api { .. } => ErrorCode::Api,
            ClaudeError::Parse(_) => ErrorCode::Parse,
        }
    }
}

impl From<ClaudeError> for PatchResponse {
    fn from(e: ClaudeError) -> Self {
        PatchResponse::failure(e.code(), e.to_string())
    }
}

#[derive(Clone)]
pub struct ClaudeConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub api_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClaudeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `ANTHROPIC_API_KEY` (or `CLAUDE_API_KEY`), `CLAUDE_MODEL`,
    /// `CLAUDE_MAX_TOKENS`, `CLAUDE_API_URL` and `CLAUDE_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .or_else(|_| std::env::var("CLAUDE_API_KEY"))
            .unwrap_or_default();
        let mut cfg = Self::new(api_key.trim());

        if let Some(model) = env_nonempty("CLAUDE_MODEL") {
            cfg.model = model;
        }
        if let Some(url) = env_nonempty("CLAUDE_API_URL") {
            cfg.api_url = url;
        }
        if let Some(n) = env_nonempty("CLAUDE_MAX_TOKENS").and_then(|s| s.parse::<u32>().ok()) {
            cfg.max_tokens = n.max(1);
        }
        cfg.timeout = http_timeout_from_env();
        cfg
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn http_timeout_from_env() -> Duration {
    let secs = env_nonempty("CLAUDE_HTTP_TIMEOUT_SECS")
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .clamp(5, 300);
    Duration::from_secs(secs)
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push_str("…(truncated)");
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct PatchReply {
    pub response_text: String,
    pub modifications: Vec<ParameterModification>,
}

impl PatchReply {
    pub fn from_text(response_text: String) -> Self {
        let modifications = extract_modifications(&response_text);
        Self {
            response_text,
            modifications,
        }
    }

    pub fn into_response(self) -> PatchResponse {
        PatchResponse::Success {
            response_text: self.response_text,
            modifications: self.modifications,
        }
    }
}

pub struct ClaudeClient {
    config: ClaudeConfig,
    http: reqwest::Client,
    vector_db: Option<Arc<VectorDatabase>>,
}

impl ClaudeClient {
    pub fn new(config: ClaudeConfig) -> Result<Self, ClaudeError> {
        // Requests may each run on a short-lived runtime, so idle connections
        // are not kept across calls.
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self {
            config,
            http,
            vector_db: None,
        })
    }

    /// Enables preset-based prompt enrichment for `generate_patch`.
    pub fn with_vector_database(mut self, db: Arc<VectorDatabase>) -> Self {
        self.vector_db = Some(db);
        self
    }

    pub fn vector_database(&self) -> Option<&Arc<VectorDatabase>> {
        self.vector_db.as_ref()
    }

    pub fn config(&self) -> &ClaudeConfig {
        &self.config
    }

    pub fn is_api_key_valid(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    pub async fn generate_patch(&self, prompt: &str) -> Result<PatchReply, ClaudeError> {
        let prompt = match self.vector_db.as_deref() {
            Some(db) if !db.is_empty() => enhance_prompt(db, prompt),
            _ => prompt.to_string(),
        };
        let text = self.send_message(&build_generate_prompt(&prompt)).await?;
        Ok(PatchReply::from_text(text))
    }

    pub async fn modify_patch(
        &self,
        prompt: &str,
        current_patch_info: &str,
    ) -> Result<PatchReply, ClaudeError> {
        let text = self
            .send_message(&build_modify_prompt(prompt, current_patch_info))
            .await?;
        Ok(PatchReply::from_text(text))
    }

    /// Sends one user message and returns the first text block of the reply.
    pub async fn send_message(&self, content: &str) -> Result<String, ClaudeError> {
        if !self.is_api_key_valid() {
            return Err(ClaudeError::InvalidApiKey);
        }

        let payload = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [
                { "role": "user", "content": content }
            ]
        });

        log::debug!(
            "POST {} model={} prompt_chars={}",
            self.config.api_url,
            self.config.model,
            content.chars().count()
        );

        let resp = self
            .http
            .post(&self.config.api_url)
            .header("x-api-key", self.config.api_key.trim())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let message = extract_error_message(status, &body);
            log::warn!("claude api error: {message}");
            return Err(ClaudeError::Api { status, message });
        }

        let text = extract_message_text(&body).map_err(ClaudeError::Parse)?;
        log::debug!("reply: {}", truncate_chars(&text, MAX_LOGGED_CHARS));
        Ok(text)
    }
}

fn extract_message_text(body: &str) -> Result<String, String> {
    #[derive(Deserialize)]
    struct Envelope {
        content: Option<Vec<Block>>,
    }
    #[derive(Deserialize)]
    struct Block {
        #[serde(rename = "type")]
        kind: Option<String>,
        text: Option<String>,
    }

    let env: Envelope = serde_json::from_str(body)
        .map_err(|e| format!("{e}: {}", truncate_chars(body, MAX_LOGGED_CHARS)))?;
    let blocks = env
        .content
        .ok_or_else(|| "no content array found in response".to_string())?;
    blocks
        .into_iter()
        .filter(|b| b.kind.as_deref().map_or(true, |k| k == "text"))
        .find_map(|b| b.text)
        .ok_or_else(|| "no text block found in content array".to_string())
}

fn extract_error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: Option<ApiError>,
    }
    #[derive(Deserialize)]
    struct ApiError {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "API error (status {}): {}",
                status.as_u16(),
                truncate_chars(body, MAX_LOGGED_CHARS)
            )
        })
}
