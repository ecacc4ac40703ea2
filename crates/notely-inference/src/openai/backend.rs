//! OpenAI-compatible chat completion backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use notely_core::{Error, GenerationBackend, Result};

use super::error::{to_notely_error, ProviderErrorCode};
use super::types::*;

/// Default chat completions endpoint (Groq's OpenAI-compatible API).
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = "llama-3.3-70b-versatile";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion token cap.
pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// Configuration for the chat completion backend.
#[derive(Clone)]
pub struct ChatConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key sent as a bearer token.
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub gen_model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Request timeout in seconds. `None` waits for the provider.
    pub timeout_seconds: Option<u64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            gen_model: DEFAULT_GEN_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_seconds: None,
        }
    }
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("gen_model", &self.gen_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ChatConfig {
    /// Read configuration from `GROQ_*` environment variables.
    ///
    /// An empty `GROQ_API_KEY` counts as absent.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("GROQ_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            gen_model: DEFAULT_GEN_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_seconds: std::env::var("GROQ_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Whether a credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Chat completion backend for OpenAI-compatible providers.
pub struct ChatBackend {
    client: Client,
    config: ChatConfig,
}

impl ChatBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let mut client_builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            client_builder = client_builder.timeout(Duration::from_secs(secs));
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "chat",
            base_url = %config.base_url,
            model = %config.gen_model,
            "Initializing chat completion backend"
        );

        Ok(Self { client, config })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Build a POST request with authentication if configured.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.bearer_auth(api_key);
        }

        req.header("Content-Type", "application/json")
    }

    fn build_messages(system: &str, prompt: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));
        messages
    }
}

#[async_trait]
impl GenerationBackend for ChatBackend {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let start = Instant::now();
        debug!(
            subsystem = "inference",
            component = "chat",
            op = "generate",
            model = %self.config.gen_model,
            prompt_len = prompt.len(),
            "Requesting chat completion"
        );

        let request = ChatCompletionRequest {
            model: self.config.gen_model.clone(),
            messages: Self::build_messages(system, prompt),
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
        };

        let response = self
            .build_request("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Request(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body: ApiErrorResponse = response
                .json()
                .await
                .unwrap_or_else(|_| ApiErrorResponse::unknown());
            let code = ProviderErrorCode::from_response(status.as_u16(), &body.error.error_type);
            warn!(
                subsystem = "inference",
                component = "chat",
                op = "generate",
                status = status.as_u16(),
                error = %body.error.message,
                "Chat completion rejected"
            );
            return Err(to_notely_error(code, &body.error.message));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        debug!(
            subsystem = "inference",
            component = "chat",
            op = "generate",
            response_len = content.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Chat completion finished"
        );
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}
