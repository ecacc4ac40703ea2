//! Note summarization with a deterministic fallback.
//!
//! [`Summarizer::summarize`] makes at most one call to the configured
//! generation backend. The outcome is one of three branches:
//!
//! - the backend returned non-blank text: that text is the summary
//! - the backend rejected the credential: [`Error::Unauthorized`] is returned
//! - anything else (no credential, transport or provider failure, blank
//!   response): the templated [`fallback_summary`] is returned

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use notely_core::{Error, GenerationBackend, Result};

use crate::openai::{ChatBackend, ChatConfig};

/// System instruction sent with every summarization request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that creates concise summaries of notes. Provide summaries in 2-3 sentences that capture the main points.";

/// Build the user prompt for a note.
pub fn summary_prompt(title: &str, content: &str) -> String {
    format!(
        "Please provide a concise summary of the following note:\n\nTitle: {}\n\nContent: {}",
        title, content
    )
}

/// Number of whitespace-delimited tokens in `content`.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Templated summary used whenever generation is unavailable.
pub fn fallback_summary(title: &str, content: &str) -> String {
    format!(
        "This note titled \"{}\" contains {} words covering the main topic. The content discusses key points and provides relevant information on the subject matter.",
        title,
        word_count(content)
    )
}

/// Where a summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    Generated,
    Fallback,
}

/// A produced summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub source: SummarySource,
}

impl Summary {
    fn fallback(title: &str, content: &str) -> Self {
        Self {
            text: fallback_summary(title, content),
            source: SummarySource::Fallback,
        }
    }
}

/// Summarization gateway.
///
/// Holds no per-request state; cloning shares the backend.
#[derive(Clone, Default)]
pub struct Summarizer {
    backend: Option<Arc<dyn GenerationBackend>>,
}

impl Summarizer {
    /// Create a summarizer over an optional backend. `None` always falls back.
    pub fn new(backend: Option<Arc<dyn GenerationBackend>>) -> Self {
        Self { backend }
    }

    /// Summarizer that never calls out.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build from `GROQ_*` environment variables.
    ///
    /// Without `GROQ_API_KEY` the summarizer is disabled.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ChatConfig::from_env())
    }

    /// Build from an explicit chat configuration.
    pub fn from_config(config: ChatConfig) -> Result<Self> {
        if !config.has_credential() {
            info!(
                subsystem = "inference",
                component = "summarizer",
                "No generation credential configured, summaries use the fallback template"
            );
            return Ok(Self::disabled());
        }
        let backend = ChatBackend::new(config)?;
        Ok(Self::new(Some(Arc::new(backend))))
    }

    /// Whether a backend is configured.
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Summarize a note.
    pub async fn summarize(&self, title: &str, content: &str) -> Result<Summary> {
        let Some(backend) = &self.backend else {
            debug!(
                subsystem = "inference",
                component = "summarizer",
                op = "summarize",
                "Summarizer disabled, using fallback"
            );
            return Ok(Summary::fallback(title, content));
        };

        let start = Instant::now();
        let outcome = backend
            .generate_with_system(SYSTEM_PROMPT, &summary_prompt(title, content))
            .await;

        match outcome {
            Ok(text) if !text.trim().is_empty() => {
                debug!(
                    subsystem = "inference",
                    component = "summarizer",
                    op = "summarize",
                    model = backend.model_name(),
                    response_len = text.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Summary generated"
                );
                Ok(Summary {
                    text: text.trim().to_string(),
                    source: SummarySource::Generated,
                })
            }
            Ok(_) => {
                warn!(
                    subsystem = "inference",
                    component = "summarizer",
                    op = "summarize",
                    model = backend.model_name(),
                    "Generation returned no text, using fallback"
                );
                Ok(Summary::fallback(title, content))
            }
            Err(Error::Unauthorized(msg)) => {
                warn!(
                    subsystem = "inference",
                    component = "summarizer",
                    op = "summarize",
                    error = %msg,
                    "Generation credential rejected"
                );
                Err(Error::Unauthorized(msg))
            }
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "summarizer",
                    op = "summarize",
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Generation failed, using fallback"
                );
                Ok(Summary::fallback(title, content))
            }
        }
    }
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("model", &self.backend.as_ref().map(|b| b.model_name()))
            .finish()
    }
}
