//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notely_inference::mock::MockGenerationBackend;
//!
//! let backend = MockGenerationBackend::new().with_fixed_response("Short summary.");
//! let summarizer = Summarizer::new(Some(Arc::new(backend.clone())));
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use notely_core::{Error, GenerationBackend, Result};

/// Scripted outcome returned by every call.
#[derive(Debug, Clone)]
enum MockOutcome {
    Respond(String),
    Unauthorized,
    Fail,
}

/// A recorded backend call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
}

/// Generation backend that answers from a script and records its inputs.
#[derive(Clone)]
pub struct MockGenerationBackend {
    outcome: MockOutcome,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerationBackend {
    /// Backend answering "Mock response".
    pub fn new() -> Self {
        Self {
            outcome: MockOutcome::Respond("Mock response".to_string()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every call with `response`.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        self.outcome = MockOutcome::Respond(response.into());
        self
    }

    /// Reject every call as if the credential were invalid.
    pub fn rejecting_credentials(mut self) -> Self {
        self.outcome = MockOutcome::Unauthorized;
        self
    }

    /// Fail every call with a generic inference error.
    pub fn failing(mut self) -> Self {
        self.outcome = MockOutcome::Fail;
        self
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        if let Ok(mut log) = self.call_log.lock() {
            log.push(MockCall {
                system: system.to_string(),
                prompt: prompt.to_string(),
            });
        }

        match &self.outcome {
            MockOutcome::Respond(text) => Ok(text.clone()),
            MockOutcome::Unauthorized => {
                Err(Error::Unauthorized("Authentication failed: mock".to_string()))
            }
            MockOutcome::Fail => Err(Error::Inference("Server error: mock".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
