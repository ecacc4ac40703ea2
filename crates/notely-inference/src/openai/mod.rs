//! OpenAI-compatible chat completion backend.
//!
//! Speaks the `/chat/completions` protocol shared by Groq, OpenAI and most
//! self-hosted gateways. Defaults target Groq.
//!
//! # Example
//!
//! ```rust,no_run
//! use notely_inference::openai::{ChatBackend, ChatConfig};
//! use notely_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = ChatBackend::new(ChatConfig {
//!         api_key: Some("gsk_...".to_string()),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//!     let text = backend
//!         .generate_with_system("Be brief.", "Summarize: ...")
//!         .await
//!         .unwrap();
//!     println!("{}", text);
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    ChatBackend, ChatConfig, DEFAULT_BASE_URL, DEFAULT_GEN_MODEL, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};
pub use error::{to_notely_error, ProviderErrorCode};
pub use types::*;
