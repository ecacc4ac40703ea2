//! # notely-inference
//!
//! Text generation for notely.
//!
//! This crate provides:
//! - An OpenAI-compatible chat completion backend (Groq by default)
//! - The note summarizer with its deterministic fallback
//! - A scripted mock backend for tests (feature `mock`)
//!
//! # Feature Flags
//!
//! - `mock`: Expose [`mock::MockGenerationBackend`] to downstream tests
//!
//! # Example
//!
//! ```rust,no_run
//! use notely_inference::Summarizer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let summarizer = Summarizer::from_env().unwrap();
//!     let summary = summarizer.summarize("Groceries", "Milk, eggs").await.unwrap();
//!     println!("{}", summary.text);
//! }
//! ```

pub mod openai;
pub mod summarizer;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use openai::{ChatBackend, ChatConfig};
pub use summarizer::{
    fallback_summary, summary_prompt, word_count, Summarizer, Summary, SummarySource,
    SYSTEM_PROMPT,
};
