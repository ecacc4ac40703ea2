//! Core traits for notely abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewNote, Note, NoteUpdate};
use crate::query::{NoteFilter, NoteQuery};

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Repository for note persistence.
///
/// Every write bumps `updated_at`; `insert` also sets `created_at`.
/// Missing ids surface as [`crate::Error::NoteNotFound`].
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note and return it as stored.
    async fn insert(&self, note: NewNote) -> Result<Note>;

    /// Fetch a note by ID.
    async fn fetch(&self, id: Uuid) -> Result<Note>;

    /// Apply a partial update and return the updated note.
    async fn update(&self, id: Uuid, update: NoteUpdate) -> Result<Note>;

    /// Overwrite the stored summary and return the updated note.
    async fn set_summary(&self, id: Uuid, summary: &str) -> Result<Note>;

    /// Permanently delete a note.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Execute a listing plan: one page of notes plus the total match count.
    async fn find(&self, query: &NoteQuery) -> Result<(Vec<Note>, i64)>;

    /// Distinct tag values across notes matching `filter`, sorted ascending,
    /// blank values excluded.
    async fn distinct_tags(&self, filter: &NoteFilter) -> Result<Vec<String>>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
