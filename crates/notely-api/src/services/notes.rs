//! Note request orchestration.
//!
//! Validates raw payloads into domain types, drives the repository and the
//! summarizer, and logs each operation. Holds no mutable state of its own.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use notely_core::{
    CreateNoteRequest, ListNotesParams, NewNote, Note, NoteFilter, NoteList, NoteQuery,
    NoteRepository, NoteUpdate, Result, UpdateNoteRequest,
};
use notely_inference::{Summarizer, SummarySource};

/// Result of summarizing a note.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SummarizedNote {
    pub summary: String,
    pub note: Note,
}

/// Note operations exposed over HTTP.
#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
    summarizer: Summarizer,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>, summarizer: Summarizer) -> Self {
        Self { repo, summarizer }
    }

    /// One page of notes matching the listing parameters.
    pub async fn list(&self, params: &ListNotesParams) -> Result<NoteList> {
        let start = Instant::now();
        let query = NoteQuery::build(params);
        let (notes, total) = self.repo.find(&query).await?;

        debug!(
            subsystem = "api",
            component = "notes",
            op = "list",
            page = query.page,
            limit = query.limit,
            result_count = notes.len(),
            total,
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed notes"
        );
        Ok(NoteList {
            notes,
            pagination: query.pagination(total),
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Note> {
        self.repo.fetch(id).await
    }

    pub async fn create(&self, req: CreateNoteRequest) -> Result<Note> {
        let new = NewNote::try_from(req)?;
        let note = self.repo.insert(new).await?;

        info!(
            subsystem = "api",
            component = "notes",
            op = "create",
            note_id = %note.id,
            category = %note.category,
            tag_count = note.tags.len(),
            "Note created"
        );
        Ok(note)
    }

    /// Apply the supplied fields only. An empty payload still bumps `updatedAt`.
    pub async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        let update = NoteUpdate::try_from(req)?;
        let note = self.repo.update(id, update).await?;

        info!(
            subsystem = "api",
            component = "notes",
            op = "update",
            note_id = %id,
            is_archived = note.is_archived,
            "Note updated"
        );
        Ok(note)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repo.delete(id).await?;
        info!(
            subsystem = "api",
            component = "notes",
            op = "delete",
            note_id = %id,
            "Note deleted"
        );
        Ok(())
    }

    /// Sorted distinct tags of non-archived notes.
    pub async fn tags(&self) -> Result<Vec<String>> {
        self.repo.distinct_tags(&NoteFilter::active()).await
    }

    /// Summarize a note and persist the summary onto it.
    pub async fn summarize(&self, id: Uuid) -> Result<SummarizedNote> {
        let start = Instant::now();
        let note = self.repo.fetch(id).await?;
        let summary = self.summarizer.summarize(&note.title, &note.content).await?;
        let note = self.repo.set_summary(id, &summary.text).await?;

        info!(
            subsystem = "api",
            component = "notes",
            op = "summarize",
            note_id = %id,
            fallback = summary.source == SummarySource::Fallback,
            duration_ms = start.elapsed().as_millis() as u64,
            "Note summarized"
        );
        Ok(SummarizedNote {
            summary: summary.text,
            note,
        })
    }
}
