//! In-process note repository.
//!
//! Implements [`NoteRepository`] over a map guarded by a lock, evaluating
//! listing plans with [`NoteFilter::matches`]. Used by tests and by the API
//! test harness; it is not durable.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use notely_core::{
    Error, NewNote, Note, NoteFilter, NoteQuery, NoteRepository, NoteUpdate, Result,
};

/// Note repository held entirely in memory.
#[derive(Default)]
pub struct MemoryNoteRepository {
    notes: RwLock<HashMap<Uuid, Note>>,
}

impl MemoryNoteRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notes, archived included.
    pub fn len(&self) -> usize {
        self.notes.read().map(|n| n.len()).unwrap_or(0)
    }

    /// Whether the repository holds no notes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> Error {
        Error::Internal("note store lock poisoned".to_string())
    }

    fn modify<F>(&self, id: Uuid, f: F) -> Result<Note>
    where
        F: FnOnce(&mut Note),
    {
        let mut notes = self.notes.write().map_err(|_| Self::poisoned())?;
        let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
        f(note);
        note.updated_at = Utc::now();
        Ok(note.clone())
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn insert(&self, new: NewNote) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::now_v7(),
            title: new.title,
            content: new.content,
            summary: None,
            tags: new.tags,
            category: new.category,
            color: new.color,
            is_archived: false,
            created_at: now,
            updated_at: now,
        };
        self.notes
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(note.id, note.clone());
        Ok(note)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        self.notes
            .read()
            .map_err(|_| Self::poisoned())?
            .get(&id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn update(&self, id: Uuid, update: NoteUpdate) -> Result<Note> {
        self.modify(id, |note| update.apply_to(note))
    }

    async fn set_summary(&self, id: Uuid, summary: &str) -> Result<Note> {
        self.modify(id, |note| note.summary = Some(summary.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.notes
            .write()
            .map_err(|_| Self::poisoned())?
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NoteNotFound(id))
    }

    async fn find(&self, query: &NoteQuery) -> Result<(Vec<Note>, i64)> {
        let notes = self.notes.read().map_err(|_| Self::poisoned())?;
        let mut matched: Vec<&Note> = notes.values().filter(|n| query.filter.matches(n)).collect();
        matched.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

        let total = matched.len() as i64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let page = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn distinct_tags(&self, filter: &NoteFilter) -> Result<Vec<String>> {
        let notes = self.notes.read().map_err(|_| Self::poisoned())?;
        let tags: BTreeSet<String> = notes
            .values()
            .filter(|n| filter.matches(n))
            .flat_map(|n| n.tags.iter())
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .collect();
        Ok(tags.into_iter().collect())
    }
}
