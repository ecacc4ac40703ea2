//! Note repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

use notely_core::{
    Category, Error, NewNote, Note, NoteFilter, NoteQuery, NoteRepository, NoteUpdate, Result,
};

use crate::filter::{bind_filter_params, NoteFilterQueryBuilder};
use crate::pool::LazyPool;

/// Column list shared by every statement returning full notes.
const NOTE_COLUMNS: &str =
    "n.id, n.title, n.content, n.summary, n.tags, n.category, n.color, n.is_archived, n.created_at, n.updated_at";

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone, Debug)]
pub struct PgNoteRepository {
    pool: LazyPool,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository on top of a (possibly unconnected) pool handle.
    pub fn new(pool: LazyPool) -> Self {
        Self { pool }
    }
}

/// Map a database row to a Note.
fn map_row_to_note(row: PgRow) -> Result<Note> {
    let category: String = row.try_get("category").map_err(Error::Database)?;
    Ok(Note {
        id: row.try_get("id").map_err(Error::Database)?,
        title: row.try_get("title").map_err(Error::Database)?,
        content: row.try_get("content").map_err(Error::Database)?,
        summary: row.try_get("summary").map_err(Error::Database)?,
        tags: row
            .try_get::<Option<Vec<String>>, _>("tags")
            .map_err(Error::Database)?
            .unwrap_or_default(),
        category: category
            .parse::<Category>()
            .map_err(|e| Error::Internal(format!("Stored note has bad category: {}", e)))?,
        color: row.try_get("color").map_err(Error::Database)?,
        is_archived: row.try_get("is_archived").map_err(Error::Database)?,
        created_at: row.try_get("created_at").map_err(Error::Database)?,
        updated_at: row.try_get("updated_at").map_err(Error::Database)?,
    })
}

/// Build the `SET` list for a partial update.
///
/// `$1` is `updated_at` and `$2` the id; supplied fields follow from `$3`
/// in declaration order (title, content, tags, category, is_archived).
fn build_update_sets(update: &NoteUpdate) -> Vec<String> {
    let mut sets: Vec<String> = vec!["updated_at = $1".to_string()];
    let mut param_idx = 3;

    let supplied = [
        ("title", update.title.is_some()),
        ("content", update.content.is_some()),
        ("tags", update.tags.is_some()),
        ("category", update.category.is_some()),
        ("is_archived", update.is_archived.is_some()),
    ];
    for (column, present) in supplied {
        if present {
            sets.push(format!("{} = ${}", column, param_idx));
            param_idx += 1;
        }
    }
    sets
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, note: NewNote) -> Result<Note> {
        let pool = self.pool.get().await?;
        let now = Utc::now();
        let id = Uuid::now_v7();

        let row = sqlx::query(&format!(
            "INSERT INTO note AS n (id, title, content, tags, category, color, is_archived, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, false, $7, $7)
             RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.tags)
        .bind(note.category.as_str())
        .bind(&note.color)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "insert",
            note_id = %id,
            "Note inserted"
        );
        map_row_to_note(row)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        let pool = self.pool.get().await?;
        let row = sqlx::query(&format!("SELECT {} FROM note n WHERE n.id = $1", NOTE_COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;
        map_row_to_note(row)
    }

    async fn update(&self, id: Uuid, update: NoteUpdate) -> Result<Note> {
        let pool = self.pool.get().await?;
        let sql = format!(
            "UPDATE note AS n SET {} WHERE n.id = $2 RETURNING {}",
            build_update_sets(&update).join(", "),
            NOTE_COLUMNS
        );

        let mut q = sqlx::query(&sql).bind(Utc::now()).bind(id);
        if let Some(title) = update.title {
            q = q.bind(title);
        }
        if let Some(content) = update.content {
            q = q.bind(content);
        }
        if let Some(tags) = update.tags {
            q = q.bind(tags);
        }
        if let Some(category) = update.category {
            q = q.bind(category.as_str());
        }
        if let Some(is_archived) = update.is_archived {
            q = q.bind(is_archived);
        }

        let row = q
            .fetch_optional(pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;
        map_row_to_note(row)
    }

    async fn set_summary(&self, id: Uuid, summary: &str) -> Result<Note> {
        let pool = self.pool.get().await?;
        let row = sqlx::query(&format!(
            "UPDATE note AS n SET summary = $1, updated_at = $2 WHERE n.id = $3 RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(summary)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::NoteNotFound(id))?;
        map_row_to_note(row)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let pool = self.pool.get().await?;
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn find(&self, query: &NoteQuery) -> Result<(Vec<Note>, i64)> {
        let pool = self.pool.get().await?;
        let start = Instant::now();

        let (where_clause, params) = NoteFilterQueryBuilder::new(&query.filter, 0).build();
        let limit_idx = params.len() + 1;
        let offset_idx = params.len() + 2;

        let list_sql = format!(
            "SELECT {} FROM note n WHERE {} ORDER BY n.updated_at DESC, n.id DESC LIMIT ${} OFFSET ${}",
            NOTE_COLUMNS, where_clause, limit_idx, offset_idx
        );
        let rows = bind_filter_params!(sqlx::query(&list_sql), &params)
            .bind(query.limit)
            .bind(query.offset())
            .fetch_all(pool)
            .await
            .map_err(Error::Database)?;

        let count_sql = format!("SELECT COUNT(*) FROM note n WHERE {}", where_clause);
        let total: i64 = bind_filter_params!(sqlx::query_scalar(&count_sql), &params)
            .fetch_one(pool)
            .await
            .map_err(Error::Database)?;

        let notes = rows
            .into_iter()
            .map(map_row_to_note)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "find",
            result_count = notes.len(),
            total,
            duration_ms = start.elapsed().as_millis() as u64,
            "Note listing executed"
        );
        Ok((notes, total))
    }

    async fn distinct_tags(&self, filter: &NoteFilter) -> Result<Vec<String>> {
        let pool = self.pool.get().await?;
        let (where_clause, params) = NoteFilterQueryBuilder::new(filter, 0).build();
        let sql = format!(
            "SELECT DISTINCT t.tag FROM note n CROSS JOIN LATERAL unnest(n.tags) AS t(tag)
             WHERE {} AND btrim(t.tag) <> ''",
            where_clause
        );

        let mut tags: Vec<String> = bind_filter_params!(sqlx::query_scalar(&sql), &params)
            .fetch_all(pool)
            .await
            .map_err(Error::Database)?;

        // Byte order, independent of the database collation.
        tags.sort();
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_sets_only_timestamp_when_empty() {
        let sets = build_update_sets(&NoteUpdate::default());
        assert_eq!(sets, vec!["updated_at = $1"]);
    }

    #[test]
    fn test_update_sets_archive_only() {
        let sets = build_update_sets(&NoteUpdate::archived(true));
        assert_eq!(sets, vec!["updated_at = $1", "is_archived = $3"]);
    }

    #[test]
    fn test_update_sets_follow_bind_order() {
        let update = NoteUpdate {
            title: Some("t".into()),
            tags: Some(vec![]),
            is_archived: Some(false),
            ..Default::default()
        };
        let sets = build_update_sets(&update);
        assert_eq!(
            sets,
            vec![
                "updated_at = $1",
                "title = $3",
                "tags = $4",
                "is_archived = $5"
            ]
        );
    }

    #[test]
    fn test_note_columns_are_aliased() {
        for column in NOTE_COLUMNS.split(", ") {
            assert!(column.starts_with("n."), "{}", column);
        }
    }
}
