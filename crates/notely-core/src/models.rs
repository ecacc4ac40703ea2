//! Core data models for notely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::{NOTE_COLOR, TITLE_MAX_CHARS};
use crate::error::{Error, Result};
use crate::tags::normalize_tags;

// =============================================================================
// CATEGORY
// =============================================================================

/// Fixed set of note categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, utoipa::ToSchema,
)]
pub enum Category {
    Project,
    #[default]
    Personal,
    Work,
    Family,
    Travel,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 5] = [
        Category::Project,
        Category::Personal,
        Category::Work,
        Category::Family,
        Category::Travel,
    ];

    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Personal => "Personal",
            Self::Work => "Work",
            Self::Family => "Family",
            Self::Travel => "Travel",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    /// Matching is exact: `"work"` is not a category, `"Work"` is.
    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "`{}` is not a valid category (expected one of Project, Personal, Work, Family, Travel)",
                    s
                ))
            })
    }
}

// =============================================================================
// NOTE
// =============================================================================

/// A titled, tagged, categorized text note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub category: Category,
    pub color: String,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw create payload as received from a client.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Validated, normalized fields for a new note.
///
/// Only constructible through [`NewNote::try_from`], so a repository
/// receiving one never sees an empty title, an unknown category or
/// un-normalized tags.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub category: Category,
    pub color: String,
}

impl TryFrom<CreateNoteRequest> for NewNote {
    type Error = Error;

    fn try_from(req: CreateNoteRequest) -> Result<Self> {
        let title = req.title.as_deref().map(str::trim).unwrap_or_default();
        let content = req.content.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() || content.is_empty() {
            return Err(Error::BadRequest(
                "Title and content are required".to_string(),
            ));
        }
        validate_title_length(title)?;
        validate_text("Title", title)?;
        validate_text("Content", content)?;
        let tags = normalize_tags(req.tags.unwrap_or_default());
        validate_tags(&tags)?;

        let category = match req.category.as_deref() {
            Some(c) => c.parse::<Category>()?,
            None => Category::default(),
        };

        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            tags,
            category,
            color: NOTE_COLOR.to_string(),
        })
    }
}

/// Raw partial-update payload as received from a client.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub is_archived: Option<bool>,
}

/// Validated partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<Category>,
    pub is_archived: Option<bool>,
}

impl NoteUpdate {
    /// Update that only flips the archive flag.
    pub fn archived(is_archived: bool) -> Self {
        Self {
            is_archived: Some(is_archived),
            ..Default::default()
        }
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.category.is_none()
            && self.is_archived.is_none()
    }

    /// Apply the supplied fields onto `note`. Timestamps are the caller's job.
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(tags) = &self.tags {
            note.tags = tags.clone();
        }
        if let Some(category) = self.category {
            note.category = category;
        }
        if let Some(is_archived) = self.is_archived {
            note.is_archived = is_archived;
        }
    }
}

impl TryFrom<UpdateNoteRequest> for NoteUpdate {
    type Error = Error;

    fn try_from(req: UpdateNoteRequest) -> Result<Self> {
        let title = match req.title {
            Some(t) => {
                let t = t.trim();
                if t.is_empty() {
                    return Err(Error::Validation("Title cannot be empty".to_string()));
                }
                validate_title_length(t)?;
                validate_text("Title", t)?;
                Some(t.to_string())
            }
            None => None,
        };

        let content = match req.content {
            Some(c) => {
                let c = c.trim();
                if c.is_empty() {
                    return Err(Error::Validation("Content cannot be empty".to_string()));
                }
                validate_text("Content", c)?;
                Some(c.to_string())
            }
            None => None,
        };

        let tags = req.tags.map(normalize_tags);
        if let Some(tags) = &tags {
            validate_tags(tags)?;
        }

        let category = req
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()?;

        Ok(Self {
            title,
            content,
            tags,
            category,
            is_archived: req.is_archived,
        })
    }
}

fn validate_title_length(title: &str) -> Result<()> {
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(Error::Validation(format!(
            "Title cannot exceed {} characters",
            TITLE_MAX_CHARS
        )));
    }
    Ok(())
}

/// PostgreSQL text cannot hold NUL bytes.
fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(Error::Validation(format!(
            "{} cannot contain NUL characters",
            field
        )));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<()> {
    tags.iter().try_for_each(|t| validate_text("Tags", t))
}

// =============================================================================
// LISTING
// =============================================================================

/// Pagination metadata returned with every note listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    /// Number of notes matching the filter across all pages.
    pub total: i64,
    /// `ceil(total / limit)`
    pub pages: i64,
}

/// One page of notes plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoteList {
    pub notes: Vec<Note>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(title: &str, content: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    fn sample_note() -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::nil(),
            title: "Trip".to_string(),
            content: "Pack bags".to_string(),
            summary: None,
            tags: vec!["travel".to_string()],
            category: Category::Travel,
            color: NOTE_COLOR.to_string(),
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_category_parse_exact() {
        assert_eq!("Work".parse::<Category>().unwrap(), Category::Work);
        assert_eq!("Travel".parse::<Category>().unwrap(), Category::Travel);
        assert!(matches!(
            "work".parse::<Category>(),
            Err(Error::Validation(_))
        ));
        assert!("Hobby".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_default_is_personal() {
        assert_eq!(Category::default(), Category::Personal);
    }

    #[test]
    fn test_category_serialization() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_new_note_trims_and_defaults() {
        let mut req = create_req("  Groceries  ", "  milk, eggs \n");
        req.tags = Some(vec![" Food ".to_string(), "".to_string(), "HOME".to_string()]);

        let note = NewNote::try_from(req).unwrap();
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "milk, eggs");
        assert_eq!(note.tags, vec!["food", "home"]);
        assert_eq!(note.category, Category::Personal);
        assert_eq!(note.color, NOTE_COLOR);
    }

    #[test]
    fn test_new_note_missing_fields_is_bad_request() {
        let cases = vec![
            CreateNoteRequest::default(),
            CreateNoteRequest {
                title: Some("t".into()),
                ..Default::default()
            },
            CreateNoteRequest {
                content: Some("c".into()),
                ..Default::default()
            },
            create_req("   ", "content"),
            create_req("title", "\n\t"),
        ];

        for req in cases {
            assert!(matches!(NewNote::try_from(req), Err(Error::BadRequest(_))));
        }
    }

    #[test]
    fn test_new_note_title_length_bound() {
        let ok = "a".repeat(TITLE_MAX_CHARS);
        assert!(NewNote::try_from(create_req(&ok, "c")).is_ok());

        let too_long = "a".repeat(TITLE_MAX_CHARS + 1);
        assert!(matches!(
            NewNote::try_from(create_req(&too_long, "c")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_new_note_title_length_counts_chars_not_bytes() {
        let title = "é".repeat(TITLE_MAX_CHARS);
        assert!(NewNote::try_from(create_req(&title, "c")).is_ok());
    }

    #[test]
    fn test_nul_characters_are_rejected() {
        for req in [
            create_req("a\u{0}b", "c"),
            create_req("t", "c\u{0}"),
            CreateNoteRequest {
                tags: Some(vec!["ok".to_string(), "b\u{0}d".to_string()]),
                ..create_req("t", "c")
            },
        ] {
            assert!(matches!(
                NewNote::try_from(req),
                Err(Error::Validation(_))
            ));
        }

        let update = UpdateNoteRequest {
            content: Some("x\u{0}".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            NoteUpdate::try_from(update),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_new_note_invalid_category() {
        let mut req = create_req("t", "c");
        req.category = Some("Hobby".to_string());
        assert!(matches!(
            NewNote::try_from(req),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_update_only_supplied_fields() {
        let mut note = sample_note();
        let before = note.clone();

        NoteUpdate::archived(true).apply_to(&mut note);

        assert!(note.is_archived);
        assert_eq!(note.title, before.title);
        assert_eq!(note.content, before.content);
        assert_eq!(note.tags, before.tags);
        assert_eq!(note.category, before.category);
    }

    #[test]
    fn test_update_request_normalizes() {
        let req = UpdateNoteRequest {
            title: Some("  New title ".into()),
            tags: Some(vec!["  A ".into(), " ".into()]),
            category: Some("Family".into()),
            ..Default::default()
        };
        let update = NoteUpdate::try_from(req).unwrap();
        assert_eq!(update.title.as_deref(), Some("New title"));
        assert_eq!(update.tags, Some(vec!["a".to_string()]));
        assert_eq!(update.category, Some(Category::Family));
        assert!(update.content.is_none());
        assert!(update.is_archived.is_none());
    }

    #[test]
    fn test_update_rejects_blank_required_fields() {
        let blank_title = UpdateNoteRequest {
            title: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            NoteUpdate::try_from(blank_title),
            Err(Error::Validation(_))
        ));

        let blank_content = UpdateNoteRequest {
            content: Some("".into()),
            ..Default::default()
        };
        assert!(matches!(
            NoteUpdate::try_from(blank_content),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_update_rejects_invalid_category() {
        let req = UpdateNoteRequest {
            category: Some("Misc".into()),
            ..Default::default()
        };
        assert!(matches!(
            NoteUpdate::try_from(req),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(NoteUpdate::default().is_empty());
        assert!(!NoteUpdate::archived(false).is_empty());
    }

    #[test]
    fn test_note_serializes_camel_case() {
        let json = serde_json::to_value(sample_note()).unwrap();
        assert_eq!(json["isArchived"], false);
        assert_eq!(json["category"], "Travel");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("summary").is_none());
    }

    #[test]
    fn test_update_request_deserializes_is_archived() {
        let req: UpdateNoteRequest = serde_json::from_str(r#"{"isArchived": true}"#).unwrap();
        assert_eq!(req.is_archived, Some(true));
        assert!(req.title.is_none());
    }
}
