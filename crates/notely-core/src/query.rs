//! Note listing query plan.
//!
//! [`NoteQuery::build`] turns the optional listing parameters of a request
//! into a single plan: a [`NoteFilter`] plus pagination. Repositories execute
//! the plan; sorting is always `updated_at` descending (newest edits first),
//! ties broken by id descending.

use crate::defaults::{PAGE, PAGE_LIMIT};
use crate::models::{Note, Pagination};

/// Raw listing parameters, exactly as they appear in the query string.
///
/// Everything is kept as text so that unusable numbers degrade to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct ListNotesParams {
    /// Case-insensitive substring matched against title, content and tags.
    pub search: Option<String>,
    /// Exact tag membership (lowercased before matching).
    pub tag: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// `"true"` lists archived notes; anything else lists active notes.
    pub archived: Option<String>,
    /// 1-based page number (default 1).
    pub page: Option<String>,
    /// Page size (default 10).
    pub limit: Option<String>,
}

impl ListNotesParams {
    /// Collect parameters from decoded query-string pairs.
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "search" => &mut params.search,
                "tag" => &mut params.tag,
                "category" => &mut params.category,
                "archived" => &mut params.archived,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

/// Row filter shared by listing and tag aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Archived view or active view; there is no "both".
    pub archived: bool,
    pub category: Option<String>,
    /// Already lowercased.
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl NoteFilter {
    /// Filter selecting every non-archived note.
    pub fn active() -> Self {
        Self::default()
    }

    /// Evaluate the filter against a single note.
    ///
    /// This is the reference semantics; the SQL rendering in the database
    /// layer must select the same rows.
    pub fn matches(&self, note: &Note) -> bool {
        if note.is_archived != self.archived {
            return false;
        }
        if let Some(category) = &self.category {
            if note.category.as_str() != category {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !note.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = note.title.to_lowercase().contains(&needle)
                || note.content.to_lowercase().contains(&needle)
                || note.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Resolved filter + pagination plan for one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQuery {
    pub filter: NoteFilter,
    /// 1-based, always >= 1.
    pub page: i64,
    /// Always >= 1.
    pub limit: i64,
}

impl NoteQuery {
    /// Build the plan from raw request parameters.
    pub fn build(params: &ListNotesParams) -> Self {
        let filter = NoteFilter {
            archived: params.archived.as_deref() == Some("true"),
            category: non_empty(params.category.as_deref()).map(str::to_string),
            tag: non_empty(params.tag.as_deref()).map(str::to_lowercase),
            search: non_empty(params.search.as_deref()).map(str::to_string),
        };

        Self {
            filter,
            page: parse_positive(params.page.as_deref()).unwrap_or(PAGE),
            limit: parse_positive(params.limit.as_deref()).unwrap_or(PAGE_LIMIT),
        }
    }

    /// Number of matching rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Pagination metadata for `total` matching notes.
    pub fn pagination(&self, total: i64) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            pages: page_count(total, self.limit),
        }
    }
}

/// `ceil(total / limit)`; zero when nothing matches.
pub fn page_count(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    total / limit + i64::from(total % limit != 0)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Lenient integer parse: leading whitespace, optional sign, then the
/// leading run of digits (`"3abc"` -> 3, `"2.5"` -> 2). Returns `None` when
/// there are no digits or the value is below 1.
fn parse_positive(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    let value: i64 = rest[..digits_end].parse().ok()?;
    if negative || value < 1 {
        return None;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Utc;
    use uuid::Uuid;

    fn params() -> ListNotesParams {
        ListNotesParams::default()
    }

    fn note(title: &str, content: &str, tags: &[&str]) -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::now_v7(),
            title: title.to_string(),
            content: content.to_string(),
            summary: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category: Category::Personal,
            color: crate::defaults::NOTE_COLOR.to_string(),
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_defaults() {
        let q = NoteQuery::build(&params());
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 10);
        assert_eq!(q.offset(), 0);
        assert_eq!(q.filter, NoteFilter::active());
    }

    #[test]
    fn test_from_pairs_first_occurrence_wins() {
        let p = ListNotesParams::from_pairs([
            ("page", "1"),
            ("page", "2"),
            ("tag", "Work"),
            ("sort", "title"),
            ("limit", "5"),
        ]);
        assert_eq!(p.page.as_deref(), Some("1"));
        assert_eq!(p.limit.as_deref(), Some("5"));
        assert_eq!(p.tag.as_deref(), Some("Work"));
        assert!(p.search.is_none());

        let q = NoteQuery::build(&p);
        assert_eq!((q.page, q.limit), (1, 5));
    }

    #[test]
    fn test_archived_only_exact_true() {
        for (raw, expected) in [
            (Some("true"), true),
            (Some("TRUE"), false),
            (Some("1"), false),
            (Some("false"), false),
            (None, false),
        ] {
            let q = NoteQuery::build(&ListNotesParams {
                archived: raw.map(String::from),
                ..params()
            });
            assert_eq!(q.filter.archived, expected, "archived={:?}", raw);
        }
    }

    #[test]
    fn test_tag_is_lowercased_and_search_kept_verbatim() {
        let q = NoteQuery::build(&ListNotesParams {
            tag: Some("Rust".into()),
            search: Some("Hello World".into()),
            category: Some("Work".into()),
            ..params()
        });
        assert_eq!(q.filter.tag.as_deref(), Some("rust"));
        assert_eq!(q.filter.search.as_deref(), Some("Hello World"));
        assert_eq!(q.filter.category.as_deref(), Some("Work"));
    }

    #[test]
    fn test_empty_params_are_absent() {
        let q = NoteQuery::build(&ListNotesParams {
            tag: Some(String::new()),
            search: Some(String::new()),
            category: Some(String::new()),
            ..params()
        });
        assert_eq!(q.filter, NoteFilter::active());
    }

    #[test]
    fn test_offset_arithmetic() {
        let q = NoteQuery::build(&ListNotesParams {
            page: Some("3".into()),
            limit: Some("7".into()),
            ..params()
        });
        assert_eq!(q.offset(), 14);
    }

    #[test]
    fn test_unusable_numbers_degrade_to_defaults() {
        for raw in ["abc", "", "0", "-2", "  ", "-"] {
            let q = NoteQuery::build(&ListNotesParams {
                page: Some(raw.into()),
                limit: Some(raw.into()),
                ..params()
            });
            assert_eq!(q.page, 1, "page={:?}", raw);
            assert_eq!(q.limit, 10, "limit={:?}", raw);
        }
    }

    #[test]
    fn test_leading_digits_are_used() {
        assert_eq!(parse_positive(Some("3abc")), Some(3));
        assert_eq!(parse_positive(Some(" 2.9")), Some(2));
        assert_eq!(parse_positive(Some("+5")), Some(5));
        assert_eq!(parse_positive(Some("99999999999999999999")), None);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(25, 7), 4);
    }

    #[test]
    fn test_page_count_with_huge_limit() {
        assert_eq!(page_count(2, i64::MAX), 1);
        assert_eq!(page_count(i64::MAX, i64::MAX), 1);
        assert_eq!(page_count(i64::MAX, 1), i64::MAX);

        let q = NoteQuery::build(&ListNotesParams {
            page: Some("2".into()),
            limit: Some(i64::MAX.to_string()),
            ..params()
        });
        assert_eq!(q.offset(), i64::MAX);
        assert_eq!(q.pagination(2).pages, 1);
    }

    #[test]
    fn test_pagination_metadata() {
        let q = NoteQuery::build(&ListNotesParams {
            page: Some("2".into()),
            limit: Some("5".into()),
            ..params()
        });
        let p = q.pagination(12);
        assert_eq!(p.page, 2);
        assert_eq!(p.limit, 5);
        assert_eq!(p.total, 12);
        assert_eq!(p.pages, 3);
    }

    #[test]
    fn test_filter_excludes_other_archive_state() {
        let mut n = note("a", "b", &[]);
        assert!(NoteFilter::active().matches(&n));
        n.is_archived = true;
        assert!(!NoteFilter::active().matches(&n));
        let archived = NoteFilter {
            archived: true,
            ..Default::default()
        };
        assert!(archived.matches(&n));
    }

    #[test]
    fn test_filter_search_title_content_or_tag() {
        let filter = NoteFilter {
            search: Some("RUST".into()),
            ..Default::default()
        };
        assert!(filter.matches(&note("Learning rust", "x", &[])));
        assert!(filter.matches(&note("x", "trusty tools", &[])));
        assert!(filter.matches(&note("x", "y", &["rustlang"])));
        assert!(!filter.matches(&note("go", "python", &["java"])));
    }

    #[test]
    fn test_filter_tag_and_search_both_apply() {
        let filter = NoteFilter {
            tag: Some("work".into()),
            search: Some("plan".into()),
            ..Default::default()
        };
        assert!(filter.matches(&note("Plan Q3", "x", &["work"])));
        assert!(!filter.matches(&note("Plan Q3", "x", &["home"])));
        assert!(!filter.matches(&note("Retro", "x", &["work"])));
    }

    #[test]
    fn test_filter_category_exact() {
        let filter = NoteFilter {
            category: Some("Personal".into()),
            ..Default::default()
        };
        assert!(filter.matches(&note("a", "b", &[])));
        let filter = NoteFilter {
            category: Some("personal".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&note("a", "b", &[])));
    }
}
