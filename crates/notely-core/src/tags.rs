//! Tag normalization.
//!
//! Tags are stored trimmed and lowercased. Order is preserved and duplicates
//! are kept; entries that are empty after trimming are dropped.

/// Normalize a single tag: trim surrounding whitespace, then lowercase.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Normalize a list of tags, dropping entries that end up empty.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| normalize_tag(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}
