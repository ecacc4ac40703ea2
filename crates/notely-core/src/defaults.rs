//! Centralized default constants for notely.
//!
//! Shared defaults live here so the repository, query builder and HTTP layer
//! agree on the same values.

// =============================================================================
// NOTE SCHEMA
// =============================================================================

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Color assigned to new notes (blue).
pub const NOTE_COLOR: &str = "#3B82F6";

// =============================================================================
// PAGINATION
// =============================================================================

/// Page returned when `page` is absent or unusable.
pub const PAGE: i64 = 1;

/// Page size when `limit` is absent or unusable.
pub const PAGE_LIMIT: i64 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(PAGE, 1);
        assert_eq!(PAGE_LIMIT, 10);
    }

    #[test]
    fn test_note_color_is_hex() {
        assert!(NOTE_COLOR.starts_with('#'));
        assert_eq!(NOTE_COLOR.len(), 7);
    }
}
