//! Service layer for request orchestration.

pub mod notes;

pub use notes::{NoteService, SummarizedNote};
