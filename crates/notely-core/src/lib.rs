//! # notely-core
//!
//! Core types, traits, and validation for the notely note service.
//!
//! This crate provides the note data model, the listing query plan, and the
//! repository and generation traits that the other notely crates implement.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use query::{page_count, ListNotesParams, NoteFilter, NoteQuery};
pub use tags::{normalize_tag, normalize_tags};
pub use traits::*;
