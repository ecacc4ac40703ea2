//! HTTP handlers for notely-api.

pub mod notes;
pub mod system;
pub mod tags;
