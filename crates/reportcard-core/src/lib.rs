//! reportcard-core
//!
//! Pure domain types for the tutorial progress report: the report record,
//! language bundles, validation, application state and session snapshots.
//! No rendering or network dependency. This is the shared vocabulary of the
//! reportcard workspace.

pub mod date;
pub mod error;
pub mod models;
pub mod session;
pub mod state;
pub mod text;
pub mod validate;
