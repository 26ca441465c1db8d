//! Server-side domain models.
//!
//! Domain models are converted from entity models at the repository boundary so that
//! the service layer works with typed states, durations and counts instead of the raw
//! strings and integers stored in the database.

pub mod pending_rename;
pub mod rename_job;
