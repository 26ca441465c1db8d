//! SeaORM entities for the rename coordinator tables.

pub mod prelude;

pub mod pending_rename;
pub mod rename_job;
