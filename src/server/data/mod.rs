//! Database repository layer for the rename coordinator.
//!
//! Repositories use SeaORM entity models internally and return domain models so the
//! service layer never handles raw rows. Each state transition of a job is a single
//! conditional statement, which is what keeps two callers from both believing they own
//! the same job.

pub mod pending_rename;
pub mod rename_job;

pub use pending_rename::PendingRenameRepository;
pub use rename_job::RenameJobRepository;

#[cfg(test)]
mod test;
