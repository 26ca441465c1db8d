pub use super::pending_rename::Entity as PendingRename;
pub use super::rename_job::Entity as RenameJob;
