mod pending_rename;
mod rename_job;
