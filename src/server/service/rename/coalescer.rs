use chrono::Utc;
use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::pending_rename::PendingRenameRepository,
    error::AppError,
    model::rename_job::{job_id_for, EnqueueOutcome, JobOptions},
    service::rename::queue::RenameQueue,
};

/// Entry point for producers that want a resource renamed.
///
/// A request only records the desired name and makes sure one job exists for the
/// resource. However many requests arrive before that job runs, it applies
/// whichever name was stored last.
pub struct RenameCoalescer<'a> {
    db: &'a DatabaseConnection,
    options: JobOptions,
}

impl<'a> RenameCoalescer<'a> {
    pub fn new(db: &'a DatabaseConnection, options: JobOptions) -> Self {
        Self { db, options }
    }

    /// Records `desired_name` for the resource and enqueues a job if none is active.
    ///
    /// # Returns
    /// - `Ok(EnqueueOutcome)` - Name stored; whether a job was created, re-armed or
    ///   already active
    /// - `Err(AppError::DbErr)` - The name could not be stored or the job could not be
    ///   enqueued
    pub async fn request_rename(
        &self,
        resource_id: &str,
        desired_name: &str,
    ) -> Result<EnqueueOutcome, AppError> {
        let now = Utc::now();
        let job_id = job_id_for(resource_id);
        let queue = RenameQueue::new(self.db);

        PendingRenameRepository::new(self.db)
            .set(resource_id, desired_name, now)
            .await
            .inspect_err(|e| {
                tracing::error!(resource_id = %resource_id, "Failed to store pending name: {}", e)
            })?;

        if let Some(state) = queue.get_state(&job_id).await? {
            if state.is_active() {
                tracing::debug!(
                    job_id = %job_id,
                    state = %state,
                    "Rename coalesced into active job"
                );
                return Ok(EnqueueOutcome::AlreadyActive);
            }
        }

        queue
            .enqueue(&job_id, resource_id, self.options, now)
            .await
            .inspect_err(|e| {
                tracing::error!(job_id = %job_id, "Failed to enqueue rename job: {}", e)
            })
    }
}
