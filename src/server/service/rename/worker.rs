use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::pending_rename::PendingRenameRepository,
    error::rename::RenameError,
    model::rename_job::RenameJob,
    service::rename::{client::RenameClient, limiter::LocalPermitCheck},
};

/// What a single attempt observed, handed to the queue for settlement.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// The pending name was applied and cleared.
    Applied { name: String },
    /// `applied` was set, but a newer name was stored while the call was in flight.
    Superseded { applied: String },
    /// No pending name existed; no call was made.
    Stale,
    /// The attempt failed with a classified error.
    Failed(RenameError),
}

/// Runs one attempt of a claimed rename job.
///
/// The desired name is never part of the job; it is read from the pending target
/// store at execution time, which is what lets many requests collapse into one
/// rename carrying the latest name.
pub struct RenameWorker<'a> {
    db: &'a DatabaseConnection,
    client: &'a dyn RenameClient,
    permits: &'a LocalPermitCheck,
}

impl<'a> RenameWorker<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        client: &'a dyn RenameClient,
        permits: &'a LocalPermitCheck,
    ) -> Self {
        Self {
            db,
            client,
            permits,
        }
    }

    /// Executes one attempt for `job`.
    ///
    /// Only the first attempt consults the local permit check; a denial becomes a
    /// rate limit without a network call. On a terminal failure the pending name is
    /// deleted; retryable failures leave it in place.
    pub async fn attempt(&self, job: &RenameJob) -> AttemptOutcome {
        let store = PendingRenameRepository::new(self.db);
        let resource_id = job.resource_id.as_str();

        let target = match store.get(resource_id).await {
            Ok(Some(target)) => target,
            Ok(None) => return AttemptOutcome::Stale,
            Err(e) => {
                return AttemptOutcome::Failed(RenameError::Transient {
                    reason: format!("Failed to read pending name: {}", e),
                })
            }
        };

        tracing::info!(
            job_id = %job.job_id,
            resource_id = %resource_id,
            attempt = job.attempt_number(),
            name = %target.name,
            "Rename attempt started"
        );

        if job.is_first_attempt() && !self.permits.check(resource_id) {
            return AttemptOutcome::Failed(RenameError::RateLimited { retry_after: None });
        }

        if let Err(error) = self.client.rename(resource_id, &target.name).await {
            if error.clears_target() {
                if let Err(e) = store.delete(resource_id).await {
                    tracing::error!(
                        resource_id = %resource_id,
                        "Failed to clear pending name after {}: {}",
                        error.kind(),
                        e
                    );
                }
            }
            return AttemptOutcome::Failed(error);
        }

        match store.delete_if_name(resource_id, &target.name).await {
            Ok(true) => AttemptOutcome::Applied { name: target.name },
            Ok(false) => match store.get(resource_id).await {
                Ok(Some(_)) => AttemptOutcome::Superseded {
                    applied: target.name,
                },
                Ok(None) => AttemptOutcome::Applied { name: target.name },
                // Unknown whether a newer name exists; another pass is harmless.
                Err(e) => {
                    tracing::error!(
                        resource_id = %resource_id,
                        "Failed to re-read pending name: {}",
                        e
                    );
                    AttemptOutcome::Superseded {
                        applied: target.name,
                    }
                }
            },
            Err(e) => {
                tracing::error!(
                    resource_id = %resource_id,
                    "Failed to clear applied pending name: {}",
                    e
                );
                AttemptOutcome::Applied { name: target.name }
            }
        }
    }
}
