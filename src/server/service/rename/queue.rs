use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;
use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{pending_rename::PendingRenameRepository, rename_job::RenameJobRepository},
    error::{rename::RenameError, AppError},
    model::rename_job::{after, EnqueueOutcome, JobOptions, JobState, RenameJob},
    service::rename::worker::AttemptOutcome,
};

/// Durable rename queue.
///
/// Wraps [`RenameJobRepository`] with the queue semantics the coordinator relies on:
/// dedup by job id on enqueue, exclusive claims, and settlement of an attempt's
/// outcome into the next job state.
pub struct RenameQueue<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RenameQueue<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enqueues a job unless an active job with the same id exists.
    ///
    /// A terminal row is re-armed in place with a fresh attempt budget. Both steps
    /// are conditional statements, so concurrent callers never produce two active
    /// jobs for one id.
    ///
    /// # Returns
    /// - `Ok(EnqueueOutcome)` - Whether a job was created, re-armed or already active
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn enqueue(
        &self,
        job_id: &str,
        resource_id: &str,
        options: JobOptions,
        now: DateTime<Utc>,
    ) -> Result<EnqueueOutcome, AppError> {
        let repo = RenameJobRepository::new(self.db);

        let outcome = if repo
            .insert_if_absent(job_id, resource_id, options, now)
            .await?
        {
            EnqueueOutcome::Created
        } else if repo.rearm_if_terminal(job_id, options, now).await? {
            EnqueueOutcome::Rearmed
        } else {
            EnqueueOutcome::AlreadyActive
        };

        if outcome != EnqueueOutcome::AlreadyActive {
            tracing::info!(
                job_id = %job_id,
                resource_id = %resource_id,
                rearmed = outcome == EnqueueOutcome::Rearmed,
                "Rename job enqueued"
            );
        }

        Ok(outcome)
    }

    /// Current state of a job, `None` if no row exists.
    pub async fn get_state(&self, job_id: &str) -> Result<Option<JobState>, AppError> {
        let job = RenameJobRepository::new(self.db)
            .find_by_job_id(job_id)
            .await?;

        Ok(job.map(|job| job.state))
    }

    /// Claims up to `limit` due jobs for this caller.
    ///
    /// Jobs another caller claims between the listing and the claim are skipped.
    ///
    /// # Returns
    /// - `Ok(Vec<RenameJob>)` - Jobs now running and owned by the caller
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<RenameJob>, AppError> {
        let repo = RenameJobRepository::new(self.db);

        let mut claimed = Vec::new();
        for job in repo.find_due(now, limit).await? {
            if let Some(job) = repo.claim(job.id, now).await? {
                claimed.push(job);
            }
        }

        Ok(claimed)
    }

    /// Records the outcome of an attempt and moves the job to its next state.
    ///
    /// - `Applied` and `Stale` finish the job as succeeded.
    /// - `Superseded` restarts the job as a fresh pending job after the initial delay.
    ///   The attempt count starts over on each restart, so a resource whose name keeps
    ///   changing keeps its job alive; every restart follows an applied rename and
    ///   waits the initial delay, which holds it to Discord's rename pace.
    /// - A terminal error finishes the job as failed.
    /// - A retryable error schedules the next attempt, or abandons the job once the
    ///   attempt budget is spent.
    ///
    /// A producer that writes a name while the job is running coalesces into it. After
    /// finishing as succeeded or failed the store is read once more, and a name found
    /// there re-arms the job, so such a write is never left without a job.
    ///
    /// # Arguments
    /// - `job` - The running job, as returned by [`claim_due`](Self::claim_due)
    /// - `outcome` - What the attempt observed
    /// - `now` - Settlement time
    ///
    /// # Returns
    /// - `Ok(JobState)` - State the job was moved to
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn settle(
        &self,
        job: &RenameJob,
        outcome: AttemptOutcome,
        now: DateTime<Utc>,
    ) -> Result<JobState, AppError> {
        let repo = RenameJobRepository::new(self.db);
        let attempts = job.attempt_number();

        let (next, applied) = match outcome {
            AttemptOutcome::Applied { name } => {
                tracing::info!(
                    job_id = %job.job_id,
                    resource_id = %job.resource_id,
                    attempt = attempts,
                    name = %name,
                    "Rename applied"
                );
                let applied = repo
                    .finish(job.id, JobState::Succeeded, attempts, None, now)
                    .await?;
                (JobState::Succeeded, applied)
            }
            AttemptOutcome::Stale => {
                tracing::info!(
                    job_id = %job.job_id,
                    resource_id = %job.resource_id,
                    attempt = attempts,
                    "No pending name left, nothing to rename"
                );
                let applied = repo
                    .finish(job.id, JobState::Succeeded, attempts, None, now)
                    .await?;
                (JobState::Succeeded, applied)
            }
            AttemptOutcome::Superseded { applied: name } => {
                let run_at = after(now, job.backoff.initial());
                tracing::info!(
                    job_id = %job.job_id,
                    resource_id = %job.resource_id,
                    attempt = attempts,
                    applied = %name,
                    run_at = %run_at,
                    "Newer name arrived during rename, restarting job"
                );
                let applied = repo.restart(job.id, run_at, now).await?;
                (JobState::Pending, applied)
            }
            AttemptOutcome::Failed(error) if !error.is_retryable() => {
                tracing::warn!(
                    job_id = %job.job_id,
                    resource_id = %job.resource_id,
                    attempt = attempts,
                    kind = error.kind(),
                    "Rename failed permanently: {}",
                    error
                );
                let applied = repo
                    .finish(
                        job.id,
                        JobState::Failed,
                        attempts,
                        Some(error.to_string()),
                        now,
                    )
                    .await?;
                (JobState::Failed, applied)
            }
            AttemptOutcome::Failed(error) if attempts >= job.max_attempts => {
                let error = RenameError::ExhaustedRetries {
                    attempts,
                    last: Box::new(error),
                };
                tracing::warn!(
                    job_id = %job.job_id,
                    resource_id = %job.resource_id,
                    attempt = attempts,
                    kind = error.kind(),
                    "Rename abandoned: {}",
                    error
                );
                let applied = repo
                    .finish(
                        job.id,
                        JobState::Abandoned,
                        attempts,
                        Some(error.to_string()),
                        now,
                    )
                    .await?;
                (JobState::Abandoned, applied)
            }
            AttemptOutcome::Failed(error) => {
                let run_at = after(now, job.backoff.delay_for(attempts));
                tracing::info!(
                    job_id = %job.job_id,
                    resource_id = %job.resource_id,
                    attempt = attempts,
                    kind = error.kind(),
                    retry_after_secs = error.retry_after().map(|d| d.as_secs_f64()),
                    run_at = %run_at,
                    "Rename attempt failed, retry scheduled: {}",
                    error
                );
                let applied = repo
                    .schedule_retry(job.id, attempts, run_at, error.to_string(), now)
                    .await?;
                (JobState::RetryScheduled, applied)
            }
        };

        if !applied {
            tracing::warn!(
                job_id = %job.job_id,
                "Rename job was no longer running at settlement, outcome dropped"
            );
            return Ok(next);
        }

        if matches!(next, JobState::Succeeded | JobState::Failed)
            && self.rearm_if_requested(job, now).await?
        {
            return Ok(JobState::Pending);
        }

        Ok(next)
    }

    /// Re-arms a just-finished job if a name was stored while it ran.
    ///
    /// Runs after the job left `running`: a producer writing later than this read
    /// already sees a terminal job and enqueues on its own.
    async fn rearm_if_requested(
        &self,
        job: &RenameJob,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        match PendingRenameRepository::new(self.db)
            .get(&job.resource_id)
            .await
        {
            Ok(None) => return Ok(false),
            Ok(Some(_)) => {}
            // A spare attempt finds no name and finishes as stale.
            Err(e) => tracing::warn!(
                job_id = %job.job_id,
                "Failed to re-read pending name after settlement: {}",
                e
            ),
        }

        let options = JobOptions {
            max_attempts: job.max_attempts,
            backoff: job.backoff,
        };
        let rearmed = RenameJobRepository::new(self.db)
            .rearm_if_terminal(&job.job_id, options, now)
            .await?;

        if rearmed {
            tracing::info!(
                job_id = %job.job_id,
                resource_id = %job.resource_id,
                "Name requested during attempt, rename job re-armed"
            );
        }

        Ok(rearmed)
    }

    /// Returns jobs left running by a previous process to pending.
    pub async fn recover_stalled(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let recovered = RenameJobRepository::new(self.db)
            .reset_running(now)
            .await?;

        if recovered > 0 {
            tracing::info!("Recovered {} interrupted rename jobs", recovered);
        }

        Ok(recovered)
    }

    /// Returns jobs claimed longer than `lease` ago to pending.
    ///
    /// An attempt never outlives the request timeout, so a job still running past
    /// its lease was claimed by an attempt whose settle failed.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of jobs expired
    pub async fn expire_stalled(
        &self,
        now: DateTime<Utc>,
        lease: Duration,
    ) -> Result<u64, AppError> {
        let stalled_before = TimeDelta::from_std(lease)
            .ok()
            .and_then(|lease| now.checked_sub_signed(lease))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let expired = RenameJobRepository::new(self.db)
            .expire_running(stalled_before, now)
            .await?;

        if expired > 0 {
            tracing::warn!("Expired {} stalled rename jobs", expired);
        }

        Ok(expired)
    }

    /// Deletes succeeded jobs and all but the `keep_failed` newest failed or
    /// abandoned jobs.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of rows removed
    pub async fn housekeeping(&self, keep_failed: u64) -> Result<u64, AppError> {
        let repo = RenameJobRepository::new(self.db);

        let succeeded = repo.delete_in_state(JobState::Succeeded).await?;
        let pruned = repo
            .prune_finished(&[JobState::Failed, JobState::Abandoned], keep_failed)
            .await?;

        tracing::debug!(
            succeeded,
            pruned,
            "Rename queue housekeeping removed finished jobs"
        );

        Ok(succeeded + pruned)
    }
}
