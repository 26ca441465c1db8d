use chrono::{DateTime, Utc};
use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinSet;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    config::RenameSettings,
    error::AppError,
    model::rename_job::RenameJob,
    service::rename::{LocalPermitCheck, RenameClient, RenameQueue, RenameWorker},
};

/// Slack on top of the request timeout before a running job counts as stalled.
const LEASE_MARGIN: Duration = Duration::from_secs(60);

/// Consumer side of the rename queue.
///
/// Each tick claims a batch of due jobs and runs every attempt on its own task, so
/// distinct resources are renamed concurrently. A resource never has two attempts
/// in flight because its single job row can only be claimed once.
#[derive(Clone)]
pub struct RenameRunner {
    db: DatabaseConnection,
    client: Arc<dyn RenameClient>,
    permits: Arc<LocalPermitCheck>,
    batch_size: u64,
    keep_failed: u64,
    lease: Duration,
}

impl RenameRunner {
    pub fn new(
        db: DatabaseConnection,
        client: Arc<dyn RenameClient>,
        permits: Arc<LocalPermitCheck>,
        settings: &RenameSettings,
    ) -> Self {
        Self {
            db,
            client,
            permits,
            batch_size: settings.batch_size,
            keep_failed: settings.keep_failed_jobs,
            lease: settings.request_timeout + LEASE_MARGIN,
        }
    }

    /// Returns jobs interrupted by a previous process to the queue.
    ///
    /// Must run before the first tick.
    pub async fn recover(&self) -> Result<u64, AppError> {
        RenameQueue::new(&self.db).recover_stalled(Utc::now()).await
    }

    /// Claims the jobs due at `now` and waits for all of their attempts to settle.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of jobs claimed
    /// - `Err(AppError::DbErr)` - Due jobs could not be claimed
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let jobs = RenameQueue::new(&self.db)
            .claim_due(now, self.batch_size)
            .await?;
        let claimed = jobs.len();

        let mut tasks = JoinSet::new();
        for job in jobs {
            let runner = self.clone();
            tasks.spawn(async move { runner.run(job).await });
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!("Rename task aborted: {}", e);
            }
        }

        Ok(claimed)
    }

    async fn run(&self, job: RenameJob) {
        let outcome = RenameWorker::new(&self.db, self.client.as_ref(), &self.permits)
            .attempt(&job)
            .await;

        if let Err(e) = RenameQueue::new(&self.db)
            .settle(&job, outcome, Utc::now())
            .await
        {
            // The job stays running until housekeeping expires its lease.
            tracing::error!(job_id = %job.job_id, "Failed to settle rename job: {}", e);
        }
    }

    /// Expires stalled claims, prunes finished jobs and forgets idle permit keys.
    pub async fn housekeeping(&self) -> Result<u64, AppError> {
        let queue = RenameQueue::new(&self.db);
        queue.expire_stalled(Utc::now(), self.lease).await?;
        let removed = queue.housekeeping(self.keep_failed).await?;
        self.permits.forget_idle();

        tracing::debug!(
            removed,
            tracked_resources = self.permits.tracked(),
            "Rename queue housekeeping finished"
        );

        Ok(removed)
    }
}

/// Starts the rename queue scheduler.
///
/// Recovers interrupted jobs, then registers two repeated jobs:
/// - a poll every `poll_interval` that runs due renames
/// - housekeeping every `housekeeping_interval`
///
/// # Returns
/// - `Ok(JobScheduler)` - Running scheduler; keep it to shut it down
/// - `Err(AppError)` - Recovery failed or the scheduler could not start
pub async fn start_scheduler(
    runner: RenameRunner,
    settings: &RenameSettings,
) -> Result<JobScheduler, AppError> {
    runner.recover().await?;

    let scheduler = JobScheduler::new().await?;

    let poll_runner = runner.clone();
    let poll = Job::new_repeated_async(settings.poll_interval, move |_uuid, _lock| {
        let runner = poll_runner.clone();

        Box::pin(async move {
            match runner.tick(Utc::now()).await {
                Ok(0) => {}
                Ok(claimed) => tracing::debug!("Processed {} rename jobs", claimed),
                Err(e) => tracing::error!("Error processing rename queue: {}", e),
            }
        })
    })?;

    let housekeeping = Job::new_repeated_async(settings.housekeeping_interval, move |_uuid, _lock| {
        let runner = runner.clone();

        Box::pin(async move {
            if let Err(e) = runner.housekeeping().await {
                tracing::error!("Error during rename queue housekeeping: {}", e);
            }
        })
    })?;

    scheduler.add(poll).await?;
    scheduler.add(housekeeping).await?;
    scheduler.start().await?;

    tracing::info!(
        "Rename queue scheduler started, polling every {:?}",
        settings.poll_interval
    );

    Ok(scheduler)
}
