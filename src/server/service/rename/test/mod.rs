use crate::server::{
    data::{pending_rename::PendingRenameRepository, rename_job::RenameJobRepository},
    error::rename::RenameError,
    model::rename_job::{job_id_for, BackoffPolicy, EnqueueOutcome, JobOptions, JobState, RenameJob},
    service::rename::{
        mock::MockRenameClient, AttemptOutcome, LocalPermitCheck, RenameCoalescer, RenameQueue,
        RenameWorker,
    },
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use std::num::NonZeroU32;
use test_utils::{builder::TestBuilder, factory, factory::rename_job::RenameJobFactory};


/// Discord's allowance: two renames per ten minutes.
fn permits() -> LocalPermitCheck {
    LocalPermitCheck::new(NonZeroU32::new(2).unwrap(), std::time::Duration::from_secs(600))
}

/// Claims every job due at `now` and runs one attempt for each, as the runner does.
async fn run_due(
    db: &DatabaseConnection,
    client: &MockRenameClient,
    permits: &LocalPermitCheck,
    now: DateTime<Utc>,
) -> Vec<JobState> {
    let queue = RenameQueue::new(db);
    let worker = RenameWorker::new(db, client, permits);

    let mut settled = Vec::new();
    for job in queue.claim_due(now, 100).await.unwrap() {
        let outcome = worker.attempt(&job).await;
        settled.push(queue.settle(&job, outcome, now).await.unwrap());
    }
    settled
}

async fn job_for(db: &DatabaseConnection, resource_id: &str) -> RenameJob {
    RenameJobRepository::new(db)
        .find_by_job_id(&job_id_for(resource_id))
        .await
        .unwrap()
        .expect("job should exist")
}

async fn pending_name(db: &DatabaseConnection, resource_id: &str) -> Option<String> {
    PendingRenameRepository::new(db)
        .get(resource_id)
        .await
        .unwrap()
        .map(|target| target.name)
}

async fn job_count(db: &DatabaseConnection) -> u64 {
    entity::prelude::RenameJob::find().count(db).await.unwrap()
}
