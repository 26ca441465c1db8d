use super::*;

/// Tests scheduling the next attempt of a running job.
///
/// Expected: Ok(true) with the job retry-scheduled at the given time
#[tokio::test]
async fn schedules_retry() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();
    let run_at = now + Duration::seconds(90);

    let row = RenameJobFactory::new(db).state("running").build().await?;

    let repo = RenameJobRepository::new(db);
    let scheduled = repo
        .schedule_retry(row.id, 1, run_at, "Rate limited".to_string(), now)
        .await?;

    assert!(scheduled);
    let job = repo.find_by_id(row.id).await?.unwrap();
    assert_eq!(job.state, JobState::RetryScheduled);
    assert_eq!(job.attempts_made, 1);
    assert_eq!(job.run_at, run_at);
    assert_eq!(job.last_error.as_deref(), Some("Rate limited"));
    assert!(job.finished_at.is_none());

    Ok(())
}

/// Tests turning a running job back into a fresh pending one.
///
/// Expected: Ok(true) with attempts reset and the new due time
#[tokio::test]
async fn restarts_running_job() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();
    let run_at = now + Duration::seconds(90);

    let row = RenameJobFactory::new(db)
        .state("running")
        .attempts_made(3)
        .last_error("Rate limited")
        .build()
        .await?;

    let repo = RenameJobRepository::new(db);

    assert!(repo.restart(row.id, run_at, now).await?);
    let job = repo.find_by_id(row.id).await?.unwrap();
    assert_eq!(job.state, JobState::Pending);
    assert_eq!(job.attempts_made, 0);
    assert_eq!(job.run_at, run_at);
    assert!(job.last_error.is_none());

    Ok(())
}
