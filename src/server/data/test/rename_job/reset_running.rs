use super::*;

/// Tests recovering jobs interrupted by a previous process.
///
/// Expected: Ok(2); running jobs become pending and keep their attempt counts
#[tokio::test]
async fn returns_running_jobs_to_pending() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();

    let first = RenameJobFactory::new(db)
        .state("running")
        .attempts_made(2)
        .build()
        .await?;
    RenameJobFactory::new(db).state("running").build().await?;
    let waiting = RenameJobFactory::new(db)
        .state("retry_scheduled")
        .run_at(now + Duration::seconds(90))
        .build()
        .await?;

    let repo = RenameJobRepository::new(db);
    let recovered = repo.reset_running(now).await?;

    assert_eq!(recovered, 2);
    let first = repo.find_by_id(first.id).await?.unwrap();
    assert_eq!(first.state, JobState::Pending);
    assert_eq!(first.attempts_made, 2);
    let waiting = repo.find_by_id(waiting.id).await?.unwrap();
    assert_eq!(waiting.state, JobState::RetryScheduled);

    Ok(())
}
