use super::*;

/// Tests claiming a due job.
///
/// Expected: Ok(Some) with the job now running
#[tokio::test]
async fn claims_due_job() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();

    let row = RenameJobFactory::new(db)
        .resource_id("1001")
        .run_at(now - Duration::seconds(1))
        .build()
        .await?;

    let repo = RenameJobRepository::new(db);
    let claimed = repo.claim(row.id, now).await?;

    let claimed = claimed.expect("job should be claimed");
    assert_eq!(claimed.state, JobState::Running);
    assert_eq!(claimed.resource_id, "1001");

    Ok(())
}

/// Tests that a job can only be claimed once.
///
/// Verifies per-resource exclusivity: the second claim of the same row loses.
///
/// Expected: Ok(None) on the second claim
#[tokio::test]
async fn second_claim_loses() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();

    let row = RenameJobFactory::new(db).run_at(now).build().await?;

    let repo = RenameJobRepository::new(db);

    assert!(repo.claim(row.id, now).await?.is_some());
    assert!(repo.claim(row.id, now).await?.is_none());

    Ok(())
}

/// Tests that a retry scheduled in the future cannot be claimed early.
///
/// Expected: Ok(None) and the job stays retry-scheduled
#[tokio::test]
async fn does_not_claim_before_run_at() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();

    let row = RenameJobFactory::new(db)
        .state("retry_scheduled")
        .run_at(now + Duration::seconds(90))
        .build()
        .await?;

    let repo = RenameJobRepository::new(db);

    assert!(repo.claim(row.id, now).await?.is_none());
    let job = repo.find_by_id(row.id).await?.unwrap();
    assert_eq!(job.state, JobState::RetryScheduled);

    Ok(())
}
