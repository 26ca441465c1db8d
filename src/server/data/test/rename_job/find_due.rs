use super::*;

/// Tests that only claimable jobs whose run_at has passed are returned.
///
/// Expected: Ok with the due pending and retry-scheduled jobs, oldest first
#[tokio::test]
async fn returns_due_claimable_jobs_in_order() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();

    RenameJobFactory::new(db)
        .resource_id("late")
        .run_at(now - Duration::seconds(10))
        .build()
        .await?;
    RenameJobFactory::new(db)
        .resource_id("early")
        .state("retry_scheduled")
        .attempts_made(1)
        .run_at(now - Duration::seconds(60))
        .build()
        .await?;
    RenameJobFactory::new(db)
        .resource_id("future")
        .state("retry_scheduled")
        .run_at(now + Duration::seconds(60))
        .build()
        .await?;
    RenameJobFactory::new(db)
        .resource_id("busy")
        .state("running")
        .run_at(now - Duration::seconds(60))
        .build()
        .await?;
    RenameJobFactory::new(db)
        .resource_id("done")
        .state("succeeded")
        .run_at(now - Duration::seconds(60))
        .build()
        .await?;

    let repo = RenameJobRepository::new(db);
    let due = repo.find_due(now, 10).await?;

    let resources: Vec<&str> = due.iter().map(|job| job.resource_id.as_str()).collect();
    assert_eq!(resources, vec!["early", "late"]);

    Ok(())
}

/// Tests that the batch limit is honoured.
///
/// Expected: Ok with at most `limit` jobs
#[tokio::test]
async fn respects_limit() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();

    for _ in 0..5 {
        RenameJobFactory::new(db)
            .run_at(now - Duration::seconds(1))
            .build()
            .await?;
    }

    let repo = RenameJobRepository::new(db);

    assert_eq!(repo.find_due(now, 3).await?.len(), 3);

    Ok(())
}
