use super::*;

/// Tests keeping only the most recently finished failures.
///
/// Expected: Ok(2) with the two oldest failed rows deleted
#[tokio::test]
async fn keeps_most_recent_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();

    for minutes in 1..=4 {
        RenameJobFactory::new(db)
            .resource_id(format!("failed-{}", minutes))
            .state("failed")
            .finished_at(now - Duration::minutes(minutes))
            .build()
            .await?;
    }
    RenameJobFactory::new(db)
        .resource_id("active")
        .state("retry_scheduled")
        .build()
        .await?;

    let repo = RenameJobRepository::new(db);
    let pruned = repo
        .prune_finished(&[JobState::Failed, JobState::Abandoned], 2)
        .await?;

    assert_eq!(pruned, 2);
    assert!(repo.find_by_job_id("rename-failed-1").await?.is_some());
    assert!(repo.find_by_job_id("rename-failed-2").await?.is_some());
    assert!(repo.find_by_job_id("rename-failed-3").await?.is_none());
    assert!(repo.find_by_job_id("rename-failed-4").await?.is_none());
    assert!(repo.find_by_job_id("rename-active").await?.is_some());

    Ok(())
}

/// Tests deleting all succeeded rows.
///
/// Expected: Ok(1) with only the succeeded row removed
#[tokio::test]
async fn deletes_rows_in_state() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_rename_job(db, "pending").await?;
    RenameJobFactory::new(db)
        .resource_id("done")
        .state("succeeded")
        .finished_at(Utc::now())
        .build()
        .await?;

    let repo = RenameJobRepository::new(db);

    assert_eq!(repo.delete_in_state(JobState::Succeeded).await?, 1);
    let count = entity::prelude::RenameJob::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}
