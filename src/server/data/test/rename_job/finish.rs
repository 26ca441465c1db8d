use super::*;

/// Tests finishing a running job as failed.
///
/// Expected: Ok(true) with state, attempts, error and finish time recorded
#[tokio::test]
async fn finishes_running_job() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();

    let row = RenameJobFactory::new(db).state("running").build().await?;

    let repo = RenameJobRepository::new(db);
    let finished = repo
        .finish(
            row.id,
            JobState::Failed,
            1,
            Some("Missing permission to rename resource".to_string()),
            now,
        )
        .await?;

    assert!(finished);
    let job = repo.find_by_id(row.id).await?.unwrap();
    assert_eq!(job.state, JobState::Failed);
    assert_eq!(job.attempts_made, 1);
    assert_eq!(
        job.last_error.as_deref(),
        Some("Missing permission to rename resource")
    );
    assert_eq!(job.finished_at, Some(now));

    Ok(())
}

/// Tests that only running jobs can be finished.
///
/// Expected: Ok(false) and the pending job is unchanged
#[tokio::test]
async fn ignores_job_that_is_not_running() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = RenameJobFactory::new(db).state("pending").build().await?;

    let repo = RenameJobRepository::new(db);

    assert!(
        !repo
            .finish(row.id, JobState::Succeeded, 1, None, Utc::now())
            .await?
    );
    assert_eq!(
        repo.find_by_id(row.id).await?.unwrap().state,
        JobState::Pending
    );

    Ok(())
}
