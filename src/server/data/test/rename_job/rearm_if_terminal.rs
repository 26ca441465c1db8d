use super::*;

/// Tests re-arming each terminal state.
///
/// Expected: Ok(true) with attempts reset, errors cleared and the job due now
#[tokio::test]
async fn rearms_terminal_jobs() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();

    for (resource_id, state) in [("1", "succeeded"), ("2", "failed"), ("3", "abandoned")] {
        RenameJobFactory::new(db)
            .resource_id(resource_id)
            .state(state)
            .attempts_made(7)
            .last_error("Rate limited")
            .finished_at(now - Duration::minutes(5))
            .build()
            .await?;
    }

    let repo = RenameJobRepository::new(db);
    for resource_id in ["1", "2", "3"] {
        let rearmed = repo
            .rearm_if_terminal(&job_id_for(resource_id), JobOptions::default(), now)
            .await?;
        assert!(rearmed);

        let job = repo.find_by_job_id(&job_id_for(resource_id)).await?.unwrap();
        assert_eq!(job.state, JobState::Pending);
        assert_eq!(job.attempts_made, 0);
        assert_eq!(job.run_at, now);
        assert!(job.last_error.is_none());
        assert!(job.finished_at.is_none());
    }

    Ok(())
}

/// Tests that active jobs are never reset.
///
/// Expected: Ok(false) and the job keeps its state and attempt count
#[tokio::test]
async fn leaves_active_jobs_alone() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    for (resource_id, state) in [("1", "pending"), ("2", "running"), ("3", "retry_scheduled")] {
        RenameJobFactory::new(db)
            .resource_id(resource_id)
            .state(state)
            .attempts_made(2)
            .build()
            .await?;
    }

    let repo = RenameJobRepository::new(db);
    for resource_id in ["1", "2", "3"] {
        let rearmed = repo
            .rearm_if_terminal(&job_id_for(resource_id), JobOptions::default(), Utc::now())
            .await?;
        assert!(!rearmed);

        let job = repo.find_by_job_id(&job_id_for(resource_id)).await?.unwrap();
        assert_eq!(job.attempts_made, 2);
    }

    Ok(())
}

/// Tests re-arming a job id that has no row.
///
/// Expected: Ok(false)
#[tokio::test]
async fn reports_missing_job() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RenameJob)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RenameJobRepository::new(db);

    assert!(
        !repo
            .rearm_if_terminal("rename-404", JobOptions::default(), Utc::now())
            .await?
    );

    Ok(())
}
