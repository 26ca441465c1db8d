use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::server::model::rename_job::{JobOptions, JobState, RenameJob};

use entity::rename_job::Column;

/// Repository for the durable rename queue.
///
/// Stores one row per job id. Every transition is a conditional `UPDATE` guarded by
/// the state it expects to leave, and callers learn from the affected row count
/// whether they won the transition.
pub struct RenameJobRepository<'a> {
    /// Database connection for executing queries.
    db: &'a DatabaseConnection,
}

impl<'a> RenameJobRepository<'a> {
    /// Creates a new repository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection reference
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a job by its deterministic job id.
    ///
    /// # Returns
    /// - `Ok(Some(RenameJob))` - Job row exists, in any state
    /// - `Ok(None)` - No job has ever been enqueued under this id (or it was pruned)
    /// - `Err(DbErr)` - Database error or invalid stored state
    pub async fn find_by_job_id(&self, job_id: &str) -> Result<Option<RenameJob>, DbErr> {
        entity::prelude::RenameJob::find()
            .filter(Column::JobId.eq(job_id))
            .one(self.db)
            .await?
            .map(RenameJob::from_entity)
            .transpose()
    }

    /// Finds a job by row id.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<RenameJob>, DbErr> {
        entity::prelude::RenameJob::find_by_id(id)
            .one(self.db)
            .await?
            .map(RenameJob::from_entity)
            .transpose()
    }

    /// Inserts a pending job unless a row with the same job id already exists.
    ///
    /// # Arguments
    /// - `job_id` - Deterministic job id
    /// - `resource_id` - Resource the job renames
    /// - `options` - Attempt budget and backoff
    /// - `now` - Creation time; the job is due immediately
    ///
    /// # Returns
    /// - `Ok(true)` - Row inserted
    /// - `Ok(false)` - A row for this job id already exists, nothing changed
    /// - `Err(DbErr)` - Database error during insert
    pub async fn insert_if_absent(
        &self,
        job_id: &str,
        resource_id: &str,
        options: JobOptions,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let inserted = entity::prelude::RenameJob::insert(entity::rename_job::ActiveModel {
            job_id: ActiveValue::Set(job_id.to_string()),
            resource_id: ActiveValue::Set(resource_id.to_string()),
            state: ActiveValue::Set(JobState::Pending.as_str().to_string()),
            attempts_made: ActiveValue::Set(0),
            max_attempts: ActiveValue::Set(to_i32(options.max_attempts)),
            initial_backoff_ms: ActiveValue::Set(options.backoff.initial_ms()),
            run_at: ActiveValue::Set(now),
            last_error: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            finished_at: ActiveValue::Set(None),
            ..Default::default()
        })
        .on_conflict(OnConflict::column(Column::JobId).do_nothing().to_owned())
        .exec_without_returning(self.db)
        .await?;

        Ok(inserted > 0)
    }

    /// Resets a terminal job to pending with a fresh attempt budget.
    ///
    /// Leaves pending, running and retry-scheduled jobs untouched.
    ///
    /// # Returns
    /// - `Ok(true)` - The terminal row was re-armed
    /// - `Ok(false)` - No row, or the row is still active
    /// - `Err(DbErr)` - Database error during update
    pub async fn rearm_if_terminal(
        &self,
        job_id: &str,
        options: JobOptions,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::RenameJob::update_many()
            .col_expr(Column::State, Expr::value(JobState::Pending.as_str()))
            .col_expr(Column::AttemptsMade, Expr::value(0))
            .col_expr(Column::MaxAttempts, Expr::value(to_i32(options.max_attempts)))
            .col_expr(
                Column::InitialBackoffMs,
                Expr::value(options.backoff.initial_ms()),
            )
            .col_expr(Column::RunAt, Expr::value(now))
            .col_expr(Column::LastError, Expr::value(Option::<String>::None))
            .col_expr(Column::FinishedAt, Expr::value(Option::<DateTime<Utc>>::None))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::JobId.eq(job_id))
            .filter(Column::State.is_in(state_strings(&JobState::TERMINAL)))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Lists claimable jobs whose `run_at` has passed, oldest due first.
    ///
    /// # Arguments
    /// - `now` - Current time
    /// - `limit` - Maximum number of jobs to return
    pub async fn find_due(&self, now: DateTime<Utc>, limit: u64) -> Result<Vec<RenameJob>, DbErr> {
        entity::prelude::RenameJob::find()
            .filter(Column::State.is_in(state_strings(&JobState::CLAIMABLE)))
            .filter(Column::RunAt.lte(now))
            .order_by_asc(Column::RunAt)
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(self.db)
            .await?
            .into_iter()
            .map(RenameJob::from_entity)
            .collect()
    }

    /// Moves a due job to running.
    ///
    /// Only one caller can win this transition for a given row, which is what gives
    /// each resource at most one attempt in flight.
    ///
    /// # Returns
    /// - `Ok(Some(RenameJob))` - The job is now running and owned by the caller
    /// - `Ok(None)` - Someone else claimed it first, or it is no longer due
    /// - `Err(DbErr)` - Database error during update
    pub async fn claim(&self, id: i32, now: DateTime<Utc>) -> Result<Option<RenameJob>, DbErr> {
        let result = entity::prelude::RenameJob::update_many()
            .col_expr(Column::State, Expr::value(JobState::Running.as_str()))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::State.is_in(state_strings(&JobState::CLAIMABLE)))
            .filter(Column::RunAt.lte(now))
            .exec(self.db)
            .await?;

        if result.rows_affected != 1 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    /// Finishes a running job in a terminal state.
    ///
    /// # Arguments
    /// - `id` - Row id of the running job
    /// - `state` - `Succeeded`, `Failed` or `Abandoned`
    /// - `attempts_made` - Attempt count including the one just finished
    /// - `last_error` - Error to record, `None` on success
    /// - `now` - Completion time
    ///
    /// # Returns
    /// - `Ok(true)` - Job finished
    /// - `Ok(false)` - The job was not running
    /// - `Err(DbErr)` - Database error during update
    pub async fn finish(
        &self,
        id: i32,
        state: JobState,
        attempts_made: u32,
        last_error: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::RenameJob::update_many()
            .col_expr(Column::State, Expr::value(state.as_str()))
            .col_expr(Column::AttemptsMade, Expr::value(to_i32(attempts_made)))
            .col_expr(Column::LastError, Expr::value(last_error))
            .col_expr(Column::FinishedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::State.eq(JobState::Running.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Schedules the next attempt of a running job.
    ///
    /// # Returns
    /// - `Ok(true)` - Job is retry-scheduled for `run_at`
    /// - `Ok(false)` - The job was not running
    /// - `Err(DbErr)` - Database error during update
    pub async fn schedule_retry(
        &self,
        id: i32,
        attempts_made: u32,
        run_at: DateTime<Utc>,
        last_error: String,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::RenameJob::update_many()
            .col_expr(Column::State, Expr::value(JobState::RetryScheduled.as_str()))
            .col_expr(Column::AttemptsMade, Expr::value(to_i32(attempts_made)))
            .col_expr(Column::RunAt, Expr::value(run_at))
            .col_expr(Column::LastError, Expr::value(Some(last_error)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::State.eq(JobState::Running.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Turns a running job back into a fresh pending job due at `run_at`.
    ///
    /// Used when a newer name arrived while the running attempt applied an older one.
    pub async fn restart(
        &self,
        id: i32,
        run_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::RenameJob::update_many()
            .col_expr(Column::State, Expr::value(JobState::Pending.as_str()))
            .col_expr(Column::AttemptsMade, Expr::value(0))
            .col_expr(Column::RunAt, Expr::value(run_at))
            .col_expr(Column::LastError, Expr::value(Option::<String>::None))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::State.eq(JobState::Running.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Returns every running job to pending.
    ///
    /// Only safe while no runner is active, i.e. at startup: jobs still marked
    /// running were interrupted by a previous process and must be delivered again.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of jobs recovered
    pub async fn reset_running(&self, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::RenameJob::update_many()
            .col_expr(Column::State, Expr::value(JobState::Pending.as_str()))
            .col_expr(Column::RunAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::State.eq(JobState::Running.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Returns running jobs whose claim is older than `stalled_before` to pending.
    ///
    /// A running row is only touched again by its settle, so a row this old has
    /// lost its attempt. Attempts made are kept.
    ///
    /// # Arguments
    /// - `stalled_before` - Running rows last updated before this are expired
    /// - `now` - Current time, used as the new `run_at`
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of jobs expired
    pub async fn expire_running(
        &self,
        stalled_before: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::RenameJob::update_many()
            .col_expr(Column::State, Expr::value(JobState::Pending.as_str()))
            .col_expr(Column::RunAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::State.eq(JobState::Running.as_str()))
            .filter(Column::UpdatedAt.lt(stalled_before))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes every job in the given state.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of rows deleted
    pub async fn delete_in_state(&self, state: JobState) -> Result<u64, DbErr> {
        let result = entity::prelude::RenameJob::delete_many()
            .filter(Column::State.eq(state.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes all but the `keep` most recently finished jobs in the given states.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of rows deleted
    pub async fn prune_finished(&self, states: &[JobState], keep: u64) -> Result<u64, DbErr> {
        let stale_ids: Vec<i32> = entity::prelude::RenameJob::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::State.is_in(state_strings(states)))
            .order_by_desc(Column::FinishedAt)
            .order_by_desc(Column::Id)
            .offset(keep)
            // SQLite rejects OFFSET without LIMIT
            .limit(i64::MAX as u64)
            .into_tuple()
            .all(self.db)
            .await?;

        if stale_ids.is_empty() {
            return Ok(0);
        }

        let result = entity::prelude::RenameJob::delete_many()
            .filter(Column::Id.is_in(stale_ids))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

fn state_strings(states: &[JobState]) -> Vec<&'static str> {
    states.iter().map(JobState::as_str).collect()
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
