//! Rename job factory for placing queue rows in arbitrary states.

use crate::factory::helpers::next_resource_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating rename job rows.
///
/// Writes the row directly, bypassing the queue's enqueue path, so tests can
/// start from states such as `running` or `abandoned`. The `job_id` follows
/// the queue's `rename-{resource_id}` convention unless overridden.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::rename_job::RenameJobFactory;
///
/// let job = RenameJobFactory::new(&db)
///     .resource_id("123")
///     .state("running")
///     .build()
///     .await?;
/// ```
pub struct RenameJobFactory<'a> {
    db: &'a DatabaseConnection,
    job_id: Option<String>,
    resource_id: String,
    state: String,
    attempts_made: i32,
    max_attempts: i32,
    initial_backoff_ms: i64,
    run_at: DateTime<Utc>,
    last_error: Option<String>,
    finished_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl<'a> RenameJobFactory<'a> {
    /// Creates a new RenameJobFactory with default values.
    ///
    /// Defaults:
    /// - resource_id: unique snowflake-like id
    /// - state: `"pending"`
    /// - attempts_made: `0`, max_attempts: `7`
    /// - initial_backoff_ms: `90_000`
    /// - run_at: `Utc::now()`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            job_id: None,
            resource_id: next_resource_id(),
            state: "pending".to_string(),
            attempts_made: 0,
            max_attempts: 7,
            initial_backoff_ms: 90_000,
            run_at: Utc::now(),
            last_error: None,
            finished_at: None,
            updated_at: None,
        }
    }

    /// Overrides the derived job id.
    pub fn job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    /// Sets the resource ID.
    pub fn resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = resource_id.into();
        self
    }

    /// Sets the stored state string (`pending`, `running`, `retry_scheduled`,
    /// `succeeded`, `failed` or `abandoned`).
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Sets the number of attempts already made.
    pub fn attempts_made(mut self, attempts_made: i32) -> Self {
        self.attempts_made = attempts_made;
        self
    }

    /// Sets the attempt budget.
    pub fn max_attempts(mut self, max_attempts: i32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the first retry delay in milliseconds.
    pub fn initial_backoff_ms(mut self, initial_backoff_ms: i64) -> Self {
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }

    /// Sets when the job becomes due.
    pub fn run_at(mut self, run_at: DateTime<Utc>) -> Self {
        self.run_at = run_at;
        self
    }

    /// Sets the recorded error of the last attempt.
    pub fn last_error(mut self, last_error: impl Into<String>) -> Self {
        self.last_error = Some(last_error.into());
        self
    }

    /// Sets when the job reached a terminal state.
    pub fn finished_at(mut self, finished_at: DateTime<Utc>) -> Self {
        self.finished_at = Some(finished_at);
        self
    }

    /// Sets when the row last changed state. Defaults to the insert time.
    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds and inserts the rename job entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::rename_job::Model)` - Created job row
    /// - `Err(DbErr)` - Database error during insert, including a duplicate job id
    pub async fn build(self) -> Result<entity::rename_job::Model, DbErr> {
        let now = Utc::now();
        let job_id = self
            .job_id
            .unwrap_or_else(|| format!("rename-{}", self.resource_id));

        entity::rename_job::ActiveModel {
            job_id: ActiveValue::Set(job_id),
            resource_id: ActiveValue::Set(self.resource_id),
            state: ActiveValue::Set(self.state),
            attempts_made: ActiveValue::Set(self.attempts_made),
            max_attempts: ActiveValue::Set(self.max_attempts),
            initial_backoff_ms: ActiveValue::Set(self.initial_backoff_ms),
            run_at: ActiveValue::Set(self.run_at),
            last_error: ActiveValue::Set(self.last_error),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(self.updated_at.unwrap_or(now)),
            finished_at: ActiveValue::Set(self.finished_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a pending, immediately due rename job for a resource.
pub async fn create_rename_job(
    db: &DatabaseConnection,
    resource_id: &str,
) -> Result<entity::rename_job::Model, DbErr> {
    RenameJobFactory::new(db).resource_id(resource_id).build().await
}
