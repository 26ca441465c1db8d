//! Rename job domain models.
//!
//! Provides the queue's view of a job: its deterministic identity, lifecycle state,
//! attempt accounting and backoff policy. Handles conversion from the stored entity,
//! where states are lowercase strings and durations are milliseconds.

use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::DbErr;
use std::{fmt, time::Duration};

/// Prefix of every rename job id.
pub const JOB_ID_PREFIX: &str = "rename-";

/// Derives the job id for a resource.
///
/// The id depends on nothing but the resource id, so every request for the same
/// resource maps onto the same queue row.
pub fn job_id_for(resource_id: &str) -> String {
    format!("{}{}", JOB_ID_PREFIX, resource_id)
}

/// Lifecycle state of a rename job.
///
/// `Pending → Running → {Succeeded | RetryScheduled → Running | Failed | Abandoned}`.
/// A `RetryScheduled` job becomes claimable again once its `run_at` has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Pending,
    Running,
    RetryScheduled,
    Succeeded,
    Failed,
    Abandoned,
}

impl JobState {
    /// States a job can be claimed from.
    pub const CLAIMABLE: [JobState; 2] = [JobState::Pending, JobState::RetryScheduled];

    /// States after which the job row may be re-armed for a new request.
    pub const TERMINAL: [JobState; 3] =
        [JobState::Succeeded, JobState::Failed, JobState::Abandoned];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::RetryScheduled => "retry_scheduled",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Abandoned => "abandoned",
        }
    }

    /// Parses a stored state string.
    ///
    /// # Returns
    /// - `Ok(JobState)` - Known state
    /// - `Err(DbErr::Custom)` - Unknown value in the `state` column
    pub fn from_db(value: &str) -> Result<Self, DbErr> {
        match value {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "retry_scheduled" => Ok(Self::RetryScheduled),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            "abandoned" => Ok(Self::Abandoned),
            other => Err(DbErr::Custom(format!("Unknown rename job state: {}", other))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        Self::TERMINAL.contains(self)
    }

    /// Pending, running or waiting for a retry: a new request must not enqueue.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exponential backoff between attempts of one job.
///
/// The n-th failure waits `initial * 2^(n-1)`; the sequence never decreases and
/// saturates instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    initial: Duration,
}

impl BackoffPolicy {
    pub fn exponential(initial: Duration) -> Self {
        Self { initial }
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    /// Delay to wait after the given number of failed attempts.
    ///
    /// # Arguments
    /// - `failures` - Failed attempts so far, including the one just observed
    ///
    /// # Returns
    /// - `Duration` - `initial` for the first failure, doubling for each further one
    pub fn delay_for(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1);
        let factor = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
        self.initial.saturating_mul(factor)
    }

    /// Stored representation of the initial delay.
    pub fn initial_ms(&self) -> i64 {
        i64::try_from(self.initial.as_millis()).unwrap_or(i64::MAX)
    }

    pub fn from_initial_ms(ms: i64) -> Self {
        Self::exponential(Duration::from_millis(ms.max(0) as u64))
    }
}

/// Attempt budget and backoff a job is enqueued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOptions {
    pub max_attempts: u32,
    pub backoff: BackoffPolicy,
}

impl Default for JobOptions {
    /// Seven attempts, starting at 90 seconds. Discord allows two renames per
    /// channel every ten minutes, so the retries at 90s, 180s and 360s cover
    /// one full cooldown and the rest are headroom.
    fn default() -> Self {
        Self {
            max_attempts: 7,
            backoff: BackoffPolicy::exponential(Duration::from_secs(90)),
        }
    }
}

/// Result of asking the queue to enqueue a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// No row existed for the job id; a new one was inserted.
    Created,
    /// A terminal row was reset to pending with a fresh attempt budget.
    Rearmed,
    /// A pending, running or retry-scheduled job already exists.
    AlreadyActive,
}

/// A queued rename job.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameJob {
    /// Row id, used for state transitions.
    pub id: i32,
    /// Deterministic identity derived from the resource id.
    pub job_id: String,
    /// Resource to rename. The desired name is read from the pending target store.
    pub resource_id: String,
    pub state: JobState,
    /// Attempts finished so far; `0` while the first attempt is running.
    pub attempts_made: u32,
    pub max_attempts: u32,
    pub backoff: BackoffPolicy,
    /// Earliest time the job may be claimed.
    pub run_at: DateTime<Utc>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RenameJob {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(RenameJob)` - Successfully converted domain model
    /// - `Err(DbErr::Custom)` - Unknown state string or negative counters
    pub fn from_entity(entity: entity::rename_job::Model) -> Result<Self, DbErr> {
        let attempts_made = u32::try_from(entity.attempts_made)
            .map_err(|e| DbErr::Custom(format!("Failed to parse attempts_made: {}", e)))?;
        let max_attempts = u32::try_from(entity.max_attempts)
            .map_err(|e| DbErr::Custom(format!("Failed to parse max_attempts: {}", e)))?;

        Ok(Self {
            id: entity.id,
            job_id: entity.job_id,
            resource_id: entity.resource_id,
            state: JobState::from_db(&entity.state)?,
            attempts_made,
            max_attempts,
            backoff: BackoffPolicy::from_initial_ms(entity.initial_backoff_ms),
            run_at: entity.run_at,
            last_error: entity.last_error,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            finished_at: entity.finished_at,
        })
    }

    /// 1-based number of the attempt currently being made.
    pub fn attempt_number(&self) -> u32 {
        self.attempts_made + 1
    }

    pub fn is_first_attempt(&self) -> bool {
        self.attempts_made == 0
    }
}

/// Adds a std duration to a timestamp, clamping at the latest representable time.
pub fn after(now: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(delay)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
