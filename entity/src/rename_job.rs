use sea_orm::entity::prelude::*;

/// Queued rename job, at most one row per resource.
///
/// `job_id` is derived from `resource_id` and is unique, which is what keeps
/// repeated requests for one resource from spawning a second job.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rename_job")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub job_id: String,
    pub resource_id: String,
    pub state: String,
    pub attempts_made: i32,
    pub max_attempts: i32,
    pub initial_backoff_ms: i64,
    pub run_at: DateTimeUtc,
    pub last_error: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub finished_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
