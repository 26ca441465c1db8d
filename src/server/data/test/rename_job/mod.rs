use crate::server::{
    data::rename_job::RenameJobRepository,
    model::rename_job::{job_id_for, JobOptions, JobState},
};
use chrono::{Duration, Utc};
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory, factory::rename_job::RenameJobFactory};

mod claim;
mod find_due;
mod finish;
mod prune_finished;
mod rearm_if_terminal;
mod reset_running;
mod schedule_retry;
