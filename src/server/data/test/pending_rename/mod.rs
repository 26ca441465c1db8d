use crate::server::data::pending_rename::PendingRenameRepository;
use chrono::Utc;
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

mod delete;
mod delete_if_name;
mod get;
mod set;
