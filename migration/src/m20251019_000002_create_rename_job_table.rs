use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RenameJob::Table)
                    .if_not_exists()
                    .col(pk_auto(RenameJob::Id))
                    .col(string_uniq(RenameJob::JobId))
                    .col(string(RenameJob::ResourceId))
                    .col(string(RenameJob::State))
                    .col(integer(RenameJob::AttemptsMade).default(0))
                    .col(integer(RenameJob::MaxAttempts))
                    .col(big_integer(RenameJob::InitialBackoffMs))
                    .col(timestamp_with_time_zone(RenameJob::RunAt))
                    .col(text_null(RenameJob::LastError))
                    .col(
                        timestamp_with_time_zone(RenameJob::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(RenameJob::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone_null(RenameJob::FinishedAt))
                    .to_owned(),
            )
            .await?;

        // Claim queries scan by state and due time
        manager
            .create_index(
                Index::create()
                    .name("idx_rename_job_state_run_at")
                    .table(RenameJob::Table)
                    .col(RenameJob::State)
                    .col(RenameJob::RunAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RenameJob::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RenameJob {
    Table,
    Id,
    JobId,
    ResourceId,
    State,
    AttemptsMade,
    MaxAttempts,
    InitialBackoffMs,
    RunAt,
    LastError,
    CreatedAt,
    UpdatedAt,
    FinishedAt,
}
