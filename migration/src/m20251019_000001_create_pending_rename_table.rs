use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PendingRename::Table)
                    .if_not_exists()
                    .col(string(PendingRename::ResourceId).primary_key())
                    .col(string(PendingRename::Name))
                    .col(
                        timestamp_with_time_zone(PendingRename::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingRename::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PendingRename {
    Table,
    ResourceId,
    Name,
    UpdatedAt,
}
