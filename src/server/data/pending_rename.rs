use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::OnConflict, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

use crate::server::model::pending_rename::PendingTarget;

/// Repository for the shared target store.
///
/// Maps a resource id to the most recently requested name. Writes overwrite without
/// reading first, so the last writer always wins. Only the rename coordinator touches
/// this table.
pub struct PendingRenameRepository<'a> {
    /// Database connection for executing queries.
    db: &'a DatabaseConnection,
}

impl<'a> PendingRenameRepository<'a> {
    /// Creates a new repository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection reference
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the pending name for a resource.
    ///
    /// # Returns
    /// - `Ok(Some(PendingTarget))` - A name is waiting to be applied
    /// - `Ok(None)` - Nothing pending; any earlier request was applied or dropped
    /// - `Err(DbErr)` - Database error during query
    pub async fn get(&self, resource_id: &str) -> Result<Option<PendingTarget>, DbErr> {
        let entity = entity::prelude::PendingRename::find_by_id(resource_id.to_string())
            .one(self.db)
            .await?;

        Ok(entity.map(PendingTarget::from_entity))
    }

    /// Overwrites the pending name for a resource.
    ///
    /// Inserts the entry or replaces the name of an existing one in a single statement.
    ///
    /// # Arguments
    /// - `resource_id` - Discord id of the channel or category
    /// - `name` - Desired name
    /// - `now` - Write timestamp
    ///
    /// # Returns
    /// - `Ok(())` - Name stored
    /// - `Err(DbErr)` - Database error during upsert
    pub async fn set(&self, resource_id: &str, name: &str, now: DateTime<Utc>) -> Result<(), DbErr> {
        entity::prelude::PendingRename::insert(entity::pending_rename::ActiveModel {
            resource_id: ActiveValue::Set(resource_id.to_string()),
            name: ActiveValue::Set(name.to_string()),
            updated_at: ActiveValue::Set(now),
        })
        .on_conflict(
            OnConflict::column(entity::pending_rename::Column::ResourceId)
                .update_columns([
                    entity::pending_rename::Column::Name,
                    entity::pending_rename::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        Ok(())
    }

    /// Deletes the pending name for a resource.
    ///
    /// # Returns
    /// - `Ok(true)` - An entry was removed
    /// - `Ok(false)` - Nothing was pending
    /// - `Err(DbErr)` - Database error during deletion
    pub async fn delete(&self, resource_id: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::PendingRename::delete_many()
            .filter(entity::pending_rename::Column::ResourceId.eq(resource_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes the pending name only if it still equals `name`.
    ///
    /// Used after a successful rename so a name written while the request was in
    /// flight is not lost.
    ///
    /// # Returns
    /// - `Ok(true)` - The applied name was removed
    /// - `Ok(false)` - The entry is gone or holds a different name
    /// - `Err(DbErr)` - Database error during deletion
    pub async fn delete_if_name(&self, resource_id: &str, name: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::PendingRename::delete_many()
            .filter(entity::pending_rename::Column::ResourceId.eq(resource_id))
            .filter(entity::pending_rename::Column::Name.eq(name))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
