//! Pending rename factory for creating test target entries.

use crate::factory::helpers::{next_id, next_resource_id};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating pending rename targets with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::pending_rename::PendingRenameFactory;
///
/// let target = PendingRenameFactory::new(&db)
///     .resource_id("987654321")
///     .name("Staging Area")
///     .build()
///     .await?;
/// ```
pub struct PendingRenameFactory<'a> {
    db: &'a DatabaseConnection,
    resource_id: String,
    name: String,
    updated_at: DateTime<Utc>,
}

impl<'a> PendingRenameFactory<'a> {
    /// Creates a new PendingRenameFactory with default values.
    ///
    /// Defaults:
    /// - resource_id: unique snowflake-like id
    /// - name: `"Channel {id}"`
    /// - updated_at: `Utc::now()`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            resource_id: next_resource_id(),
            name: format!("Channel {}", next_id()),
            updated_at: Utc::now(),
        }
    }

    /// Sets the resource ID.
    pub fn resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = resource_id.into();
        self
    }

    /// Sets the desired name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the last write timestamp.
    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Builds and inserts the pending rename entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::pending_rename::Model)` - Created entity
    /// - `Err(DbErr)` - Database error during insert, including a duplicate resource id
    pub async fn build(self) -> Result<entity::pending_rename::Model, DbErr> {
        entity::pending_rename::ActiveModel {
            resource_id: ActiveValue::Set(self.resource_id),
            name: ActiveValue::Set(self.name),
            updated_at: ActiveValue::Set(self.updated_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a pending rename target for a specific resource.
///
/// Shorthand for `PendingRenameFactory::new(db).resource_id(..).name(..).build().await`.
pub async fn create_pending_rename(
    db: &DatabaseConnection,
    resource_id: &str,
    name: &str,
) -> Result<entity::pending_rename::Model, DbErr> {
    PendingRenameFactory::new(db)
        .resource_id(resource_id)
        .name(name)
        .build()
        .await
}
