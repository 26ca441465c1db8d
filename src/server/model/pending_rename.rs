//! Pending rename target domain model.

use chrono::{DateTime, Utc};

/// Most recently requested name for a resource.
///
/// Only the newest write survives; the worker reads this at execution time
/// rather than trusting anything carried in the job.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTarget {
    /// Discord id of the channel or category.
    pub resource_id: String,
    /// Name the resource should end up with.
    pub name: String,
    /// When the name was last written.
    pub updated_at: DateTime<Utc>,
}

impl PendingTarget {
    /// Converts an entity model to a domain model at the repository boundary.
    pub fn from_entity(entity: entity::pending_rename::Model) -> Self {
        Self {
            resource_id: entity.resource_id,
            name: entity.name,
            updated_at: entity.updated_at,
        }
    }
}
