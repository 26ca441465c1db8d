use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to rename a Discord channel or category.
///
/// Submitted by category/zone management whenever a user-visible name changes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenameRequestDto {
    /// Discord id (snowflake) of the channel or category to rename.
    pub resource_id: String,
    /// Name the resource should end up with.
    pub name: String,
}
