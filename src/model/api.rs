use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing API response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    pub error: String,
}
