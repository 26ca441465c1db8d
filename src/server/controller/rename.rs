use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::{api::ErrorDto, rename::RenameRequestDto},
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        service::rename::{client::is_snowflake, RenameCoalescer},
        state::AppState,
    },
};

/// Tag for grouping rename endpoints in OpenAPI documentation
pub static RENAME_TAG: &str = "rename";

/// Discord rejects channel and category names longer than this.
const MAX_NAME_CHARS: usize = 100;

/// Request a rename of a Discord channel or category.
///
/// Records the name and makes sure a rename job exists for the resource. Requests
/// for the same resource that arrive before the job runs collapse into a single
/// rename carrying the latest name. The rename itself happens asynchronously.
///
/// # Access Control
/// - Bearer token matching `RENAME_API_TOKEN`
///
/// # Returns
/// - `202 Accepted` - Name recorded and a job is queued or already active
/// - `400 Bad Request` - Resource id not a snowflake, blank name, or a name over
///   100 characters
/// - `401 Unauthorized` - Missing or invalid bearer token
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    post,
    path = "/api/renames",
    tag = RENAME_TAG,
    request_body = RenameRequestDto,
    responses(
        (status = 202, description = "Rename request accepted"),
        (status = 400, description = "Invalid rename request", body = ErrorDto),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = [])),
)]
pub async fn request_rename(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RenameRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.api_token, &headers).require()?;

    let resource_id = payload.resource_id.trim();
    if resource_id.is_empty() {
        return Err(AppError::BadRequest("resource_id must not be blank".to_string()));
    }
    if !is_snowflake(resource_id) {
        return Err(AppError::BadRequest(
            "resource_id must be a Discord snowflake".to_string(),
        ));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be blank".to_string()));
    }
    if payload.name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::BadRequest(format!(
            "name must be at most {} characters",
            MAX_NAME_CHARS
        )));
    }

    RenameCoalescer::new(&state.db, state.job_options)
        .request_rename(resource_id, &payload.name)
        .await?;

    Ok(StatusCode::ACCEPTED)
}
