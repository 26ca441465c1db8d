use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Request carried no `Authorization: Bearer` header.
    #[error("Request is missing a bearer token")]
    MissingToken,

    /// Bearer token did not match the configured producer token.
    #[error("Request carried an invalid bearer token")]
    InvalidToken,
}

/// Converts authentication errors into HTTP responses.
///
/// Both variants map to 401 Unauthorized with the same generic message so a
/// caller cannot tell a missing token from a wrong one. Details are logged at
/// debug level.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorDto {
                error: "Unauthorized".to_string(),
            }),
        )
            .into_response()
    }
}
