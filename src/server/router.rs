use axum::{
    routing::{get, post},
    Router,
};

use crate::server::{
    controller::{openapi, rename::request_rename},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/renames", post(request_rename))
        .route("/api/openapi.json", get(openapi))
}
