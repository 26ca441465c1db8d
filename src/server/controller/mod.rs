//! HTTP handlers.
//!
//! Controllers check access, validate the request DTO, call the service layer and
//! map the result onto a status code. The OpenAPI document is assembled here from
//! the handlers' `utoipa::path` annotations.

pub mod rename;

use axum::Json;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::model::{api::ErrorDto, rename::RenameRequestDto};

#[derive(OpenApi)]
#[openapi(
    info(title = "Rename coordinator", description = "Coalescing Discord channel rename queue"),
    paths(rename::request_rename, openapi),
    components(schemas(RenameRequestDto, ErrorDto)),
    tags((name = "rename", description = "Channel and category rename requests")),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

/// Registers the producer bearer token scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Serve the OpenAPI document.
#[utoipa::path(
    get,
    path = "/api/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document")
    ),
)]
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
