//! Application state shared across all request handlers.
//!
//! `AppState` is built once at startup and cloned into each handler through Axum's
//! state extraction. Every field is cheap to clone.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::server::model::rename_job::JobOptions;

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool shared with the queue runner.
    pub db: DatabaseConnection,

    /// Attempt budget and backoff applied to jobs enqueued by requests.
    pub job_options: JobOptions,

    /// Bearer token producers must present.
    pub api_token: Arc<str>,
}

impl AppState {
    /// Creates the application state.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `job_options` - Options for newly enqueued rename jobs
    /// - `api_token` - Producer bearer token
    pub fn new(db: DatabaseConnection, job_options: JobOptions, api_token: &str) -> Self {
        Self {
            db,
            job_options,
            api_token: Arc::from(api_token),
        }
    }
}
