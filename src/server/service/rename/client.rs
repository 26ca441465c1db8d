//! Outbound rename call against the Discord REST API.
//!
//! [`DiscordRenameClient`] issues one `PATCH /channels/{id}` per call and classifies
//! the response into a [`RenameError`]. Channels and categories share the same
//! endpoint, so one client covers both resource types.

use async_trait::async_trait;
use dioxus_logger::tracing;
use reqwest::{header::RETRY_AFTER, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::server::error::rename::RenameError;

/// Audit log entry shown in the guild for every rename this service applies.
const AUDIT_LOG_REASON: &str = "Coalesced rename request";

/// Renames a single resource.
///
/// Implementations must classify every failure into [`RenameError`] and must not
/// retry on their own; retries belong to the queue.
#[async_trait]
pub trait RenameClient: Send + Sync {
    async fn rename(&self, resource_id: &str, new_name: &str) -> Result<(), RenameError>;
}

#[derive(Serialize)]
struct RenameBody<'a> {
    name: &'a str,
}

/// Body Discord sends with a 429.
#[derive(Deserialize)]
struct RateLimitBody {
    retry_after: f64,
}

/// [`RenameClient`] backed by the Discord REST API.
pub struct DiscordRenameClient {
    http: reqwest::Client,
    api_base: Url,
    bot_token: String,
}

impl DiscordRenameClient {
    /// Creates a client.
    ///
    /// # Arguments
    /// - `http` - Shared reqwest client; its timeout bounds every call
    /// - `api_base` - Versioned API root, e.g. `https://discord.com/api/v10`
    /// - `bot_token` - Bot token sent as `Authorization: Bot {token}`
    pub fn new(http: reqwest::Client, api_base: Url, bot_token: String) -> Self {
        Self {
            http,
            api_base,
            bot_token,
        }
    }

    /// Builds `{api_base}/channels/{resource_id}`.
    ///
    /// The id is pushed as a single escaped segment, so it can never address
    /// another route.
    fn channel_url(&self, resource_id: &str) -> Result<Url, RenameError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| RenameError::Transient {
                reason: format!("API base {} cannot carry a path", self.api_base),
            })?
            .pop_if_empty()
            .push("channels")
            .push(resource_id);
        Ok(url)
    }
}

/// Whether `value` has the shape of a Discord snowflake: a non-empty run of ASCII digits.
pub fn is_snowflake(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[async_trait]
impl RenameClient for DiscordRenameClient {
    async fn rename(&self, resource_id: &str, new_name: &str) -> Result<(), RenameError> {
        if !is_snowflake(resource_id) {
            tracing::warn!(resource_id = %resource_id, "Refusing to rename a non-snowflake id");
            return Err(RenameError::NotFound);
        }

        let response = self
            .http
            .patch(self.channel_url(resource_id)?)
            .header("Authorization", format!("Bot {}", self.bot_token))
            .header("X-Audit-Log-Reason", AUDIT_LOG_REASON)
            .json(&RenameBody { name: new_name })
            .send()
            .await
            .map_err(|e| RenameError::Transient {
                reason: describe_send_error(&e),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let retry_after_header = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();

        let error = classify_failure(status, retry_after_header.as_deref(), &body);
        tracing::debug!(
            resource_id = %resource_id,
            status = status.as_u16(),
            kind = error.kind(),
            "Discord rejected rename"
        );

        Err(error)
    }
}

/// Maps a non-success response onto the rename error taxonomy.
///
/// # Arguments
/// - `status` - Response status, expected to be non-2xx
/// - `retry_after_header` - Raw `Retry-After` header, if present
/// - `body` - Response body, used for Discord's JSON `retry_after`
pub fn classify_failure(
    status: StatusCode,
    retry_after_header: Option<&str>,
    body: &str,
) -> RenameError {
    match status {
        StatusCode::NOT_FOUND => RenameError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RenameError::Forbidden,
        StatusCode::TOO_MANY_REQUESTS => RenameError::RateLimited {
            retry_after: retry_after_from_body(body)
                .or_else(|| retry_after_header.and_then(parse_seconds)),
        },
        other => RenameError::Transient {
            reason: format!("Unexpected response status {}", other.as_u16()),
        },
    }
}

fn retry_after_from_body(body: &str) -> Option<Duration> {
    serde_json::from_str::<RateLimitBody>(body)
        .ok()
        .and_then(|parsed| Duration::try_from_secs_f64(parsed.retry_after).ok())
}

fn parse_seconds(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

fn describe_send_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request to Discord timed out".to_string()
    } else if error.is_connect() {
        format!("Failed to connect to Discord: {}", error)
    } else {
        format!("Request to Discord failed: {}", error)
    }
}
