//! Closed failure taxonomy for renaming a Discord resource.
//!
//! Every failure of the outbound rename call is classified into exactly one
//! [`RenameError`] at the client boundary. The worker and queue branch only on
//! [`RenameError::is_retryable`] and [`RenameError::clears_target`]; raw HTTP
//! status codes never travel past the client.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenameError {
    /// The channel or category no longer exists.
    ///
    /// Terminal. The pending name is dropped since nothing can apply it.
    #[error("Resource not found")]
    NotFound,

    /// The bot is not allowed to rename the resource, or its credentials were rejected.
    ///
    /// Terminal. The pending name is dropped.
    #[error("Missing permission to rename resource")]
    Forbidden,

    /// Discord throttled the request, or the local permit check denied it.
    ///
    /// Retryable. `retry_after` carries Discord's hint when one was sent; it is
    /// informational only as the queue's backoff decides the next attempt.
    #[error("Rate limited")]
    RateLimited {
        /// Delay Discord asked for before the next request
        retry_after: Option<Duration>,
    },

    /// Network failure, timeout or an unexpected response from Discord.
    ///
    /// Retryable.
    #[error("Transient failure: {reason}")]
    Transient {
        /// Human readable description for the job log
        reason: String,
    },

    /// A retryable failure persisted until the job ran out of attempts.
    ///
    /// Recorded when a job is abandoned. The pending name is kept so a later
    /// request re-arms the job.
    #[error("Gave up after {attempts} attempts: {last}")]
    ExhaustedRetries {
        /// Attempts made before giving up
        attempts: u32,
        /// Failure observed on the final attempt
        last: Box<RenameError>,
    },
}

impl RenameError {
    /// Whether the queue should schedule another attempt after this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Transient { .. })
    }

    /// Whether this failure makes the pending name pointless to keep.
    pub fn clears_target(&self) -> bool {
        matches!(self, Self::NotFound | Self::Forbidden)
    }

    /// Short stable name of the kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::RateLimited { .. } => "rate_limited",
            Self::Transient { .. } => "transient",
            Self::ExhaustedRetries { .. } => "exhausted_retries",
        }
    }

    /// Retry hint carried by a rate limit, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}
