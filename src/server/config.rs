use std::{num::NonZeroU32, str::FromStr, time::Duration};

use dioxus_logger::tracing::Level;
use url::Url;

use crate::server::{
    error::{config::ConfigError, AppError},
    model::rename_job::{BackoffPolicy, JobOptions},
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DISCORD_API_BASE_URL: &str = "https://discord.com/api/v10";

/// Discord allows two channel renames per ten minutes; the first retry waits
/// longer than that window.
const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 90;
const DEFAULT_MAX_ATTEMPTS: u32 = 7;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_BATCH_SIZE: u64 = 25;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LOCAL_LIMIT_BURST: u32 = 2;
const DEFAULT_LOCAL_LIMIT_WINDOW_SECS: u64 = 600;
const DEFAULT_HOUSEKEEPING_INTERVAL_SECS: u64 = 300;
const DEFAULT_KEEP_FAILED_JOBS: u64 = 1000;

pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub log_level: Level,

    pub discord_bot_token: String,
    pub discord_api_base_url: Url,

    /// Bearer token producers present on `POST /api/renames`.
    pub rename_api_token: String,

    pub rename: RenameSettings,
}

/// Tuning for the rename queue, its runner and the local permit check.
#[derive(Debug, Clone)]
pub struct RenameSettings {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub poll_interval: Duration,
    pub batch_size: u64,
    pub request_timeout: Duration,
    pub local_limit_burst: NonZeroU32,
    pub local_limit_window: Duration,
    pub housekeeping_interval: Duration,
    pub keep_failed_jobs: u64,
}

impl RenameSettings {
    /// Attempt budget and backoff applied to every newly enqueued job.
    pub fn job_options(&self) -> JobOptions {
        JobOptions {
            max_attempts: self.max_attempts,
            backoff: BackoffPolicy::exponential(self.initial_backoff),
        }
    }
}

impl Default for RenameSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: Duration::from_secs(DEFAULT_INITIAL_BACKOFF_SECS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            local_limit_burst: NonZeroU32::new(DEFAULT_LOCAL_LIMIT_BURST)
                .unwrap_or(NonZeroU32::MIN),
            local_limit_window: Duration::from_secs(DEFAULT_LOCAL_LIMIT_WINDOW_SECS),
            housekeeping_interval: Duration::from_secs(DEFAULT_HOUSEKEEPING_INTERVAL_SECS),
            keep_failed_jobs: DEFAULT_KEEP_FAILED_JOBS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// `from_env` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        let api_base = env.optional("DISCORD_API_BASE_URL", DEFAULT_DISCORD_API_BASE_URL.to_string())?;
        let discord_api_base_url = Url::parse(&api_base).map_err(|e| ConfigError::InvalidEnvVar {
            name: "DISCORD_API_BASE_URL".to_string(),
            reason: e.to_string(),
        })?;

        let rename = RenameSettings {
            max_attempts: env.positive("RENAME_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            initial_backoff: Duration::from_secs(
                env.positive("RENAME_INITIAL_BACKOFF_SECS", DEFAULT_INITIAL_BACKOFF_SECS)?,
            ),
            poll_interval: Duration::from_secs(
                env.positive("RENAME_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?,
            ),
            batch_size: env.positive("RENAME_BATCH_SIZE", DEFAULT_BATCH_SIZE)?,
            request_timeout: Duration::from_secs(
                env.positive("RENAME_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            ),
            local_limit_burst: env.optional(
                "RENAME_LOCAL_LIMIT_BURST",
                NonZeroU32::new(DEFAULT_LOCAL_LIMIT_BURST).unwrap_or(NonZeroU32::MIN),
            )?,
            local_limit_window: Duration::from_secs(env.positive(
                "RENAME_LOCAL_LIMIT_WINDOW_SECS",
                DEFAULT_LOCAL_LIMIT_WINDOW_SECS,
            )?),
            housekeeping_interval: Duration::from_secs(env.positive(
                "RENAME_HOUSEKEEPING_INTERVAL_SECS",
                DEFAULT_HOUSEKEEPING_INTERVAL_SECS,
            )?),
            keep_failed_jobs: env.optional("RENAME_KEEP_FAILED_JOBS", DEFAULT_KEEP_FAILED_JOBS)?,
        };

        Ok(Self {
            database_url: env.required("DATABASE_URL")?,
            bind_addr: env.optional("BIND_ADDR", DEFAULT_BIND_ADDR.to_string())?,
            log_level: env.optional("LOG_LEVEL", Level::INFO)?,
            discord_bot_token: env.required("DISCORD_BOT_TOKEN")?,
            discord_api_base_url,
            rename_api_token: env.required("RENAME_API_TOKEN")?,
            rename,
        })
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn required(&self, name: &str) -> Result<String, ConfigError> {
        match (self.lookup)(name) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(name.to_string())),
        }
    }

    fn optional<T>(&self, name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match (self.lookup)(name) {
            Some(value) if !value.trim().is_empty() => {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|e| ConfigError::InvalidEnvVar {
                        name: name.to_string(),
                        reason: e.to_string(),
                    })
            }
            _ => Ok(default),
        }
    }

    fn positive<T>(&self, name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr + PartialEq + Default,
        T::Err: std::fmt::Display,
    {
        let value = self.optional(name, default)?;
        if value == T::default() {
            return Err(ConfigError::InvalidEnvVar {
                name: name.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    }
}
