use dioxus_logger::tracing;
use reqwest::redirect::Policy;

use crate::server::{config::Config, error::AppError};

/// User agent sent on every Discord request, in the format Discord asks bots to use.
const USER_AGENT: &str = concat!(
    "DiscordBot (",
    env!("CARGO_PKG_NAME"),
    ", ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then runs all pending SeaORM migrations so the rename tables exist
/// before the queue runner or the HTTP surface touch them.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the HTTP client used for Discord API calls.
///
/// Redirects are disabled and every request is bounded by the configured rename
/// request timeout.
pub fn setup_reqwest_client(config: &Config) -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .timeout(config.rename.request_timeout)
        .user_agent(USER_AGENT)
        .build()?;

    Ok(client)
}

/// Initializes the global tracing subscriber at the configured level.
pub fn init_logging(config: &Config) -> Result<(), AppError> {
    dioxus_logger::init(config.log_level)
        .map_err(|e| AppError::InternalError(format!("Failed to initialize logger: {}", e)))?;

    tracing::debug!("Logging initialized at {}", config.log_level);

    Ok(())
}
