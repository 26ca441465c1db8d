mod model;
mod server;

use dioxus_logger::tracing;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::server::{
    config::Config,
    error::AppError,
    router,
    scheduler::rename_queue::{self, RenameRunner},
    service::rename::{DiscordRenameClient, LocalPermitCheck},
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    startup::init_logging(&config)?;

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client(&config)?;

    let client = Arc::new(DiscordRenameClient::new(
        http_client,
        config.discord_api_base_url.clone(),
        config.discord_bot_token.clone(),
    ));
    let permits = Arc::new(LocalPermitCheck::new(
        config.rename.local_limit_burst,
        config.rename.local_limit_window,
    ));

    // Start rename queue scheduler
    let runner = RenameRunner::new(db.clone(), client, permits, &config.rename);
    let mut scheduler = rename_queue::start_scheduler(runner, &config.rename).await?;

    let app = router::router()
        .with_state(AppState::new(
            db,
            config.rename.job_options(),
            &config.rename_api_token,
        ))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        })
        .await?;

    scheduler.shutdown().await?;

    Ok(())
}
