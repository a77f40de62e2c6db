mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use cheers_api::{AppStateInner, create_router};
use cheers_providers::{DiscordNotifier, GiphyClient};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cheers_server=debug,cheers_api=debug,cheers_db=info,cheers_providers=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = cheers_db::Database::open(&config.db_path)?;

    // Outbound providers share one HTTP client
    let http = reqwest::Client::new();
    let images = GiphyClient::new(
        http.clone(),
        config.giphy_api_url.clone(),
        config.giphy_api_key.clone(),
        config.giphy_query.clone(),
    );
    if config.discord_bot_token.is_none() {
        tracing::warn!("DISCORD_BOT_TOKEN unset, announcements will be skipped");
    }
    let notifier = DiscordNotifier::new(
        http,
        config.discord_api_url.clone(),
        config.discord_bot_token.clone(),
    );

    let state = Arc::new(AppStateInner {
        db,
        images: Box::new(images),
        notifier: Box::new(notifier),
        channel_id: config.discord_channel_id.clone(),
    });

    let app = create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Cheers server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
