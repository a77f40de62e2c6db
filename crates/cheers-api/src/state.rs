use std::sync::Arc;

use tracing::error;

use cheers_db::Database;
use cheers_providers::{ImageProvider, Notifier};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub images: Box<dyn ImageProvider>,
    pub notifier: Box<dyn Notifier>,
    /// Chat channel every celebration is announced in.
    pub channel_id: String,
}

/// Runs a blocking store call off the async runtime.
pub async fn with_db<F, T>(state: &AppState, f: F) -> anyhow::Result<T>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            anyhow::anyhow!("store task failed: {}", e)
        })?
}
