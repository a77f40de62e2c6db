//! The congratulatory message workflow.
//!
//! Turns a `(username, sprint_code)` submission into a persisted message and
//! a chat announcement. Order matters:
//!
//! 1. fetch a celebration image (fatal on failure)
//! 2. resolve the sprint title (defaults when the sprint is missing)
//! 3. draw a random template (defaults when none are stored)
//! 4. build the message, stamped with the current time
//! 5. persist it (fatal on failure)
//! 6. draw a second, independent template for the announcement text
//! 7. announce it (failure is logged, never surfaced)

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use cheers_providers::{ProviderError, format_notification};
use cheers_types::models::{CongratulatoryMessage, NewMessage};

use crate::state::{AppState, with_db};

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("failed to fetch a celebration image: {0}")]
    ImageProvider(#[from] ProviderError),

    #[error("failed to persist the congratulatory message: {0:#}")]
    Persistence(anyhow::Error),
}

pub async fn compose(
    state: &AppState,
    username: &str,
    sprint_code: &str,
) -> Result<CongratulatoryMessage, ComposeError> {
    let gif_url = state.images.fetch_celebration_image().await?;

    let draft = {
        let username = username.to_string();
        let sprint_code = sprint_code.to_string();
        with_db(state, move |db| {
            let sprint_title = db.sprint_title(&sprint_code);
            let congratulatory_message = db.random_template_message();
            Ok(NewMessage {
                username,
                sprint_code,
                congratulatory_message,
                sprint_title,
                gif_url,
                timestamp: Utc::now(),
            })
        })
        .await
        .map_err(ComposeError::Persistence)?
    };

    // The announcement draws its own template after the write, so it may
    // quote a different one than the stored message.
    let (saved, announcement_template) = {
        let draft = draft.clone();
        with_db(state, move |db| {
            let id = db.save_message(&draft)?;
            Ok((id, db.random_template_message()))
        })
        .await
        .map_err(ComposeError::Persistence)?
    };
    let message = draft.with_id(saved);
    info!(
        "Saved congratulatory message {} for {} on sprint {}",
        message.id, message.username, message.sprint_code
    );

    let text = format_notification(
        &message.username,
        &announcement_template,
        &message.sprint_title,
        &message.gif_url,
    );
    if let Err(e) = state.notifier.notify(&state.channel_id, &text).await {
        warn!("Failed to announce message {}: {}", message.id, e);
    }

    Ok(message)
}
