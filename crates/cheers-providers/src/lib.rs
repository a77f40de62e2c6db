//! Outbound collaborators of the message workflow: the celebration image
//! search and the chat channel that announces each celebration.

pub mod discord;
pub mod giphy;

use async_trait::async_trait;
use thiserror::Error;

pub use discord::DiscordNotifier;
pub use giphy::GiphyClient;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("image search request failed: {0}")]
    Request(reqwest::Error),

    #[error("image search returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("image search returned no usable image")]
    NoImage,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("chat notifications are not configured")]
    NotConfigured,

    #[error("chat request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat API returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// The search URL carries the API key, so it is dropped before the error
/// can reach a log line.
impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.without_url())
    }
}

/// Supplies one celebratory image URL per call.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn fetch_celebration_image(&self) -> Result<String, ProviderError>;
}

/// Delivers a text notification to a chat channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, channel_id: &str, text: &str) -> Result<(), NotifyError>;
}

/// The announcement posted for a completed sprint.
pub fn format_notification(
    username: &str,
    template_message: &str,
    sprint_title: &str,
    gif_url: &str,
) -> String {
    format!(
        "Congrats Dear, {}!\n{}\nYou have successfully completed Sprint: {}\nHere's a GIF for you: {}",
        username, template_message, sprint_title, gif_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_mentions_every_part() {
        let text = format_notification("alice", "Great job!", "Sprint One", "http://img/x.gif");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Congrats Dear, alice!",
                "Great job!",
                "You have successfully completed Sprint: Sprint One",
                "Here's a GIF for you: http://img/x.gif",
            ]
        );
    }
}
