use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::{Notifier, NotifyError};

/// Posts channel messages through the Discord REST API as a bot.
pub struct DiscordNotifier {
    http: Client,
    api_url: String,
    bot_token: Option<String>,
}

impl DiscordNotifier {
    /// Without a bot token every delivery fails with `NotConfigured`.
    pub fn new(http: Client, api_url: impl Into<String>, bot_token: Option<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            bot_token,
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, channel_id: &str, text: &str) -> Result<(), NotifyError> {
        let token = self.bot_token.as_deref().ok_or(NotifyError::NotConfigured)?;

        let resp = self
            .http
            .post(format!("{}/channels/{}/messages", self.api_url, channel_id))
            .header("Authorization", format!("Bot {}", token))
            .json(&json!({ "content": text }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Status { status, body });
        }

        info!("Notification sent to channel {}", channel_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Vec<(String, String, Value)>>>;

    async fn serve(status: StatusCode) -> (String, Captured) {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route(
                "/channels/{channel_id}/messages",
                post(
                    move |State(captured): State<Captured>,
                          Path(channel_id): Path<String>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| async move {
                        let auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        captured.lock().unwrap().push((channel_id, auth, body));
                        status
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        (format!("http://{}", addr), captured)
    }

    #[tokio::test]
    async fn posts_content_to_the_channel() {
        let (url, captured) = serve(StatusCode::OK).await;
        let notifier = DiscordNotifier::new(Client::new(), url, Some("secret".into()));

        notifier.notify("123", "Congrats!").await.unwrap();

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let (channel_id, auth, body) = &captured[0];
        assert_eq!(channel_id, "123");
        assert_eq!(auth, "Bot secret");
        assert_eq!(body["content"], "Congrats!");
    }

    #[tokio::test]
    async fn rejected_delivery_is_an_error() {
        let (url, _captured) = serve(StatusCode::UNAUTHORIZED).await;
        let notifier = DiscordNotifier::new(Client::new(), url, Some("wrong".into()));

        match notifier.notify("123", "Congrats!").await {
            Err(NotifyError::Status { status, .. }) => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_token_is_not_configured() {
        let notifier = DiscordNotifier::new(Client::new(), "http://127.0.0.1:9", None);
        assert!(matches!(
            notifier.notify("123", "Congrats!").await,
            Err(NotifyError::NotConfigured)
        ));
    }
}
