//! Telegram Bot API delivery.
//!
//! API endpoint: `{base_url}/bot<token>/sendMessage`, HTML parse mode.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use fundsentry_common::error::AppError;
use fundsentry_common::types::TelegramConfig;

use crate::Notifier;

/// Bot API reply envelope. `description` is only set when `ok` is false.
#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    description: Option<String>,
}

pub struct TelegramNotifier {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramNotifier {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, config: &TelegramConfig, text: &str) -> Result<(), AppError> {
        if config.bot_token.trim().is_empty() || config.chat_id.trim().is_empty() {
            return Err(AppError::Config(
                "Telegram bot token and chat ID are required".to_string(),
            ));
        }

        let url = format!("{}/bot{}/sendMessage", self.base_url, config.bot_token);
        let body = serde_json::json!({
            "chat_id": config.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true
        });

        // The token is part of the URL, so reqwest's error text is never surfaced.
        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            tracing::warn!(timeout = e.is_timeout(), connect = e.is_connect(), "Telegram request failed");
            AppError::Delivery("Could not reach the Telegram Bot API".to_string())
        })?;

        let status = response.status();
        let reply: Option<BotApiReply> = response.json().await.ok();

        match reply {
            Some(BotApiReply { ok: true, .. }) if status.is_success() => {
                tracing::debug!(chat_id = %config.chat_id, "Telegram message delivered");
                Ok(())
            }
            Some(BotApiReply { description, .. }) => Err(AppError::Delivery(format!(
                "Telegram returned HTTP {}: {}",
                status.as_u16(),
                description.unwrap_or_else(|| "no description".to_string())
            ))),
            None => Err(AppError::Delivery(format!(
                "Telegram returned HTTP {} with an unreadable body",
                status.as_u16()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;

    type Sent = Arc<Mutex<Vec<Value>>>;

    async fn send_message(
        State(sent): State<Sent>,
        Path(bot): Path<String>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if bot != "bot123:abc" {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"ok": false, "error_code": 401, "description": "Unauthorized"})),
            );
        }
        if body["chat_id"] != "42" {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"})),
            );
        }
        sent.lock().unwrap().push(body);
        (StatusCode::OK, Json(json!({"ok": true, "result": {"message_id": 1}})))
    }

    async fn spawn_mock() -> (TelegramNotifier, Sent) {
        let sent: Sent = Arc::default();
        let app = Router::new()
            .route("/{bot}/sendMessage", post(send_message))
            .with_state(sent.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let notifier =
            TelegramNotifier::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap();
        (notifier, sent)
    }

    fn config(token: &str, chat_id: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.to_string(),
            chat_id: chat_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_delivers_html_message() {
        let (notifier, sent) = spawn_mock().await;
        notifier
            .send(&config("123:abc", "42"), "<b>hello</b>")
            .await
            .unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["text"], "<b>hello</b>");
        assert_eq!(sent[0]["parse_mode"], "HTML");
    }

    #[tokio::test]
    async fn test_rejected_chat_is_delivery_error() {
        let (notifier, _) = spawn_mock().await;
        let err = notifier
            .send(&config("123:abc", "7"), "hi")
            .await
            .unwrap_err();
        match err {
            AppError::Delivery(msg) => assert!(msg.contains("chat not found")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bad_token_is_delivery_error() {
        let (notifier, _) = spawn_mock().await;
        let err = notifier
            .send(&config("999:zzz", "42"), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Delivery(_)));
    }

    #[tokio::test]
    async fn test_blank_config_is_config_error() {
        let (notifier, sent) = spawn_mock().await;
        let err = notifier.send(&config("", "42"), "hi").await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_delivery_error() {
        let notifier = TelegramNotifier::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = notifier
            .send(&config("123:abc", "42"), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Delivery(_)));
    }
}
