//! Connection checks for the configured Helius webhook and Telegram chat.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use fundsentry_common::error::AppError;
use fundsentry_common::types::{Webhook, WebhookState};
use fundsentry_notifier::{load_telegram_config, send_test_message};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/test-telegram", get(test_telegram))
        .route("/api/test-webhook", get(test_webhook))
}

/// Webhook summary returned by the webhook check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSummary {
    pub id: String,
    pub url: String,
    pub transaction_types: Vec<String>,
    pub account_addresses: Vec<String>,
    pub webhook_type: Option<String>,
}

impl From<Webhook> for WebhookSummary {
    fn from(webhook: Webhook) -> Self {
        Self {
            id: webhook.webhook_id,
            url: webhook.webhook_url,
            transaction_types: webhook.transaction_types,
            account_addresses: webhook.account_addresses,
            webhook_type: webhook.webhook_type,
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// GET /api/test-telegram — Send the test message to the configured chat.
///
/// Missing configuration and delivery failures both answer 400 with the reason.
async fn test_telegram(State(state): State<AppState>) -> Result<Response, AppError> {
    let config = load_telegram_config(state.settings.as_ref()).await?;

    match send_test_message(state.notifier.as_ref(), &config).await {
        Ok(()) => Ok(Json(json!({
            "success": true,
            "message": "Telegram test succeeded! A test message was sent to your chat."
        }))
        .into_response()),
        Err(AppError::Delivery(reason)) | Err(AppError::Config(reason)) => {
            tracing::warn!(%reason, "Telegram test failed");
            Ok(error_response(
                StatusCode::BAD_REQUEST,
                format!("Telegram test failed: {}", reason),
            ))
        }
        Err(other) => Err(other),
    }
}

/// GET /api/test-webhook — Resolve the webhook state and report it.
async fn test_webhook(State(state): State<AppState>) -> Result<Response, AppError> {
    let status = match state.reconciler.lifecycle().status().await {
        Ok(status) => status,
        Err(AppError::RemoteUpdate { status, message }) => {
            tracing::warn!(?status, %message, "Webhook check failed");
            let code = status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return Ok(error_response(
                code,
                format!("Failed to fetch webhook: {}", message),
            ));
        }
        Err(other) => return Err(other),
    };

    let response = match status.state {
        WebhookState::Unconfigured => error_response(
            StatusCode::BAD_REQUEST,
            "Helius API key not found, configure it on the settings page first",
        ),
        WebhookState::NoWebhook => Json(json!({
            "success": true,
            "state": status.state,
            "message": "Helius API key is set, but no webhook has been created yet. \
                        It will be created automatically when the first address is added."
        }))
        .into_response(),
        WebhookState::Orphaned => error_response(
            StatusCode::NOT_FOUND,
            format!(
                "Webhook {} no longer exists on Helius",
                status.webhook_id.unwrap_or_default()
            ),
        ),
        WebhookState::Active => {
            let webhook = status
                .webhook
                .map(WebhookSummary::from)
                .ok_or_else(|| AppError::Internal("Active webhook without body".to_string()))?;
            Json(json!({
                "success": true,
                "state": status.state,
                "message": "Connected to Helius API",
                "webhook": webhook
            }))
            .into_response()
        }
    };

    Ok(response)
}
