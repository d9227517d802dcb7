//! reqwest-backed implementation of `WebhookApi` for the Helius REST API.
//!
//! Endpoints (API key passed as the `api-key` query parameter):
//! - `GET  /v0/webhooks/{id}`
//! - `POST /v0/webhooks`
//! - `PUT  /v0/webhooks/{id}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use fundsentry_common::error::AppError;
use fundsentry_common::types::{NewWebhook, Webhook};

use crate::WebhookApi;

/// Helius webhook API client.
#[derive(Clone)]
pub struct HeliusClient {
    http: reqwest::Client,
    base_url: String,
}

impl HeliusClient {
    /// Create a client for the given API base URL (e.g. `https://api.helius.xyz`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(http, base_url))
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn webhooks_url(&self) -> String {
        format!("{}/v0/webhooks", self.base_url)
    }

    fn webhook_url(&self, webhook_id: &str) -> String {
        format!("{}/v0/webhooks/{}", self.base_url, webhook_id)
    }
}

#[async_trait]
impl WebhookApi for HeliusClient {
    async fn get_webhook(
        &self,
        api_key: &str,
        webhook_id: &str,
    ) -> Result<Option<Webhook>, AppError> {
        let response = self
            .http
            .get(self.webhook_url(webhook_id))
            .query(&[("api-key", api_key)])
            .send()
            .await
            .map_err(|e| transport_error("fetch webhook", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!(webhook_id, "Helius webhook not found");
            return Ok(None);
        }

        let webhook = read_json(response, "fetch webhook").await?;
        Ok(Some(webhook))
    }

    async fn create_webhook(
        &self,
        api_key: &str,
        webhook: &NewWebhook,
    ) -> Result<Webhook, AppError> {
        let response = self
            .http
            .post(self.webhooks_url())
            .query(&[("api-key", api_key)])
            .json(webhook)
            .send()
            .await
            .map_err(|e| transport_error("create webhook", e))?;

        let created: Webhook = read_json(response, "create webhook").await?;

        tracing::info!(
            webhook_id = %created.webhook_id,
            webhook_url = %created.webhook_url,
            "Helius webhook created"
        );

        Ok(created)
    }

    async fn update_webhook(&self, api_key: &str, webhook: &Webhook) -> Result<Webhook, AppError> {
        let response = self
            .http
            .put(self.webhook_url(&webhook.webhook_id))
            .query(&[("api-key", api_key)])
            .json(webhook)
            .send()
            .await
            .map_err(|e| transport_error("update webhook", e))?;

        let updated: Webhook = read_json(response, "update webhook").await?;

        tracing::info!(
            webhook_id = %updated.webhook_id,
            address_count = updated.account_addresses.len(),
            "Helius webhook updated"
        );

        Ok(updated)
    }
}

fn transport_error(action: &str, err: reqwest::Error) -> AppError {
    AppError::remote(
        err.status().map(|s| s.as_u16()),
        format!("Helius {} request failed: {}", action, err),
    )
}

/// Decode a success response, or turn a non-success one into `RemoteUpdate`.
async fn read_json<T: DeserializeOwned>(response: Response, action: &str) -> Result<T, AppError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::remote(
            Some(status.as_u16()),
            format!(
                "Helius {} failed ({}): {}",
                action,
                status.as_u16(),
                remote_message(&body, status)
            ),
        ));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| AppError::remote(None, format!("Helius {} returned invalid JSON: {}", action, e)))
}

/// Pick the most useful message out of an error body.
///
/// Helius usually answers `{"message": "..."}` or `{"error": "..."}`; anything else
/// is returned as-is, and an empty body falls back to the status reason.
fn remote_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["message", "error"] {
            if let Some(msg) = value.get(field).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
