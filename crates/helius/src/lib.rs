//! Helius webhook API client.
//!
//! The local service only stores the webhook id; the webhook itself (including the
//! watched address list) lives in Helius. `WebhookApi` is the seam the reconciler
//! talks to, `HeliusClient` the real implementation.

pub mod client;

use async_trait::async_trait;

use fundsentry_common::error::AppError;
use fundsentry_common::types::{NewWebhook, Webhook};

pub use client::HeliusClient;

/// CRUD operations on a remote webhook resource, authenticated by API key.
#[async_trait]
pub trait WebhookApi: Send + Sync {
    /// Fetch a webhook. Returns `Ok(None)` when the remote answers 404.
    async fn get_webhook(&self, api_key: &str, webhook_id: &str)
    -> Result<Option<Webhook>, AppError>;

    /// Create a webhook and return it as stored remotely (with its new id).
    async fn create_webhook(&self, api_key: &str, webhook: &NewWebhook)
    -> Result<Webhook, AppError>;

    /// Replace a webhook with the given full resource.
    async fn update_webhook(&self, api_key: &str, webhook: &Webhook) -> Result<Webhook, AppError>;
}
