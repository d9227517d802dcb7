//! Webhook lifecycle — resolves which state the configured webhook is in and
//! creates it on first use.
//!
//! ```text
//! Unconfigured ──(API key saved)──▶ NoWebhook ──(first add)──▶ Active
//!                                                   │
//!                                   (remote 404) ◀──┘──▶ Orphaned
//! ```
//!
//! `Orphaned` is only reported, never repaired automatically.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use fundsentry_common::error::AppError;
use fundsentry_common::settings::SettingsStore;
use fundsentry_common::types::{NewWebhook, SettingKey, Webhook, WebhookState};
use fundsentry_helius::WebhookApi;

/// Resolved webhook state plus the remote resource when it exists.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookStatus {
    pub state: WebhookState,
    pub webhook_id: Option<String>,
    pub webhook: Option<Webhook>,
}

/// Stored Helius credentials.
#[derive(Debug, Clone)]
pub struct HeliusCredentials {
    pub api_key: String,
    pub webhook_id: Option<String>,
}

pub struct WebhookLifecycle {
    settings: Arc<dyn SettingsStore>,
    api: Arc<dyn WebhookApi>,
    ingress_url: String,
    ingress_auth_token: Option<String>,
    create_lock: Mutex<()>,
}

impl WebhookLifecycle {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        api: Arc<dyn WebhookApi>,
        ingress_url: impl Into<String>,
        ingress_auth_token: Option<String>,
    ) -> Self {
        Self {
            settings,
            api,
            ingress_url: ingress_url.into(),
            ingress_auth_token,
            create_lock: Mutex::new(()),
        }
    }

    pub fn api(&self) -> &dyn WebhookApi {
        self.api.as_ref()
    }

    /// Read the stored credentials. `None` when no API key is configured.
    pub async fn credentials(&self) -> Result<Option<HeliusCredentials>, AppError> {
        let Some(api_key) = self.settings.get_non_empty(SettingKey::HeliusApiKey).await? else {
            return Ok(None);
        };
        let webhook_id = self
            .settings
            .get_non_empty(SettingKey::HeliusWebhookId)
            .await?;

        Ok(Some(HeliusCredentials {
            api_key,
            webhook_id,
        }))
    }

    /// Like `credentials`, but a missing API key is a configuration error.
    pub async fn require_credentials(&self) -> Result<HeliusCredentials, AppError> {
        self.credentials().await?.ok_or_else(|| {
            AppError::Config(
                "Helius API key not found, configure it on the settings page first".to_string(),
            )
        })
    }

    /// Resolve the lifecycle state, fetching the remote webhook when an id is stored.
    pub async fn status(&self) -> Result<WebhookStatus, AppError> {
        let Some(creds) = self.credentials().await? else {
            return Ok(WebhookStatus {
                state: WebhookState::Unconfigured,
                webhook_id: None,
                webhook: None,
            });
        };

        let Some(webhook_id) = creds.webhook_id else {
            return Ok(WebhookStatus {
                state: WebhookState::NoWebhook,
                webhook_id: None,
                webhook: None,
            });
        };

        let webhook = self.api.get_webhook(&creds.api_key, &webhook_id).await?;
        let state = if webhook.is_some() {
            WebhookState::Active
        } else {
            WebhookState::Orphaned
        };

        Ok(WebhookStatus {
            state,
            webhook_id: Some(webhook_id),
            webhook,
        })
    }

    /// Return the stored webhook id, creating the remote webhook first if none is stored.
    ///
    /// Creation is serialized: concurrent callers wait and reuse the id the first one saved.
    pub async fn ensure_webhook(&self, api_key: &str) -> Result<String, AppError> {
        let _guard = self.create_lock.lock().await;

        if let Some(existing) = self
            .settings
            .get_non_empty(SettingKey::HeliusWebhookId)
            .await?
        {
            return Ok(existing);
        }

        let request = NewWebhook::enhanced(&self.ingress_url, self.ingress_auth_token.clone());
        let created = self.api.create_webhook(api_key, &request).await?;

        if created.webhook_id.trim().is_empty() {
            return Err(AppError::remote(
                None,
                "Helius created a webhook but returned no webhook ID",
            ));
        }

        self.settings
            .upsert(SettingKey::HeliusWebhookId, &created.webhook_id)
            .await?;

        tracing::info!(
            webhook_id = %created.webhook_id,
            ingress_url = %self.ingress_url,
            "Webhook created and stored"
        );

        Ok(created.webhook_id)
    }
}
