use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed keys of the `settings` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    HeliusApiKey,
    HeliusWebhookId,
    TelegramBotToken,
    TelegramChatId,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::HeliusApiKey,
        SettingKey::HeliusWebhookId,
        SettingKey::TelegramBotToken,
        SettingKey::TelegramChatId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::HeliusApiKey => "helius_api_key",
            SettingKey::HeliusWebhookId => "helius_webhook_id",
            SettingKey::TelegramBotToken => "telegram_bot_token",
            SettingKey::TelegramChatId => "telegram_chat_id",
        }
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted key/value setting.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot of every setting as exposed by `GET /api/settings`.
///
/// Missing keys read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub helius_api_key: String,
    pub helius_webhook_id: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
}

/// Partial settings update accepted by `POST /api/settings`.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub helius_api_key: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

/// A Helius webhook resource.
///
/// Fields not modelled here are kept in `extra` and written back verbatim on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(rename = "webhookID")]
    pub webhook_id: String,
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    #[serde(rename = "transactionTypes", default)]
    pub transaction_types: Vec<String>,
    #[serde(rename = "accountAddresses", default)]
    pub account_addresses: Vec<String>,
    #[serde(rename = "webhookType", default, skip_serializing_if = "Option::is_none")]
    pub webhook_type: Option<String>,
    #[serde(rename = "authHeader", default, skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of a webhook creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWebhook {
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    #[serde(rename = "transactionTypes")]
    pub transaction_types: Vec<String>,
    #[serde(rename = "accountAddresses")]
    pub account_addresses: Vec<String>,
    pub wallet: Vec<String>,
    #[serde(rename = "webhookType")]
    pub webhook_type: String,
    #[serde(rename = "authHeader", skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,
}

impl NewWebhook {
    /// An enhanced webhook for any transaction type, with no addresses yet.
    pub fn enhanced(webhook_url: impl Into<String>, auth_header: Option<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            transaction_types: vec!["ANY".to_string()],
            account_addresses: Vec::new(),
            wallet: Vec::new(),
            webhook_type: "enhanced".to_string(),
            auth_header,
        }
    }
}

/// Lifecycle state of the configured webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookState {
    /// No Helius API key stored
    Unconfigured,
    /// API key stored, no webhook id yet
    NoWebhook,
    /// Webhook id stored and resolvable
    Active,
    /// Webhook id stored but the remote lookup returned not-found
    Orphaned,
}

impl std::fmt::Display for WebhookState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookState::Unconfigured => write!(f, "unconfigured"),
            WebhookState::NoWebhook => write!(f, "no_webhook"),
            WebhookState::Active => write!(f, "active"),
            WebhookState::Orphaned => write!(f, "orphaned"),
        }
    }
}

/// Telegram bot credentials and destination chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// A native SOL transfer inside an enhanced transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NativeTransfer {
    pub from_user_account: Option<String>,
    pub to_user_account: Option<String>,
    /// Amount in lamports
    pub amount: u64,
}

/// A fungible or NFT token transfer inside an enhanced transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenTransfer {
    pub from_user_account: Option<String>,
    pub to_user_account: Option<String>,
    pub mint: String,
    pub token_amount: f64,
}

/// Parsed transaction as delivered by an enhanced Helius webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnhancedTransaction {
    pub signature: String,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
    /// Block time, UNIX seconds
    pub timestamp: Option<i64>,
    pub fee_payer: Option<String>,
    /// Fee in lamports
    pub fee: Option<u64>,
    pub native_transfers: Vec<NativeTransfer>,
    pub token_transfers: Vec<TokenTransfer>,
}
