//! Notification delivery to a single configured Telegram chat.
//!
//! - `format` builds HTML message bodies (test message, transaction alerts)
//! - `telegram` delivers them through the Bot API `sendMessage` endpoint
//!
//! Delivery is synchronous and best-effort: no retry, no queue.

pub mod format;
pub mod telegram;

use async_trait::async_trait;

use fundsentry_common::error::AppError;
use fundsentry_common::settings::SettingsStore;
use fundsentry_common::types::{SettingKey, TelegramConfig};

pub use telegram::TelegramNotifier;

/// Sends a pre-formatted message to a chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, config: &TelegramConfig, text: &str) -> Result<(), AppError>;
}

/// Read the bot token and chat id from the settings store.
///
/// Fails with `AppError::Config` naming whichever value is missing.
pub async fn load_telegram_config(store: &dyn SettingsStore) -> Result<TelegramConfig, AppError> {
    let bot_token = store
        .get_non_empty(SettingKey::TelegramBotToken)
        .await?
        .ok_or_else(|| {
            AppError::Config(
                "Telegram bot token not found, configure it on the settings page first"
                    .to_string(),
            )
        })?;

    let chat_id = store
        .get_non_empty(SettingKey::TelegramChatId)
        .await?
        .ok_or_else(|| {
            AppError::Config(
                "Telegram chat ID not found, configure it on the settings page first".to_string(),
            )
        })?;

    Ok(TelegramConfig { bot_token, chat_id })
}

/// Send the fixed test message.
pub async fn send_test_message(
    notifier: &dyn Notifier,
    config: &TelegramConfig,
) -> Result<(), AppError> {
    notifier.send(config, &format::test_message()).await?;
    tracing::info!(chat_id = %config.chat_id, "Telegram test message sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use fundsentry_common::settings::MemorySettingsStore;

    use super::*;

    #[tokio::test]
    async fn test_missing_token_reported_first() {
        let store = MemorySettingsStore::new();
        let err = load_telegram_config(&store).await.unwrap_err();
        match err {
            AppError::Config(msg) => assert!(msg.contains("bot token")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_chat_id() {
        let store = MemorySettingsStore::with_values([(SettingKey::TelegramBotToken, "123:abc")]);
        let err = load_telegram_config(&store).await.unwrap_err();
        match err {
            AppError::Config(msg) => assert!(msg.contains("chat ID")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_config() {
        let store = MemorySettingsStore::with_values([
            (SettingKey::TelegramBotToken, "123:abc"),
            (SettingKey::TelegramChatId, "-100200"),
        ]);
        let config = load_telegram_config(&store).await.unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.chat_id, "-100200");
    }
}
