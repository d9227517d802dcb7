//! Settings service — reads and partially updates the dashboard settings.

use fundsentry_common::error::AppError;
use fundsentry_common::settings::SettingsStore;
use fundsentry_common::types::{SettingKey, SettingsUpdate, SettingsView};

pub struct SettingsService;

impl SettingsService {
    /// Read every setting; missing keys come back as empty strings.
    pub async fn load(store: &dyn SettingsStore) -> Result<SettingsView, AppError> {
        let mut view = SettingsView::default();

        for key in SettingKey::ALL {
            let value = store.get(key).await?.unwrap_or_default();
            match key {
                SettingKey::HeliusApiKey => view.helius_api_key = value,
                SettingKey::HeliusWebhookId => view.helius_webhook_id = value,
                SettingKey::TelegramBotToken => view.telegram_bot_token = value,
                SettingKey::TelegramChatId => view.telegram_chat_id = value,
            }
        }

        Ok(view)
    }

    /// Upsert every field present in the update. Returns the number of keys written.
    ///
    /// The webhook id is not accepted here; it is only written when a webhook is created.
    pub async fn apply(
        store: &dyn SettingsStore,
        update: &SettingsUpdate,
    ) -> Result<usize, AppError> {
        let fields = [
            (SettingKey::HeliusApiKey, &update.helius_api_key),
            (SettingKey::TelegramBotToken, &update.telegram_bot_token),
            (SettingKey::TelegramChatId, &update.telegram_chat_id),
        ];

        let mut written = 0;
        for (key, value) in fields {
            if let Some(value) = value {
                store.upsert(key, value.trim()).await?;
                written += 1;
            }
        }

        tracing::info!(written, "Settings updated");
        Ok(written)
    }
}
