//! Key/value settings store.
//!
//! The dashboard keeps API credentials and the notification destination in a
//! single `settings` table. Handlers reach it through the `SettingsStore` trait so
//! the HTTP layer can run against the in-memory store in tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::types::{Setting, SettingKey};

/// Get-by-key / upsert-by-key persistence for settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a setting. Returns `None` when the key has never been written.
    async fn get(&self, key: SettingKey) -> Result<Option<String>, AppError>;

    /// Insert or overwrite a setting.
    async fn upsert(&self, key: SettingKey, value: &str) -> Result<(), AppError>;

    /// Read a setting, treating missing and blank values alike.
    async fn get_non_empty(&self, key: SettingKey) -> Result<Option<String>, AppError> {
        Ok(self.get(key).await?.filter(|v| !v.trim().is_empty()))
    }
}

/// PostgreSQL-backed settings store.
#[derive(Clone)]
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn get(&self, key: SettingKey) -> Result<Option<String>, AppError> {
        let row: Option<Setting> =
            sqlx::query_as("SELECT key, value, updated_at FROM settings WHERE key = $1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|setting| {
            tracing::trace!(key = %setting.key, updated_at = %setting.updated_at, "Setting loaded");
            setting.value
        }))
    }

    async fn upsert(&self, key: SettingKey, value: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        tracing::debug!(key = %key, "Setting saved");
        Ok(())
    }
}

/// Process-local settings store, used by tests and local runs without a database.
#[derive(Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<SettingKey, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given values.
    pub fn with_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (SettingKey, V)>,
        V: Into<String>,
    {
        let values = values.into_iter().map(|(k, v)| (k, v.into())).collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: SettingKey) -> Result<Option<String>, AppError> {
        let values = self
            .values
            .read()
            .map_err(|_| AppError::Internal("settings lock poisoned".to_string()))?;
        Ok(values.get(&key).cloned())
    }

    async fn upsert(&self, key: SettingKey, value: &str) -> Result<(), AppError> {
        let mut values = self
            .values
            .write()
            .map_err(|_| AppError::Internal("settings lock poisoned".to_string()))?;
        values.insert(key, value.to_string());
        Ok(())
    }
}
