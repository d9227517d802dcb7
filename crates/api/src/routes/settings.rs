//! Settings routes — Helius and Telegram credentials.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use fundsentry_common::error::AppError;
use fundsentry_common::types::{SettingsUpdate, SettingsView};
use fundsentry_engine::settings::SettingsService;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings", get(get_settings).post(save_settings))
}

/// GET /api/settings — Every stored setting, missing ones as empty strings.
async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsView>, AppError> {
    let view = SettingsService::load(state.settings.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load settings");
            AppError::Internal("Failed to load settings".to_string())
        })?;

    Ok(Json(view))
}

/// POST /api/settings — Upsert the fields present in the body; absent fields are untouched.
async fn save_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(update) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    SettingsService::apply(state.settings.as_ref(), &update)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to save settings");
            AppError::Internal("Failed to save settings".to_string())
        })?;

    Ok(Json(json!({ "success": true })))
}
