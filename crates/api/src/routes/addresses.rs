//! Monitored address routes.
//!
//! The watch list lives in the Helius webhook; these routes read and edit it through
//! the `AddressReconciler`. Failures are logged with full detail and reported to the
//! caller as a short message.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};

use fundsentry_common::error::AppError;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/monitored-addresses", get(list_addresses))
        .route(
            "/api/webhook-addresses",
            post(add_addresses).delete(remove_addresses),
        )
}

#[derive(Debug, Serialize)]
pub struct AddressListResponse {
    pub addresses: Vec<String>,
}

/// Parse `{ "addresses": [..] }`, requiring a non-empty array of non-blank strings.
///
/// Entries are trimmed. Any other shape is a `Validation` error (HTTP 400).
pub fn parse_addresses(body: &[u8]) -> Result<Vec<String>, AppError> {
    let invalid = || AppError::Validation("No valid addresses provided".to_string());

    let value: Value = serde_json::from_slice(body).map_err(|_| invalid())?;
    let items = value
        .get("addresses")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(invalid)?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::trim)
                .filter(|addr| !addr.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::Validation("Addresses must be non-empty strings".to_string())
                })
        })
        .collect()
}

/// GET /api/monitored-addresses — Current watch list.
async fn list_addresses(
    State(state): State<AppState>,
) -> Result<Json<AddressListResponse>, AppError> {
    let addresses = state.reconciler.monitored_addresses().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load monitored addresses");
        AppError::Internal("Failed to load monitored addresses".to_string())
    })?;

    Ok(Json(AddressListResponse { addresses }))
}

/// POST /api/webhook-addresses — Add addresses to the webhook.
async fn add_addresses(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let addresses = parse_addresses(&body)?;

    state.reconciler.add(&addresses).await.map_err(|e| {
        tracing::error!(error = %e, count = addresses.len(), "Failed to add addresses to webhook");
        AppError::Internal("Failed to add addresses to webhook".to_string())
    })?;

    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/webhook-addresses — Remove addresses from the webhook.
async fn remove_addresses(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let addresses = parse_addresses(&body)?;

    state.reconciler.remove(&addresses).await.map_err(|e| {
        tracing::error!(error = %e, count = addresses.len(), "Failed to remove addresses from webhook");
        AppError::Internal("Failed to remove addresses from webhook".to_string())
    })?;

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_body() {
        let parsed = parse_addresses(br#"{"addresses": [" A ", "B"]}"#).unwrap();
        assert_eq!(parsed, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        let bodies: [&[u8]; 7] = [
            br#"{"addresses": []}"#,
            br#"{"addresses": "A"}"#,
            br#"{"other": ["A"]}"#,
            br#"{"addresses": ["A", 7]}"#,
            br#"{"addresses": ["  "]}"#,
            b"not json",
            b"",
        ];
        for body in bodies {
            let err = parse_addresses(body).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "accepted {body:?}");
        }
    }
}
