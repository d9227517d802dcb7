//! Webhook ingress — Helius posts enhanced transactions here.
//!
//! Each transaction is formatted and forwarded to the configured Telegram chat.
//! Delivery problems are logged and counted, never turned into an error status,
//! so Helius does not redeliver the batch.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use fundsentry_common::error::AppError;
use fundsentry_common::types::EnhancedTransaction;
use fundsentry_notifier::{format, load_telegram_config};

use crate::middleware::auth::IngressAuth;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/helius/ingress", post(receive_transactions))
}

#[derive(Debug, Serialize)]
pub struct IngressResponse {
    pub received: usize,
    pub delivered: usize,
}

/// POST /api/helius/ingress — Forward delivered transactions to Telegram.
async fn receive_transactions(
    State(state): State<AppState>,
    _auth: IngressAuth,
    payload: Result<Json<Vec<EnhancedTransaction>>, JsonRejection>,
) -> Result<Json<IngressResponse>, AppError> {
    let Json(transactions) = payload.map_err(|e| {
        tracing::warn!(error = %e.body_text(), "Rejected malformed webhook delivery");
        AppError::Validation(e.body_text())
    })?;
    let received = transactions.len();

    let config = match load_telegram_config(state.settings.as_ref()).await {
        Ok(config) => config,
        Err(AppError::Config(reason)) => {
            tracing::warn!(received, %reason, "Dropping webhook delivery, Telegram not configured");
            return Ok(Json(IngressResponse {
                received,
                delivered: 0,
            }));
        }
        Err(other) => return Err(other),
    };

    let mut delivered = 0;
    for tx in &transactions {
        let text = format::transaction_alert(tx);
        match state.notifier.send(&config, &text).await {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::warn!(signature = %tx.signature, error = %e, "Failed to forward transaction");
            }
        }
    }

    tracing::info!(received, delivered, "Webhook delivery processed");
    Ok(Json(IngressResponse {
        received,
        delivered,
    }))
}
