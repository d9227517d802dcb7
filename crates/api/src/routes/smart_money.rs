//! Static smart-money reference list.

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use fundsentry_engine::smart_money::{self, SmartMoneyEntry};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/smart-money", get(list_smart_money))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// GET /api/smart-money?q=term — Filter by address, label or description.
async fn list_smart_money(Query(params): Query<SearchParams>) -> Json<Vec<SmartMoneyEntry>> {
    Json(smart_money::search(params.q.as_deref()))
}
