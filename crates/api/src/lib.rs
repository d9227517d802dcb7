//! FundSentry API server.
//!
//! Endpoints:
//! - GET    /api/settings, POST /api/settings — Helius and Telegram credentials
//! - GET    /api/monitored-addresses — watch list held by the Helius webhook
//! - POST   /api/webhook-addresses, DELETE /api/webhook-addresses — edit the watch list
//! - GET    /api/test-webhook, GET /api/test-telegram — connection checks
//! - GET    /api/smart-money — static reference wallets
//! - POST   /api/helius/ingress — webhook deliveries, forwarded to Telegram

pub mod middleware;
pub mod routes;
pub mod state;
