pub mod addresses;
pub mod diagnostics;
pub mod health;
pub mod ingress;
pub mod settings;
pub mod smart_money;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(settings::router())
        .merge(addresses::router())
        .merge(diagnostics::router())
        .merge(smart_money::router())
        .merge(ingress::router())
        .with_state(state)
}
