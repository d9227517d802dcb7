//! Shared application state for the Axum API server.

use std::sync::Arc;

use fundsentry_common::config::AppConfig;
use fundsentry_common::settings::SettingsStore;
use fundsentry_engine::lifecycle::WebhookLifecycle;
use fundsentry_engine::reconcile::AddressReconciler;
use fundsentry_helius::WebhookApi;
use fundsentry_notifier::Notifier;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<dyn SettingsStore>,
    pub reconciler: Arc<AddressReconciler>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        settings: Arc<dyn SettingsStore>,
        webhooks: Arc<dyn WebhookApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let lifecycle = WebhookLifecycle::new(
            settings.clone(),
            webhooks,
            config.ingress_url(),
            config.ingress_auth_token.clone(),
        );

        Self {
            settings,
            reconciler: Arc::new(AddressReconciler::new(Arc::new(lifecycle))),
            notifier,
            config: Arc::new(config),
        }
    }
}
