//! Address reconciliation — adds and removes watched addresses on the remote webhook.
//!
//! The webhook's `accountAddresses` is the only copy of the watch list. Every change is a
//! read-modify-write against Helius:
//! 1. Read credentials from the settings store
//! 2. Fetch the current webhook
//! 3. Compute the next address list (set union / set difference)
//! 4. Replace the webhook with every original field plus the new list
//!
//! Helius offers no version or etag, so steps 2-4 are serialized per webhook id inside
//! this process. Writers in other processes (or edits made in the Helius dashboard)
//! can still interleave and lose an update.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use fundsentry_common::error::AppError;
use fundsentry_common::types::Webhook;

use crate::lifecycle::WebhookLifecycle;

/// `current ∪ additions`, keeping existing order and appending new entries in first-seen order.
pub fn union_addresses(current: &[String], additions: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(current.len() + additions.len());
    current
        .iter()
        .chain(additions)
        .filter(|addr| seen.insert(addr.as_str()))
        .cloned()
        .collect()
}

/// `current \ removals`, keeping the order of the remaining entries.
pub fn difference_addresses(current: &[String], removals: &[String]) -> Vec<String> {
    let removed: HashSet<&str> = removals.iter().map(String::as_str).collect();
    current
        .iter()
        .filter(|addr| !removed.contains(addr.as_str()))
        .cloned()
        .collect()
}

/// One async mutex per webhook id.
///
/// Entries nobody holds are pruned on each lookup, so the table only contains ids with an
/// operation in flight plus the one being requested.
#[derive(Default)]
struct WriterLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl WriterLocks {
    fn for_webhook(&self, webhook_id: &str) -> Result<Arc<tokio::sync::Mutex<()>>, AppError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| AppError::Internal("writer lock table poisoned".to_string()))?;
        locks.retain(|id, lock| id == webhook_id || Arc::strong_count(lock) > 1);
        Ok(locks.entry(webhook_id.to_string()).or_default().clone())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Add,
    Remove,
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Add => write!(f, "add"),
            Change::Remove => write!(f, "remove"),
        }
    }
}

/// Applies add/remove operations to the configured webhook's address list.
pub struct AddressReconciler {
    lifecycle: Arc<WebhookLifecycle>,
    writers: WriterLocks,
}

impl AddressReconciler {
    pub fn new(lifecycle: Arc<WebhookLifecycle>) -> Self {
        Self {
            lifecycle,
            writers: WriterLocks::default(),
        }
    }

    pub fn lifecycle(&self) -> &WebhookLifecycle {
        &self.lifecycle
    }

    /// Add addresses to the watch list, creating the webhook on first use.
    ///
    /// Returns the address list as written.
    pub async fn add(&self, addresses: &[String]) -> Result<Vec<String>, AppError> {
        let creds = self.lifecycle.require_credentials().await?;
        let webhook_id = match creds.webhook_id {
            Some(id) => id,
            None => self.lifecycle.ensure_webhook(&creds.api_key).await?,
        };

        self.apply(&creds.api_key, &webhook_id, Change::Add, addresses)
            .await
    }

    /// Remove addresses from the watch list. Unknown addresses are ignored.
    pub async fn remove(&self, addresses: &[String]) -> Result<Vec<String>, AppError> {
        let creds = self.lifecycle.require_credentials().await?;
        let webhook_id = creds.webhook_id.ok_or_else(|| {
            AppError::Config("Helius webhook ID not found, no addresses are monitored".to_string())
        })?;

        self.apply(&creds.api_key, &webhook_id, Change::Remove, addresses)
            .await
    }

    /// Current watch list. Empty when unconfigured, when no webhook exists, or when it
    /// has been deleted remotely.
    pub async fn monitored_addresses(&self) -> Result<Vec<String>, AppError> {
        let Some(creds) = self.lifecycle.credentials().await? else {
            return Ok(Vec::new());
        };
        let Some(webhook_id) = creds.webhook_id else {
            return Ok(Vec::new());
        };

        let webhook = self
            .lifecycle
            .api()
            .get_webhook(&creds.api_key, &webhook_id)
            .await?;

        Ok(webhook.map(|w| w.account_addresses).unwrap_or_default())
    }

    async fn apply(
        &self,
        api_key: &str,
        webhook_id: &str,
        change: Change,
        addresses: &[String],
    ) -> Result<Vec<String>, AppError> {
        let writer = self.writers.for_webhook(webhook_id)?;
        let _guard = writer.lock().await;

        let api = self.lifecycle.api();
        let current = api
            .get_webhook(api_key, webhook_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Webhook {} not found", webhook_id)))?;

        let next = match change {
            Change::Add => union_addresses(&current.account_addresses, addresses),
            Change::Remove => difference_addresses(&current.account_addresses, addresses),
        };

        let before = current.account_addresses.len();
        let replacement = Webhook {
            account_addresses: next.clone(),
            ..current
        };
        api.update_webhook(api_key, &replacement).await?;

        tracing::info!(
            webhook_id,
            %change,
            requested = addresses.len(),
            before,
            after = next.len(),
            "Webhook address list updated"
        );

        Ok(next)
    }
}
