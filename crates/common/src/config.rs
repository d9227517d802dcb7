use std::net::SocketAddr;

use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Maximum number of PostgreSQL connections in the pool (default: 5)
    pub db_max_connections: u32,

    /// Address the API server binds to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,

    /// Externally reachable base URL of this service, used to build the webhook ingress URL
    pub public_base_url: String,

    /// Helius API base URL
    pub helius_api_url: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Timeout applied to every outbound HTTP request, in seconds (default: 30)
    pub http_timeout_secs: u64,

    /// Shared secret Helius sends back in the `Authorization` header of each delivery
    pub ingress_auth_token: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url: var("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
            bind_addr: var("BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0:3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("BIND_ADDR must be a valid socket address"))?,
            public_base_url: var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .ok_or_else(|| {
                    anyhow::anyhow!("PUBLIC_BASE_URL environment variable is required")
                })?,
            helius_api_url: var("HELIUS_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.helius.xyz".to_string()),
            telegram_api_url: var("TELEGRAM_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.telegram.org".to_string()),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a valid u64"))?,
            ingress_auth_token: var("INGRESS_AUTH_TOKEN"),
        })
    }

    /// URL Helius delivers enhanced transactions to.
    pub fn ingress_url(&self) -> String {
        format!("{}/api/helius/ingress", self.public_base_url)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_vars(lookup(&[
            ("DATABASE_URL", "postgres://localhost/fundsentry"),
            ("PUBLIC_BASE_URL", "https://sentry.example.com/"),
        ]))
        .unwrap();

        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.helius_api_url, "https://api.helius.xyz");
        assert_eq!(config.telegram_api_url, "https://api.telegram.org");
        assert_eq!(config.http_timeout_secs, 30);
        assert!(config.ingress_auth_token.is_none());
        assert_eq!(
            config.ingress_url(),
            "https://sentry.example.com/api/helius/ingress"
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        let err = AppConfig::from_vars(lookup(&[("PUBLIC_BASE_URL", "http://localhost")]))
            .unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_blank_public_base_url_fails() {
        let err = AppConfig::from_vars(lookup(&[
            ("DATABASE_URL", "postgres://localhost/fundsentry"),
            ("PUBLIC_BASE_URL", "   "),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PUBLIC_BASE_URL"));
    }

    #[test]
    fn test_invalid_timeout_fails() {
        let err = AppConfig::from_vars(lookup(&[
            ("DATABASE_URL", "postgres://localhost/fundsentry"),
            ("PUBLIC_BASE_URL", "http://localhost"),
            ("HTTP_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));
    }
}
