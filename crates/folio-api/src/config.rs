// Server configuration loaded from environment variables.
// Decision: Default to the in-memory store when no DATABASE_URL is set
// Decision: API routes live under "/api" unless API_PREFIX overrides it

use axum::http::HeaderValue;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";
const DEFAULT_API_PREFIX: &str = "/api";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL URL. `None` means dev mode.
    pub database_url: Option<String>,
    /// Force the in-memory store even when a URL is configured
    pub dev_mode: bool,
    pub bind_addr: String,
    /// Prefix applied to API routes; empty mounts them at the root
    pub api_prefix: String,
    /// Origins allowed for cross-origin requests; empty disables CORS
    pub cors_origins: Vec<HeaderValue>,
    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            dev_mode: false,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            cors_origins: Vec::new(),
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());
        let dev_mode = lookup("DEV_MODE").map(|s| parse_flag(&s)).unwrap_or(false);
        let bind_addr = lookup("BIND_ADDR")
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.bind_addr);
        let api_prefix = lookup("API_PREFIX")
            .map(|s| normalize_prefix(&s))
            .unwrap_or(defaults.api_prefix);

        // Example: CORS_ALLOWED_ORIGINS="https://example.com,https://admin.example.com"
        let cors_origins = lookup("CORS_ALLOWED_ORIGINS")
            .filter(|s| !s.is_empty())
            .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
            .unwrap_or_default();

        let run_migrations = lookup("RUN_MIGRATIONS")
            .map(|s| parse_flag(&s))
            .unwrap_or(defaults.run_migrations);

        Self {
            database_url,
            dev_mode,
            bind_addr,
            api_prefix,
            cors_origins,
            run_migrations,
        }
    }

    /// Whether the in-memory store should be used
    pub fn use_in_memory(&self) -> bool {
        self.dev_mode || self.database_url.is_none()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// "/api/" and "api" both become "/api"; "" and "/" mean no prefix
fn normalize_prefix(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert!(config.database_url.is_none());
        assert!(config.use_in_memory());
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.api_prefix, "/api");
        assert!(config.cors_origins.is_empty());
        assert!(config.run_migrations);
    }

    #[test]
    fn test_database_url_selects_postgres() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/folio")]);
        assert!(!config.use_in_memory());
    }

    #[test]
    fn test_dev_mode_overrides_database_url() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/folio"),
            ("DEV_MODE", "true"),
        ]);
        assert!(config.use_in_memory());
    }

    #[test]
    fn test_prefix_normalization() {
        assert_eq!(config(&[("API_PREFIX", "")]).api_prefix, "");
        assert_eq!(config(&[("API_PREFIX", "/")]).api_prefix, "");
        assert_eq!(config(&[("API_PREFIX", "v2/")]).api_prefix, "/v2");
        assert_eq!(config(&[("API_PREFIX", "/site/api")]).api_prefix, "/site/api");
    }

    #[test]
    fn test_cors_origins_parsed() {
        let config = config(&[(
            "CORS_ALLOWED_ORIGINS",
            "https://example.com, https://admin.example.com",
        )]);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.cors_origins[1], "https://admin.example.com");
    }

    #[test]
    fn test_migrations_can_be_disabled() {
        assert!(!config(&[("RUN_MIGRATIONS", "false")]).run_migrations);
        assert!(config(&[("RUN_MIGRATIONS", "1")]).run_migrations);
    }
}
