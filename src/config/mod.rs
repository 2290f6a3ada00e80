use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Write logs to this file instead of stderr
    pub log_file: Option<String>,
    pub log_level: String,
}

/// Secrets and constants used by the token check and the admin shortcut
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub salt: String,
    pub admin_login: String,
    pub admin_salt: String,
    /// Score returned to admins without consulting the store
    pub admin_score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub score_cache_ttl_secs: u64,
    /// Upper bound on cached scores; older entries are evicted first
    pub score_cache_capacity: u64,
    /// JSON file mapping client id to interests list
    pub interests_file: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            salt: "Otus".to_string(),
            admin_login: "admin".to_string(),
            admin_salt: "42".to_string(),
            admin_score: 42,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            score_cache_ttl_secs: 60 * 60,
            score_cache_capacity: 10_000,
            interests_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("SCORING_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("SCORING_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("SCORING_LOG_FILE") {
            self.server.log_file = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("SCORING_LOG_LEVEL") {
            self.server.log_level = v;
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH_SALT") {
            self.auth.salt = v;
        }
        if let Ok(v) = env::var("AUTH_ADMIN_LOGIN") {
            self.auth.admin_login = v;
        }
        if let Ok(v) = env::var("AUTH_ADMIN_SALT") {
            self.auth.admin_salt = v;
        }
        if let Ok(v) = env::var("AUTH_ADMIN_SCORE") {
            self.auth.admin_score = v.parse().unwrap_or(self.auth.admin_score);
        }

        // Store overrides
        if let Ok(v) = env::var("STORE_SCORE_CACHE_TTL_SECS") {
            self.store.score_cache_ttl_secs = v.parse().unwrap_or(self.store.score_cache_ttl_secs);
        }
        if let Ok(v) = env::var("STORE_SCORE_CACHE_CAPACITY") {
            self.store.score_cache_capacity = v.parse().unwrap_or(self.store.score_cache_capacity);
        }
        if let Ok(v) = env::var("STORE_INTERESTS_FILE") {
            self.store.interests_file = Some(v).filter(|s| !s.is_empty());
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                log_file: None,
                log_level: "debug".to_string(),
            },
            auth: AuthConfig::default(),
            store: StoreConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                log_file: None,
                log_level: "info".to_string(),
            },
            auth: AuthConfig::default(),
            store: StoreConfig::default(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
