//! Environment-driven configuration.

use crate::server::error::config::ConfigError;

/// Runtime configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// PostgreSQL connection string
    pub database_url: String,
    /// Valkey/Redis URL for sessions, rate limits and the job queue
    pub valkey_url: String,
    /// Public base URL of the web application, used for invitation links
    pub app_url: String,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Mail API endpoint; messages are only logged when unset
    pub mail_api_url: Option<String>,
    /// Bearer token for the mail API
    pub mail_api_key: Option<String>,
    /// Sender address for outbound e-mail
    pub mail_from: String,
    /// E-mail of the admin account created at startup
    pub admin_email: Option<String>,
    /// Concurrent e-mail jobs per worker
    pub workers: usize,
}

impl Config {
    const DEFAULT_BIND_ADDRESS: &'static str = "0.0.0.0:8080";
    const DEFAULT_MAIL_FROM: &'static str = "no-reply@tenantry.local";
    const DEFAULT_WORKERS: usize = 4;

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration using `lookup` to resolve variables.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let required =
            |var: &str| optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()));

        let workers = match optional("WORKERS") {
            Some(value) => value
                .parse::<usize>()
                .ok()
                .filter(|workers| *workers > 0)
                .ok_or_else(|| ConfigError::InvalidEnvValue {
                    var: "WORKERS".to_string(),
                    reason: format!("expected a positive integer, got {:?}", value),
                })?,
            None => Self::DEFAULT_WORKERS,
        };

        let app_url = required("APP_URL")?;
        if !app_url.starts_with("http://") && !app_url.starts_with("https://") {
            return Err(ConfigError::InvalidEnvValue {
                var: "APP_URL".to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            valkey_url: required("VALKEY_URL")?,
            app_url: app_url.trim_end_matches('/').to_string(),
            bind_address: optional("BIND_ADDRESS")
                .unwrap_or_else(|| Self::DEFAULT_BIND_ADDRESS.to_string()),
            mail_api_url: optional("MAIL_API_URL"),
            mail_api_key: optional("MAIL_API_KEY"),
            mail_from: optional("MAIL_FROM").unwrap_or_else(|| Self::DEFAULT_MAIL_FROM.to_string()),
            admin_email: optional("ADMIN_EMAIL").map(|email| email.trim().to_lowercase()),
            workers,
        })
    }
}
