//! Command line configuration

use clap::{Args, ValueEnum};

use crate::client::ClientConfig;

/// Hosted backend settings.
#[derive(Debug, Args)]
pub struct BackendConfig {
    /// Backend base URL
    #[arg(long = "backend-url", env = "DEALS_BACKEND_URL")]
    pub url: Option<String>,

    /// Backend public API key
    #[arg(long = "backend-key", env = "DEALS_BACKEND_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Access token of a signed-in session
    #[arg(long = "access-token", env = "DEALS_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

impl BackendConfig {
    /// Client settings, when both the URL and the key are configured.
    pub fn client_config(&self) -> Option<ClientConfig> {
        Some(ClientConfig {
            url: self.url.clone()?,
            key: self.key.clone()?,
            access_token: self.access_token.clone(),
        })
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_config_needs_url_and_key() {
        let partial = BackendConfig {
            url: Some("https://deals.example.co".to_string()),
            key: None,
            access_token: None,
        };

        assert!(partial.client_config().is_none());

        let complete = BackendConfig {
            key: Some("anon".to_string()),
            ..partial
        };

        assert!(complete.client_config().is_some());
    }
}
