//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Ledger policy configuration.
    pub ledger: LedgerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Ledger policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Account code of the designated retained-earnings equity account.
    ///
    /// The fiscal-year closing entry books net income against this account.
    #[serde(default = "default_retained_earnings_code")]
    pub retained_earnings_code: String,
}

fn default_retained_earnings_code() -> String {
    "3200".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            retained_earnings_code: default_retained_earnings_code(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BALANS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
