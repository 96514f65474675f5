//! Application configuration loaded from environment variables.

use std::net::SocketAddr;

use serde::Deserialize;

use crate::error::AppError;
use crate::items::ItemsResponseMode;

/// Filter used when verbose logging is requested.
pub const VERBOSE_DIRECTIVE: &str = "tutorial_api=debug,tower_http=debug,info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Interface the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,

    /// Serve `/openapi.json` and the `/docs` UI.
    #[serde(default = "default_true")]
    pub enable_docs: bool,

    // === Settings Dependency ===
    /// Application name reported by the settings provider.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Per-user item allowance reported by the settings provider.
    #[serde(default = "default_items_per_user")]
    pub items_per_user: u32,

    // === Authentication ===
    /// The only token the authentication dependency accepts.
    #[serde(default = "default_auth_token")]
    pub auth_token: String,

    // === Handlers ===
    /// Response shape of `POST /items/`: typed or echo.
    #[serde(default)]
    pub items_response: ItemsResponseMode,

    /// Placeholder value handed out by the database dependency.
    #[serde(default = "default_db_connection")]
    pub db_connection: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_app_name() -> String {
    "Awesome API".to_string()
}

fn default_items_per_user() -> u32 {
    50
}

fn default_auth_token() -> String {
    "valid-token".to_string()
}

fn default_db_connection() -> String {
    "fake_db_connection".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
            enable_docs: default_true(),
            app_name: default_app_name(),
            items_per_user: default_items_per_user(),
            auth_token: default_auth_token(),
            items_response: ItemsResponseMode::default(),
            db_connection: default_db_connection(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Build configuration from explicit key/value pairs instead of the process
    /// environment. Keys follow the same upper-case naming as the environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be between 1 and 65535".to_string());
        }

        if self.auth_token.trim().is_empty() {
            return Err("AUTH_TOKEN must not be empty".to_string());
        }

        if self.app_name.trim().is_empty() {
            return Err("APP_NAME must not be empty".to_string());
        }

        if self.db_connection.is_empty() {
            return Err("DB_CONNECTION must not be empty".to_string());
        }

        Ok(())
    }

    /// Tracing filter directive. Verbose mode (from the CLI flag or `VERBOSE`)
    /// overrides `RUST_LOG`.
    pub fn log_directive(&self, cli_verbose: bool) -> String {
        if cli_verbose || self.verbose {
            VERBOSE_DIRECTIVE.to_string()
        } else {
            self.rust_log.clone()
        }
    }

    /// Socket address the HTTP server listens on.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e: std::net::AddrParseError| AppError::InvalidAddress {
            addr,
            reason: e.to_string(),
        })
    }
}
