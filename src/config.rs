//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Environment variable holding the MongoDB connection string.
pub const CONNECTION_STRING_VAR: &str = "CONNECTION_STRING";

/// Local env file consulted when the connection string is not already set.
pub const LOCAL_ENV_FILE: &str = ".env.local";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Document Store ===
    /// MongoDB connection string (required).
    pub connection_string: String,

    /// Database holding all three collections.
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Collection of member records.
    #[serde(default = "default_members_collection")]
    pub members_collection: String,

    /// Collection of committee budgets.
    #[serde(default = "default_budgets_collection")]
    pub budgets_collection: String,

    /// Collection of funding requests.
    #[serde(default = "default_requests_collection")]
    pub requests_collection: String,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_database_name() -> String {
    "user_data".to_string()
}

fn default_members_collection() -> String {
    "membership_info".to_string()
}

fn default_budgets_collection() -> String {
    "committee_budget".to_string()
}

fn default_requests_collection() -> String {
    "requests".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment.
    ///
    /// `.env.local` (then `.env`) is only read when `CONNECTION_STRING` is not
    /// already present in the process environment.
    pub fn load() -> Result<Self, envy::Error> {
        if std::env::var_os(CONNECTION_STRING_VAR).is_none()
            && dotenvy::from_filename(LOCAL_ENV_FILE).is_err()
        {
            dotenvy::dotenv().ok();
        }
        envy::from_env()
    }

    /// Build configuration from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.connection_string.trim().is_empty() {
            return Err(format!("{CONNECTION_STRING_VAR} is required"));
        }

        if !self.connection_string.starts_with("mongodb://")
            && !self.connection_string.starts_with("mongodb+srv://")
        {
            return Err(format!(
                "{CONNECTION_STRING_VAR} must start with mongodb:// or mongodb+srv://"
            ));
        }

        if self.database_name.is_empty() {
            return Err("DATABASE_NAME must not be empty".to_string());
        }

        Ok(())
    }

    /// Connection string with any credentials masked, for display.
    pub fn redacted_connection_string(&self) -> String {
        let uri = &self.connection_string;
        match (uri.find("://"), uri.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***@{}", &uri[..scheme_end], &uri[at + 1..])
            }
            _ => uri.clone(),
        }
    }
}
