//! Application configuration, read from the environment.
//!
//! ## Environment Variables
//! - `GHL_CLIENT_ID`: OAuth client id (required, format `versionId-suffix`)
//! - `GHL_CLIENT_SECRET`: OAuth client secret (required)
//! - `GHL_REDIRECT_URI`: OAuth callback URL (required)
//! - `GHL_TOKEN_PATH`: where the token record is kept
//! - `GHL_API_BASE`: REST API and token endpoint base
//! - `GHL_MARKETPLACE_BASE`: authorization endpoint base
//! - `GHL_TIMEOUT_SECS`: network timeout for API requests

use crate::client_error::ClientError;
use std::path::PathBuf;
use std::time::Duration;

/// Default REST API base. The token endpoint lives here as well.
pub const DEFAULT_API_BASE: &str = "https://services.leadconnectorhq.com";

/// Default base of the page users are sent to in order to pick a location.
pub const DEFAULT_MARKETPLACE_BASE: &str = "https://marketplace.leadconnectorhq.com";

/// Default location of the token file.
pub const DEFAULT_TOKEN_PATH: &str = "storage/tokens.json";

/// Default network timeout for API requests, in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Credentials and endpoints used by the auth flow and the API client.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_path: PathBuf,
    pub api_base: String,
    pub marketplace_base: String,
    pub timeout: Duration,
}

impl Config {
    /// Create a config with the given credentials and default endpoints.
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Config {
        Config {
            client_id,
            client_secret,
            redirect_uri,
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            api_base: String::from(DEFAULT_API_BASE),
            marketplace_base: String::from(DEFAULT_MARKETPLACE_BASE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
        }
    }

    /// Load the configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first when present; variables already set
    /// in the environment take precedence over it.
    pub fn from_env() -> Result<Config, ClientError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(error) if error.not_found() => {}
            Err(error) => return Err(ClientError::Config(error.to_string())),
        }

        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| ClientError::Config(format!("{} is not set", key)))
        };

        let mut config = Config::new(
            required("GHL_CLIENT_ID")?,
            required("GHL_CLIENT_SECRET")?,
            required("GHL_REDIRECT_URI")?,
        );

        if let Some(path) = optional("GHL_TOKEN_PATH") {
            config.token_path = PathBuf::from(path);
        }

        if let Some(base) = optional("GHL_API_BASE") {
            config.api_base = base;
        }

        if let Some(base) = optional("GHL_MARKETPLACE_BASE") {
            config.marketplace_base = base;
        }

        if let Some(timeout) = optional("GHL_TIMEOUT_SECS") {
            let seconds = timeout.trim().parse::<u64>().map_err(|error| {
                ClientError::Config(format!("Invalid GHL_TIMEOUT_SECS: {}", error))
            })?;
            config.timeout = Duration::from_secs(seconds);
        }

        Ok(config)
    }

    /// Set the token file location.
    pub fn with_token_path<P: Into<PathBuf>>(mut self, path: P) -> Config {
        self.token_path = path.into();
        self
    }

    /// Point both the REST API and the token endpoint at another host.
    pub fn with_api_base<S: Into<String>>(mut self, base: S) -> Config {
        self.api_base = base.into();
        self
    }

    /// Point the authorization page at another host.
    pub fn with_marketplace_base<S: Into<String>>(mut self, base: S) -> Config {
        self.marketplace_base = base.into();
        self
    }

    /// Set the timeout for API requests.
    pub fn with_timeout(mut self, timeout: Duration) -> Config {
        self.timeout = timeout;
        self
    }

    /// The marketplace version id, which is the part of the client id before its first hyphen.
    pub fn version_id(&self) -> &str {
        self.client_id
            .split('-')
            .next()
            .unwrap_or(self.client_id.as_str())
    }
}
