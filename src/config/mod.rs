//! Configuration module
//!
//! Handles loading and managing the benchmark configuration. Values are
//! layered: built-in defaults, then a config file, then `QUOTE_BENCH_*`
//! environment variables, then command-line flags.

mod env;
mod file;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::SymbolSet;

pub use env::{print_env_help, EnvConfig};
pub use file::find_config;

/// Default quote API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api-t1.fyers.in";

/// Default number of timed requests per run
pub const DEFAULT_REQUESTS: usize = 100;

/// Fewest requests that still yield a spread and a warm average
pub const MIN_RUN_REQUESTS: usize = 2;

/// API credentials
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Application (client) identifier
    pub client_id: String,
    /// Bearer access token
    pub access_token: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Value of the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("{}:{}", self.client_id, self.access_token)
    }

    /// Access token with everything but the first and last 4 characters hidden
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.access_token.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}{}{tail}", "*".repeat(chars.len() - 8))
    }

    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.access_token.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("access_token", &self.masked_token())
            .finish()
    }
}

/// Quote API endpoint settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and host of the API
    pub base_url: String,
    /// User-Agent header
    pub user_agent: String,
    /// TCP/TLS connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("quote-bench/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout_ms: 3000,
            request_timeout_ms: 5000,
        }
    }
}

/// Benchmark configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub credentials: Credentials,
    pub api: ApiConfig,
    /// Symbols fetched on every request
    pub symbols: SymbolSet,
    /// Number of timed requests
    pub requests: usize,
    /// Start from a fresh client with no primed connection
    pub cold_start: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            api: ApiConfig::default(),
            symbols: SymbolSet::default_set(),
            requests: DEFAULT_REQUESTS,
            cold_start: true,
        }
    }
}

impl BenchConfig {
    /// Example configuration written by `config init`
    pub fn example() -> Self {
        Self {
            credentials: Credentials::new("ZYXABCDEF-100", "<access-token>"),
            ..Self::default()
        }
    }

    /// Apply environment overrides (environment takes precedence)
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(client_id) = &env.client_id {
            self.credentials.client_id = client_id.clone();
        }
        if let Some(token) = &env.access_token {
            self.credentials.access_token = token.clone();
        }
        if let Some(base_url) = &env.base_url {
            self.api.base_url = base_url.clone();
        }
        if let Some(symbols) = &env.symbols {
            self.symbols = symbols.clone();
        }
        if let Some(requests) = env.requests {
            self.requests = requests;
        }
    }

    /// Validate everything except credentials
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            anyhow::bail!("At least one symbol is required");
        }
        if self.requests == 0 {
            anyhow::bail!("Request count must be positive");
        }
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            anyhow::bail!(
                "Invalid base URL '{}': expected an http:// or https:// URL",
                self.api.base_url
            );
        }
        if self.api.request_timeout_ms == 0 || self.api.connect_timeout_ms == 0 {
            anyhow::bail!("Timeouts must be positive");
        }
        Ok(())
    }

    /// Validate, additionally requiring credentials for a live run
    pub fn validate_for_run(&self) -> Result<()> {
        self.validate()?;
        if self.requests < MIN_RUN_REQUESTS {
            anyhow::bail!(
                "At least {} requests are needed for a report, got {}",
                MIN_RUN_REQUESTS,
                self.requests
            );
        }
        if !self.credentials.is_complete() {
            anyhow::bail!(
                "Missing API credentials: set credentials.client_id and credentials.access_token \
                 in the config file or QUOTE_BENCH_CLIENT_ID / QUOTE_BENCH_ACCESS_TOKEN"
            );
        }
        Ok(())
    }

    /// Copy suitable for display, with the token masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.credentials.access_token = self.credentials.masked_token();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert_eq!(config.requests, 100);
        assert_eq!(config.symbols.len(), 3);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert!(config.cold_start);
        assert!(config.validate().is_ok());
        assert!(config.validate_for_run().is_err());
    }

    #[test]
    fn test_validation_failures() {
        let config = BenchConfig {
            requests: 0,
            ..BenchConfig::example()
        };
        assert!(config.validate().is_err());

        let config = BenchConfig {
            symbols: SymbolSet::new(Vec::<String>::new()),
            ..BenchConfig::example()
        };
        assert!(config.validate().is_err());

        let mut config = BenchConfig::example();
        config.api.base_url = "ftp://api".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_is_runnable() {
        assert!(BenchConfig::example().validate_for_run().is_ok());

        let single = BenchConfig {
            requests: 1,
            ..BenchConfig::example()
        };
        assert!(single.validate().is_ok());
        assert!(single.validate_for_run().is_err());
    }

    #[test]
    fn test_authorization_header() {
        let creds = Credentials::new("APP-100", "secret");
        assert_eq!(creds.authorization(), "APP-100:secret");
    }

    #[test]
    fn test_token_is_masked() {
        let creds = Credentials::new("APP-100", "abcdefghijkl");
        assert_eq!(creds.masked_token(), "abcd****ijkl");
        assert!(!format!("{creds:?}").contains("efgh"));
        assert_eq!(Credentials::new("a", "short").masked_token(), "*****");

        let config = BenchConfig {
            credentials: creds,
            ..Default::default()
        };
        assert_eq!(config.redacted().credentials.access_token, "abcd****ijkl");
    }

    #[test]
    fn test_apply_env() {
        let mut config = BenchConfig::default();
        let env = EnvConfig {
            client_id: Some("APP-1".to_string()),
            requests: Some(20),
            ..Default::default()
        };
        config.apply_env(&env);

        assert_eq!(config.credentials.client_id, "APP-1");
        assert_eq!(config.requests, 20);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }
}
