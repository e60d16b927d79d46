//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

use crate::models::SymbolSet;

/// Environment variable prefix
const ENV_PREFIX: &str = "QUOTE_BENCH";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Client id from QUOTE_BENCH_CLIENT_ID
    pub client_id: Option<String>,
    /// Access token from QUOTE_BENCH_ACCESS_TOKEN
    pub access_token: Option<String>,
    /// API base URL from QUOTE_BENCH_BASE_URL
    pub base_url: Option<String>,
    /// Comma-separated symbols from QUOTE_BENCH_SYMBOLS
    pub symbols: Option<SymbolSet>,
    /// Request count from QUOTE_BENCH_REQUESTS
    pub requests: Option<usize>,
    /// Config file from QUOTE_BENCH_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            client_id: get_env("CLIENT_ID"),
            access_token: get_env("ACCESS_TOKEN"),
            base_url: get_env("BASE_URL"),
            symbols: get_env_parse("SYMBOLS"),
            requests: get_env_parse("REQUESTS"),
            config_file: get_env("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.client_id.is_some()
            || self.access_token.is_some()
            || self.base_url.is_some()
            || self.symbols.is_some()
            || self.requests.is_some()
            || self.config_file.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        let token = self.access_token.as_ref().map(|_| "<set>");
        println!("Environment Configuration:");
        println!("  {}_CLIENT_ID:    {:?}", ENV_PREFIX, self.client_id);
        println!("  {}_ACCESS_TOKEN: {:?}", ENV_PREFIX, token);
        println!("  {}_BASE_URL:     {:?}", ENV_PREFIX, self.base_url);
        println!(
            "  {}_SYMBOLS:      {:?}",
            ENV_PREFIX,
            self.symbols.as_ref().map(SymbolSet::query)
        );
        println!("  {}_REQUESTS:     {:?}", ENV_PREFIX, self.requests);
        println!("  {}_CONFIG:       {:?}", ENV_PREFIX, self.config_file);
        if !self.has_any() {
            println!("  (no {ENV_PREFIX}_* variables set)");
        }
    }
}

/// Get environment variable with prefix, ignoring empty values
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.trim().parse().ok())
}

/// Print all QUOTE_BENCH environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_CLIENT_ID     API client (app) id");
    println!("  {ENV_PREFIX}_ACCESS_TOKEN  API access token");
    println!("  {ENV_PREFIX}_BASE_URL      API base URL");
    println!("  {ENV_PREFIX}_SYMBOLS       Comma-separated symbols to fetch");
    println!("  {ENV_PREFIX}_REQUESTS      Number of timed requests");
    println!("  {ENV_PREFIX}_CONFIG        Path to configuration file");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_CLIENT_ID=ZYXABCDEF-100");
    println!("  export {ENV_PREFIX}_ACCESS_TOKEN=eyJhbGc...");
    println!("  quote-bench run");
}
