//! HTTP client for the quote API
//!
//! Wraps a reqwest client that keeps one connection pool for the lifetime of
//! the benchmark, so every request after the first can reuse the connection.

use anyhow::{Context, Result};
use reqwest::{
    header::{HeaderValue, ACCEPT, AUTHORIZATION},
    redirect::Policy,
    Client, Url,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::{ApiConfig, Credentials};
use crate::models::SymbolSet;

/// Path of the quotes endpoint, relative to the base URL
const QUOTES_PATH: &str = "/data/quotes";

/// Quote client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Timeout after {0} ms")]
    Timeout(u64),

    #[error("Connection failed to {0}")]
    Connect(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error (code {code:?}): {message}")]
    Api { code: Option<i64>, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Body of a quotes response. Only the status fields are interpreted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// `"ok"` or `"error"`
    #[serde(rename = "s", default)]
    pub status: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    /// One entry per returned quote
    #[serde(rename = "d", default)]
    pub quotes: Vec<serde_json::Value>,
}

impl QuoteResponse {
    pub fn is_error(&self) -> bool {
        self.status.eq_ignore_ascii_case("error")
    }
}

/// Anything that can fetch quotes for a symbol set.
///
/// Each call completes before the caller issues the next one.
pub trait QuoteSource {
    fn fetch_quotes(
        &self,
        symbols: &SymbolSet,
    ) -> impl Future<Output = Result<QuoteResponse, ClientError>>;
}

/// Authenticated quote API client
#[derive(Clone)]
pub struct QuoteClient {
    client: Client,
    base_url: String,
    endpoint: Url,
    authorization: HeaderValue,
    connect_timeout_ms: u64,
    request_timeout_ms: u64,
}

impl QuoteClient {
    /// Create a client with its own, initially empty, connection pool
    pub fn new(credentials: &Credentials, api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(api.user_agent.as_str())
            .connect_timeout(Duration::from_millis(api.connect_timeout_ms))
            .timeout(Duration::from_millis(api.request_timeout_ms))
            .redirect(Policy::none())
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        let mut authorization = HeaderValue::from_str(&credentials.authorization())
            .context("Credentials contain characters not allowed in a header")?;
        authorization.set_sensitive(true);

        let base_url = api.base_url.trim_end_matches('/').to_string();
        let endpoint = Url::parse(&format!("{base_url}{QUOTES_PATH}"))
            .with_context(|| format!("Invalid base URL: {}", api.base_url))?;

        Ok(Self {
            client,
            base_url,
            endpoint,
            authorization,
            connect_timeout_ms: api.connect_timeout_ms,
            request_timeout_ms: api.request_timeout_ms,
        })
    }

    /// Full URL of the quotes request for a symbol set. The symbol list is
    /// form-encoded, so `&`, `,` and `:` inside symbols survive intact.
    pub fn quotes_url(&self, symbols: &SymbolSet) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("symbols", &symbols.query());
        url
    }

    /// Timeout error carrying the limit that actually expired
    fn timeout_error(&self, connecting: bool) -> ClientError {
        if connecting {
            ClientError::Timeout(self.connect_timeout_ms)
        } else {
            ClientError::Timeout(self.request_timeout_ms)
        }
    }

    /// Fetch quotes, failing on transport errors, non-2xx responses, and
    /// API-level errors
    pub async fn fetch(&self, symbols: &SymbolSet) -> Result<QuoteResponse, ClientError> {
        let url = self.quotes_url(symbols);
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.timeout_error(e.is_connect())
                } else if e.is_connect() {
                    ClientError::Connect(self.base_url.clone())
                } else {
                    ClientError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let quote: QuoteResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error(false)
            } else {
                ClientError::Decode(e.to_string())
            }
        })?;

        if quote.is_error() {
            return Err(ClientError::Api {
                code: quote.code,
                message: quote.message.clone().unwrap_or_default(),
            });
        }

        debug!("Response {} with {} quotes", status.as_u16(), quote.quotes.len());
        Ok(quote)
    }
}

impl QuoteSource for QuoteClient {
    async fn fetch_quotes(&self, symbols: &SymbolSet) -> Result<QuoteResponse, ClientError> {
        self.fetch(symbols).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve each canned `(status line, body)` to one connection, recording
    /// the request heads received
    async fn serve(
        responses: Vec<(&'static str, &'static str)>,
    ) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = seen.clone();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                recorded
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&buf).to_string());

                let reply = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        (format!("http://{addr}"), seen)
    }

    fn client_with(api: ApiConfig) -> QuoteClient {
        QuoteClient::new(&Credentials::new("APP-100", "token123"), &api).unwrap()
    }

    fn client_for(base_url: &str) -> QuoteClient {
        client_with(ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
    }

    #[test]
    fn test_quotes_url() {
        let client = client_for("https://api.example.com/");
        let symbols = SymbolSet::new(["NSE:SBIN-EQ", "NSE:TCS-EQ"]);
        assert_eq!(
            client.quotes_url(&symbols).as_str(),
            "https://api.example.com/data/quotes?symbols=NSE%3ASBIN-EQ%2CNSE%3ATCS-EQ"
        );
    }

    #[test]
    fn test_quotes_url_keeps_ampersand_in_symbol() {
        let client = client_for("https://api.example.com");
        let symbols = SymbolSet::new(["NSE:M&M-EQ", "NSE:TCS-EQ"]);
        let url = client.quotes_url(&symbols);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("symbols".to_string(), "NSE:M&M-EQ,NSE:TCS-EQ".to_string())]
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let api = ApiConfig {
            base_url: "http://bad host".to_string(),
            ..ApiConfig::default()
        };
        assert!(QuoteClient::new(&Credentials::new("APP-100", "token123"), &api).is_err());
    }

    #[test]
    fn test_timeout_error_reports_expired_limit() {
        let client = client_with(ApiConfig {
            connect_timeout_ms: 1500,
            request_timeout_ms: 4000,
            ..ApiConfig::default()
        });
        assert!(matches!(client.timeout_error(true), ClientError::Timeout(1500)));
        assert!(matches!(client.timeout_error(false), ClientError::Timeout(4000)));
    }

    #[test]
    fn test_response_status() {
        let ok: QuoteResponse =
            serde_json::from_str(r#"{"s":"ok","code":200,"d":[{}, {}]}"#).unwrap();
        assert!(!ok.is_error());
        assert_eq!(ok.quotes.len(), 2);

        let err: QuoteResponse =
            serde_json::from_str(r#"{"s":"error","code":-16,"message":"bad token"}"#).unwrap();
        assert!(err.is_error());
    }

    #[tokio::test]
    async fn test_fetch_sends_auth_and_symbols() {
        let body = r#"{"s":"ok","code":200,"d":[{"n":"NSE:SBIN-EQ"}]}"#;
        let (base, seen) = serve(vec![("200 OK", body)]).await;
        let client = client_for(&base);

        let response = client.fetch(&SymbolSet::new(["NSE:SBIN-EQ"])).await.unwrap();
        assert_eq!(response.quotes.len(), 1);

        let requests = seen.lock().unwrap();
        let head = requests[0].to_lowercase();
        assert!(head.starts_with("get /data/quotes?symbols=nse%3asbin-eq "));
        assert!(head.contains("authorization: app-100:token123"));
        assert!(head.contains("accept: application/json"));
    }

    #[tokio::test]
    async fn test_ampersand_symbol_sent_as_one_value() {
        let (base, seen) = serve(vec![("200 OK", r#"{"s":"ok","d":[]}"#)]).await;
        let client = client_for(&base);

        client.fetch(&SymbolSet::new(["NSE:M&M-EQ"])).await.unwrap();

        let requests = seen.lock().unwrap();
        let head = requests[0].to_lowercase();
        assert!(head.starts_with("get /data/quotes?symbols=nse%3am%26m-eq "));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = client_with(ApiConfig {
            base_url: format!("http://{addr}"),
            request_timeout_ms: 200,
            ..ApiConfig::default()
        });
        match client.fetch(&SymbolSet::default()).await {
            Err(ClientError::Timeout(ms)) => assert_eq!(ms, 200),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (base, _) = serve(vec![("401 Unauthorized", r#"{"s":"error"}"#)]).await;
        let client = client_for(&base);

        match client.fetch(&SymbolSet::default()).await {
            Err(ClientError::Status { status, .. }) => assert_eq!(status, 401),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_api_error_is_error() {
        let (base, _) = serve(vec![(
            "200 OK",
            r#"{"s":"error","code":-300,"message":"Invalid symbol"}"#,
        )])
        .await;
        let client = client_for(&base);

        match client.fetch_quotes(&SymbolSet::default()).await {
            Err(ClientError::Api { code, message }) => {
                assert_eq!(code, Some(-300));
                assert_eq!(message, "Invalid symbol");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        let (base, _) = serve(vec![("200 OK", "not json")]).await;
        let client = client_for(&base);

        assert!(matches!(
            client.fetch(&SymbolSet::default()).await,
            Err(ClientError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}"));
        assert!(client.fetch(&SymbolSet::default()).await.is_err());
    }
}
