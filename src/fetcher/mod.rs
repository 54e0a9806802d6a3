//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the miner:
//! - Building the HTTP client with configured timeouts
//! - GET requests for page documents (HTML)
//! - GET requests for structured payloads (JSON) with the fixed
//!   same-origin XHR header set the site expects
//! - Error classification into transport, status, and decode failures
//!
//! There is no retry here. A failed fetch surfaces to the caller, which either
//! falls back to another endpoint or gives the target back to the frontier.

use crate::config::FetcherConfig;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, PRAGMA, REFERER};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised by a single fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("JSON decode error for {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// HTTP status of the failed response, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http { source, .. } => source.status().map(|s| s.as_u16()),
            Self::Decode { .. } => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use canary::config::FetcherConfig;
/// use canary::fetcher::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches page documents and structured payloads
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Fetches an HTML document as text
    pub async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "text/html")
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        check_status(url, response)?
            .text()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })
    }

    /// Fetches a JSON payload with the XHR header set and decodes it into `T`
    ///
    /// `referer` is the page the request pretends to originate from; the site
    /// rejects payload requests that do not carry one.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        referer: &Url,
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(CONTENT_TYPE, "application/json")
            .header(PRAGMA, "no-cache")
            .header("x-requested-with", "XMLHttpRequest")
            .header(REFERER, referer.as_str())
            .header("referrer-policy", "strict-origin-when-cross-origin")
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        check_status(url, response)?
            .json::<T>()
            .await
            .map_err(|source| {
                let url = url.to_string();
                if source.is_decode() {
                    FetchError::Decode { url, source }
                } else {
                    FetchError::Http { url, source }
                }
            })
    }
}

fn check_status(url: &Url, response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}
