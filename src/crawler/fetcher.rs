//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client from the configuration
//! - GET requests to fetch page content
//! - Capturing a full response (status line, headers, raw body) for archiving

use crate::config::Config;
use crate::output::TRANSPORT_FAILURE_STATUS;
use crate::archive::HttpResponse;
use reqwest::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use reqwest::{Client, Response};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Declared length, or the body length when none was declared
        content_length: Option<u64>,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// Declared length, if any
        content_length: Option<u64>,
    },

    /// Network error (connection refused, timeout, invalid URL, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Status code written to the crawl log
    ///
    /// Transport failures have no status and are logged as `-1`.
    pub fn log_status(&self) -> i32 {
        match self {
            Self::Success { status_code, .. } | Self::HttpError { status_code, .. } => {
                i32::from(*status_code)
            }
            Self::NetworkError { .. } => TRANSPORT_FAILURE_STATUS,
        }
    }

    /// Content length written to the crawl log (`None` is logged as `NA`)
    pub fn content_length(&self) -> Option<u64> {
        match self {
            Self::Success { content_length, .. } | Self::HttpError { content_length, .. } => {
                *content_length
            }
            Self::NetworkError { .. } => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The run configuration (user agent and optional timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use txtcrawl::config::Config;
/// use txtcrawl::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true);

    // No timeout unless configured
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a URL, following redirects
///
/// Every outcome is reported as a `FetchResult`; nothing here is fatal to the
/// crawl.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch, exactly as it appeared in the page
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    let declared_length = declared_content_length(&response);

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
            content_length: declared_length,
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            status_code: status.as_u16(),
            content_length: declared_length.or(Some(body.len() as u64)),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: format!("Failed to read body: {}", e),
        },
    }
}

/// Fetches a URL and captures the whole response for archiving
///
/// The body is kept as raw bytes. `Transfer-Encoding` is dropped from the
/// recorded headers because the body is stored de-chunked, and the status
/// line is written as HTTP/1.1 whatever version was negotiated.
pub async fn fetch_http_response(client: &Client, url: &str) -> Result<HttpResponse, reqwest::Error> {
    let response = client.get(url).send().await?;

    let status_line = format!("HTTP/1.1 {}", response.status());
    let headers = response
        .headers()
        .iter()
        .filter(|(name, _)| **name != TRANSFER_ENCODING)
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let payload = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status_line,
        headers,
        payload,
    })
}

/// The `Content-Length` header as sent by the server
///
/// `Response::content_length` reports the decoded size, which is unknown for
/// compressed bodies, so the header is read directly.
fn declared_content_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
