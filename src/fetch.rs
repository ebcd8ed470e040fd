//! Page retrieval for the configured sources.
//!
//! One GET per source per run, with a browser `User-Agent` (some sites turn
//! away default client identities) and a fixed per-request timeout. There is
//! no retry: a failed attempt is final for that source in that run.

use reqwest::Client;
use reqwest::header::USER_AGENT;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::utils::truncate_for_log;

/// Why a page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    /// Connection, DNS, TLS, timeout or body-read failure.
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Transport(format!("request timed out: {e}"))
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// A successfully downloaded page.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Build the HTTP client shared by the fetcher and the notifier.
///
/// Timeouts are applied per request so each caller controls its own budget.
pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Fetch a single page.
///
/// # Errors
///
/// - [`FetchError::HttpStatus`] for any non-2xx response
/// - [`FetchError::Transport`] for everything that prevents a response body
///   from arriving within `timeout`
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch(
    client: &Client,
    url: &str,
    user_agent: &str,
    timeout: Duration,
) -> Result<RawPage, FetchError> {
    let t0 = Instant::now();
    let resp = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "Source answered with an error status");
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = resp.text().await?;
    info!(
        status = status.as_u16(),
        bytes = body.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetched page"
    );
    debug!(body = %truncate_for_log(&body, 300), "Page preview");

    Ok(RawPage {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}
