//! Run orchestration: fetch → extract → format → notify.
//!
//! Stages advance strictly in order:
//!
//! ```text
//! Idle → Fetching(0) → … → Fetching(n-1) → Formatting → Sending → Done | Failed
//! ```
//!
//! Sources are handled one after another in configured order. A source that
//! cannot be fetched only degrades its own section of the message; the only
//! run-level failure is a failed delivery.

use chrono::Local;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use reqwest::Client;
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{Config, Delivery, SourceConfig};
use crate::extract::extract;
use crate::fetch::fetch;
use crate::models::{DeliveryReceipt, Outcome, RenderedMessage, SourceResult};
use crate::notify::{DeliveryError, TelegramNotifier};
use crate::outputs::message::format_message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching(usize),
    Formatting,
    Sending,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => f.write_str("idle"),
            Stage::Fetching(i) => write!(f, "fetching[{i}]"),
            Stage::Formatting => f.write_str("formatting"),
            Stage::Sending => f.write_str("sending"),
            Stage::Done => f.write_str("done"),
            Stage::Failed => f.write_str("failed"),
        }
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "Entering stage");
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub results: Vec<(String, SourceResult)>,
    pub message: RenderedMessage,
    /// `None` for a dry run.
    pub receipt: Option<DeliveryReceipt>,
}

/// Fetch and extract one source. Never fails: fetch errors become the
/// result's error text.
#[instrument(level = "info", skip_all, fields(source = %source.name, kind = %source.kind))]
pub async fn process_source(client: &Client, config: &Config, source: &SourceConfig) -> SourceResult {
    match fetch(client, &source.url, &config.user_agent, config.timeout).await {
        Ok(page) => {
            debug!(status = page.status, url = %page.url, "Extracting from page");
            let result = extract(&page.body, source.kind);
            if matches!(&result.outcome, Outcome::Extracted(reading) if !reading.is_complete()) {
                warn!("Could not extract complete data; the page layout may have changed");
            }
            info!(
                score = ?result.score(),
                label = result.label().unwrap_or("N/A"),
                "Extracted reading"
            );
            result
        }
        Err(e) => {
            warn!(error = %e, url = %source.url, "Fetch failed; source will show an error line");
            SourceResult::failed(source.kind, format!("{} fetch failed: {}", source.name, e))
        }
    }
}

/// Process every configured source sequentially, preserving order.
pub async fn collect_results(client: &Client, config: &Config) -> Vec<(String, SourceResult)> {
    stream::iter(config.sources.iter().enumerate())
        .then(|(index, source)| async move {
            enter(Stage::Fetching(index));
            info!(source = %source.name, "Fetching {} data...", source.name);
            (source.name.clone(), process_source(client, config, source).await)
        })
        .collect()
        .await
}

/// One-line status for the console: `TickerTape: 52.92 (Neutral) | GoodReturns: N/A (N/A)`.
pub fn status_line(results: &[(String, SourceResult)]) -> String {
    results
        .iter()
        .map(|(name, result)| {
            let score = result
                .score()
                .map(|s| format!("{s:.2}"))
                .unwrap_or_else(|| "N/A".to_string());
            let label = result.label().unwrap_or("N/A");
            format!("{name}: {score} ({label})")
        })
        .join(" | ")
}

/// Execute one full run.
///
/// # Errors
///
/// Only [`DeliveryError`]; per-source problems are folded into the message.
#[instrument(level = "info", skip_all, fields(sources = config.sources.len()))]
pub async fn run(config: &Config, client: &Client) -> Result<RunSummary, DeliveryError> {
    enter(Stage::Idle);
    let results = collect_results(client, config).await;
    if let Ok(json) = serde_json::to_string(&results) {
        debug!(results = %json, "Collected source results");
    }

    enter(Stage::Formatting);
    let message = format_message(&results, &Local::now());

    enter(Stage::Sending);
    let receipt = match &config.delivery {
        Delivery::DryRun => {
            info!("Dry run; printing message instead of sending");
            println!("{message}");
            None
        }
        Delivery::Telegram(creds) => {
            info!("Sending Telegram message...");
            let notifier = TelegramNotifier::new(client.clone(), config.telegram_api_base.clone())
                .with_timeout(config.timeout);
            match notifier.send(&message, creds).await {
                Ok(receipt) => Some(receipt),
                Err(e) => {
                    enter(Stage::Failed);
                    error!(error = %e, "Failed to send Telegram message");
                    return Err(e);
                }
            }
        }
    };

    enter(Stage::Done);
    info!(status = %status_line(&results), "Run complete");

    Ok(RunSummary {
        results,
        message,
        receipt,
    })
}
