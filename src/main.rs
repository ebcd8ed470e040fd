//! # Market Mood Bot
//!
//! Fetches the Market Mood Index (MMI) from public web pages, pulls a score
//! and a sentiment label out of their free-form HTML, and posts a short
//! summary to a Telegram chat.
//!
//! ## Usage
//!
//! ```sh
//! TELEGRAM_BOT_TOKEN=123:abc TELEGRAM_CHAT_ID=-100 market_mood_bot
//! market_mood_bot --dry-run
//! ```
//!
//! ## Architecture
//!
//! The application is a short linear pipeline, run once per invocation:
//! 1. **Fetching**: Download each configured source page, one at a time
//! 2. **Extraction**: Recover score and label with ordered pattern cascades
//! 3. **Formatting**: Render all source results into one Markdown message
//! 4. **Delivery**: Post the message through the Telegram Bot API
//!
//! Scheduling is left to the caller (cron, CI schedule, systemd timer).
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Message delivered (or printed with `--dry-run`) |
//! | 1 | Delivery failed, or the HTTP client could not be built |
//! | 2 | Configuration error, detected before any network call |

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod extract;
mod fetch;
mod models;
mod notify;
mod outputs;
mod pipeline;
mod utils;

#[cfg(test)]
mod test_support;

use cli::Cli;
use config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("Starting Market Mood Bot");

    let args = Cli::parse();
    debug!(config = ?args.config, dry_run = args.dry_run, "Parsed CLI arguments");

    // Credentials and settings are checked before any request goes out
    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration error");
            return ExitCode::from(2);
        }
    };
    info!(
        sources = config.sources.len(),
        timeout_secs = config.timeout.as_secs(),
        "Loaded configuration"
    );

    let client = match fetch::build_client() {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let outcome = pipeline::run(&config, &client).await;
    let elapsed = start_time.elapsed();

    match outcome {
        Ok(summary) => {
            match &summary.receipt {
                Some(receipt) => info!(
                    sources = summary.results.len(),
                    chars = summary.message.as_str().chars().count(),
                    secs = elapsed.as_secs(),
                    millis = elapsed.subsec_millis(),
                    message_id = ?receipt.message_id,
                    "✅ Message sent successfully!"
                ),
                None => info!(
                    secs = elapsed.as_secs(),
                    millis = elapsed.subsec_millis(),
                    "Dry run complete"
                ),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(
                secs = elapsed.as_secs(),
                millis = elapsed.subsec_millis(),
                error = %e,
                "❌ Failed to send message"
            );
            ExitCode::FAILURE
        }
    }
}
