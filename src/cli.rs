//! Command-line interface definitions for the Market Mood bot.
//!
//! Every option is optional so the bot can be invoked with no arguments by
//! an external scheduler; credentials then come from the environment.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Market Mood bot.
///
/// # Examples
///
/// ```sh
/// # Scheduled run, credentials from the environment
/// TELEGRAM_BOT_TOKEN=123:abc TELEGRAM_CHAT_ID=-100 market_mood_bot
///
/// # Print the message instead of sending it
/// market_mood_bot --dry-run
///
/// # Custom source list and timeout
/// market_mood_bot --config ./market_mood.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file (sources, timeout, user agent)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Telegram chat identifier to post to
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub chat_id: Option<String>,

    /// Print the rendered message to stdout instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "market_mood_bot",
            "--config",
            "./market_mood.yaml",
            "--token",
            "123:abc",
            "--chat-id",
            "-100",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("./market_mood.yaml")));
        assert_eq!(cli.token.as_deref(), Some("123:abc"));
        assert_eq!(cli.chat_id.as_deref(), Some("-100"));
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["market_mood_bot", "-c", "/tmp/mmi.yaml", "--dry-run"]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/mmi.yaml")));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_no_arguments() {
        let cli = Cli::parse_from(["market_mood_bot"]);
        assert!(cli.config.is_none());
        assert!(!cli.dry_run);
    }
}
