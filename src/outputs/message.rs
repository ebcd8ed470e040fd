//! Rendering of source results into a Telegram Markdown message.
//!
//! Layout:
//!
//! ```text
//! 📊 *Market Mood Index Update*
//! 🕐 18 October 2026, 09:15 AM
//!
//! 📈 *TickerTape:*
//! 🔢 MMI Score: *52.92*
//! 😐 Mood: *Neutral*
//!
//! 📈 *GoodReturns:*
//! ❌ GoodReturns fetch failed: HTTP status 503
//!
//! ℹ️ _Sources: TickerTape, GoodReturns_
//! _Different sources may show slightly different values._
//! ```
//!
//! Only `*bold*` and `_italic_` markers are emitted. Page-derived text is
//! inserted as-is; nothing is escaped.

use chrono::{DateTime, TimeZone};
use itertools::Itertools;
use std::fmt::{Display, Write};

use crate::models::{Mood, Outcome, RenderedMessage, SourceResult};

pub const TITLE: &str = "📊 *Market Mood Index Update*";
pub const INCOMPLETE_LINE: &str = "⚠️ Could not extract complete data";
pub const DISCLAIMER: &str = "_Different sources may show slightly different values._";

/// `18 October 2026, 09:15 AM`
const TIMESTAMP_FORMAT: &str = "%d %B %Y, %I:%M %p";

fn mood_emoji(label: &str) -> &'static str {
    match Mood::parse(label) {
        Some(Mood::ExtremeFear) => "😱",
        Some(Mood::Fear) => "😟",
        Some(Mood::Neutral) => "😐",
        Some(Mood::Greed) => "🤑",
        Some(Mood::ExtremeGreed) => "🚀",
        None => "🧭",
    }
}

/// Render results, in the given order, into one message.
pub fn format_message<Tz>(results: &[(String, SourceResult)], generated_at: &DateTime<Tz>) -> RenderedMessage
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut text = String::new();

    writeln!(text, "{TITLE}").unwrap();
    writeln!(text, "🕐 {}", generated_at.format(TIMESTAMP_FORMAT)).unwrap();

    for (name, result) in results {
        writeln!(text).unwrap();
        writeln!(text, "📈 *{name}:*").unwrap();
        match &result.outcome {
            Outcome::Failed(error) => {
                writeln!(text, "❌ {error}").unwrap();
            }
            Outcome::Extracted(reading) => match (reading.score, reading.label.as_deref()) {
                (Some(score), Some(label)) => {
                    writeln!(text, "🔢 MMI Score: *{score:.2}*").unwrap();
                    writeln!(text, "{} Mood: *{label}*", mood_emoji(label)).unwrap();
                }
                _ => {
                    writeln!(text, "{INCOMPLETE_LINE}").unwrap();
                }
            },
        }
    }

    writeln!(text).unwrap();
    writeln!(
        text,
        "ℹ️ _Sources: {}_",
        results.iter().map(|(name, _)| name.as_str()).join(", ")
    )
    .unwrap();
    write!(text, "{DISCLAIMER}").unwrap();

    RenderedMessage::new(text)
}
