//! Data models for sources, extraction results and delivery.
//!
//! This module defines the core data structures used throughout the application:
//! - [`SourceKind`]: Which family of page a source belongs to
//! - [`SourceResult`]: What one fetch-and-extract attempt produced
//! - [`Mood`]: The five canonical sentiment labels and their score thresholds
//! - [`RenderedMessage`]: The formatted text handed to the notifier
//! - [`DeliveryReceipt`]: The messaging platform's acknowledgement
//!
//! Every value here is built fresh for a single run and dropped afterwards;
//! nothing is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The family of page a source URL points at.
///
/// Both kinds go through the same extraction cascade; the tag travels with
/// the result so logs and the rendered message can tell sources apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A TickerTape-style MMI page ("MMI changed from ... ", "is in the ... zone").
    TickerTape,
    /// Any other HTML page that mentions the index in prose (e.g. GoodReturns).
    GenericHtml,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::TickerTape => f.write_str("ticker_tape"),
            SourceKind::GenericHtml => f.write_str("generic_html"),
        }
    }
}

/// Score and label recovered from a page.
///
/// Either field may be absent when the page layout has drifted; that is a
/// normal outcome and is rendered as "could not extract complete data".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reading {
    pub score: Option<f64>,
    pub label: Option<String>,
}

impl Reading {
    /// Both a score and a label are present.
    pub fn is_complete(&self) -> bool {
        self.score.is_some() && self.label.is_some()
    }
}

/// Outcome of one source's fetch-and-extract attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// The page was fetched; the reading holds whatever the matchers found.
    Extracted(Reading),
    /// The page could not be fetched. Carries the user-facing error text.
    Failed(String),
}

/// Result for a single source in a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceResult {
    pub source: SourceKind,
    pub outcome: Outcome,
}

impl SourceResult {
    pub fn extracted(source: SourceKind, reading: Reading) -> Self {
        Self {
            source,
            outcome: Outcome::Extracted(reading),
        }
    }

    pub fn failed(source: SourceKind, error: impl Into<String>) -> Self {
        Self {
            source,
            outcome: Outcome::Failed(error.into()),
        }
    }

    pub fn score(&self) -> Option<f64> {
        match &self.outcome {
            Outcome::Extracted(reading) => reading.score,
            Outcome::Failed(_) => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Extracted(reading) => reading.label.as_deref(),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed(error) => Some(error),
            Outcome::Extracted(_) => None,
        }
    }
}

/// The five canonical Market Mood Index zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl Mood {
    /// Multi-word labels come first so "Fear" never shadows "Extreme Fear".
    pub const BY_SPECIFICITY: [Mood; 5] = [
        Mood::ExtremeFear,
        Mood::ExtremeGreed,
        Mood::Fear,
        Mood::Greed,
        Mood::Neutral,
    ];

    /// Map a score onto its zone.
    ///
    /// | score | zone |
    /// |-------|------|
    /// | `< 25` | Extreme Fear |
    /// | `25 ≤ s < 45` | Fear |
    /// | `45 ≤ s < 55` | Neutral |
    /// | `55 ≤ s < 75` | Greed |
    /// | `≥ 75` | Extreme Greed |
    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            Mood::ExtremeFear
        } else if score < 45.0 {
            Mood::Fear
        } else if score < 55.0 {
            Mood::Neutral
        } else if score < 75.0 {
            Mood::Greed
        } else {
            Mood::ExtremeGreed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::ExtremeFear => "Extreme Fear",
            Mood::Fear => "Fear",
            Mood::Neutral => "Neutral",
            Mood::Greed => "Greed",
            Mood::ExtremeGreed => "Extreme Greed",
        }
    }

    /// Case-insensitive lookup of a display label.
    pub fn parse(label: &str) -> Option<Self> {
        Mood::BY_SPECIFICITY
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formatted message text, ready for a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage(String);

impl RenderedMessage {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Acknowledgement returned by the messaging platform on success.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReceipt {
    /// Identifier of the posted message, when the platform reports one.
    pub message_id: Option<i64>,
    /// The full acknowledgement body.
    pub payload: serde_json::Value,
}
