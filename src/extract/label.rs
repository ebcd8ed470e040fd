//! Label matchers, tried in order against the page's visible text.
//!
//! Phrase matchers capture whatever word the page uses; only the last
//! matcher is limited to the five canonical zone names. Captures are
//! title-cased before they are returned.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Mood;
use crate::utils::title_case;

/// A named label matcher.
pub struct LabelMatcher {
    pub name: &'static str,
    pub find: fn(&str) -> Option<String>,
}

/// The label cascade, highest precedence first.
pub const LABEL_MATCHERS: &[LabelMatcher] = &[
    LabelMatcher {
        name: "zone_phrase",
        find: zone_phrase,
    },
    LabelMatcher {
        name: "market_is_in",
        find: market_is_in,
    },
    LabelMatcher {
        name: "sentiment_colon",
        find: sentiment_colon,
    },
    LabelMatcher {
        name: "canonical_label",
        find: canonical_label,
    },
];

// "MMI is in the greed zone", "Market is in the extreme fear zone"
static ZONE_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bis\s+in\s+(?:the\s+)?(extreme\s+[a-z]+|[a-z]+)\s+zone\b").unwrap()
});

static MARKET_IS_IN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bMarket\s+is\s+in\s+(?:the\s+)?(extreme\s+[a-z]+|[a-z]+)\b").unwrap()
});

static SENTIMENT_COLON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bSentiment\s*:\s*(extreme\s+[a-z]+|[a-z]+)\b").unwrap()
});

// Same order as Mood::BY_SPECIFICITY.
static CANONICAL: Lazy<Vec<(Mood, Regex)>> = Lazy::new(|| {
    Mood::BY_SPECIFICITY
        .into_iter()
        .map(|mood| {
            let pattern = format!(r"\b{}\b", mood.as_str().replace(' ', r"\s+"));
            (mood, Regex::new(&pattern).unwrap())
        })
        .collect()
});

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| title_case(m.as_str()))
}

fn zone_phrase(text: &str) -> Option<String> {
    capture(&ZONE_PHRASE, text)
}

fn market_is_in(text: &str) -> Option<String> {
    capture(&MARKET_IS_IN, text)
}

fn sentiment_colon(text: &str) -> Option<String> {
    capture(&SENTIMENT_COLON, text)
}

fn canonical_label(text: &str) -> Option<String> {
    CANONICAL
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(mood, _)| mood.as_str().to_string())
}

/// Run the cascade. Returns the winning matcher's name alongside the label.
pub fn find_label(text: &str) -> Option<(&'static str, String)> {
    LABEL_MATCHERS
        .iter()
        .find_map(|m| (m.find)(text).map(|label| (m.name, label)))
}
