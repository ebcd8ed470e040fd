//! Score matchers, tried in order against the page's visible text.
//!
//! Order is significant: the first matcher that yields a value wins, and
//! later matchers are never consulted. Within one matcher, occurrences are
//! scanned left to right. An occurrence is skipped when its value is outside
//! `0..=100` or when it is only part of a larger number (`24,350.10`).
//!
//! Skipping means a matcher can come up empty even though its pattern is on
//! the page. When every hit of a higher-precedence matcher is skipped, the
//! page falls through to the next matcher in the cascade.

use once_cell::sync::Lazy;
use regex::Regex;

/// A named score matcher.
pub struct ScoreMatcher {
    pub name: &'static str,
    pub find: fn(&str) -> Option<f64>,
}

/// The score cascade, highest precedence first.
pub const SCORE_MATCHERS: &[ScoreMatcher] = &[
    ScoreMatcher {
        name: "changed_from",
        find: changed_from,
    },
    ScoreMatcher {
        name: "trailing_phrase",
        find: trailing_phrase,
    },
    ScoreMatcher {
        name: "keyword_then_value",
        find: keyword_then_value,
    },
    ScoreMatcher {
        name: "value_then_keyword",
        find: value_then_keyword,
    },
];

// "MMI changed from 50.00 52.92" / "Market Mood Index changed from 50.00 to 52.92"
static CHANGED_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:MMI|Market\s+Mood\s+Index)\s+changed\s+from\s+(\d+(?:\.\d+)?)\b\s*(?:to\s+)?\b(\d+(?:\.\d+)?)\b",
    )
    .unwrap()
});

static TRAILING_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*NIFTY\s+returned").unwrap());

static KEYWORD_THEN_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Market\s+Mood\s+Index|MMI|Index)\s*[:\s]\s*(\d+(?:\.\d+)?)\b").unwrap()
});

static VALUE_THEN_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*[:\s]\s*(?:Market\s+Mood\s+Index|MMI)\b").unwrap()
});

fn in_range(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| (0.0..=100.0).contains(v))
}

// A digit, or a `,`/`.` followed by a digit, means the number keeps going.
fn continues_number(mut chars: impl Iterator<Item = char>) -> bool {
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some(',' | '.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// `false` when `m` is a digit group cut out of a longer number.
fn is_whole_number(text: &str, m: &regex::Match<'_>) -> bool {
    !continues_number(text[..m.start()].chars().rev()) && !continues_number(text[m.end()..].chars())
}

fn first_capture(re: &Regex, text: &str, group: usize) -> Option<f64> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(group))
        .filter(|m| is_whole_number(text, m))
        .find_map(|m| in_range(m.as_str()))
}

fn changed_from(text: &str) -> Option<f64> {
    first_capture(&CHANGED_FROM, text, 2)
}

fn trailing_phrase(text: &str) -> Option<f64> {
    first_capture(&TRAILING_PHRASE, text, 1)
}

fn keyword_then_value(text: &str) -> Option<f64> {
    first_capture(&KEYWORD_THEN_VALUE, text, 1)
}

fn value_then_keyword(text: &str) -> Option<f64> {
    first_capture(&VALUE_THEN_KEYWORD, text, 1)
}

/// Run the cascade. Returns the winning matcher's name alongside the value.
pub fn find_score(text: &str) -> Option<(&'static str, f64)> {
    SCORE_MATCHERS
        .iter()
        .find_map(|m| (m.find)(text).map(|score| (m.name, score)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcher_order() {
        let names: Vec<_> = SCORE_MATCHERS.iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            ["changed_from", "trailing_phrase", "keyword_then_value", "value_then_keyword"]
        );
    }

    #[test]
    fn test_changed_from_takes_second_value() {
        assert_eq!(
            find_score("Today MMI changed from 50.00 52.92 since yesterday"),
            Some(("changed_from", 52.92))
        );
        assert_eq!(
            find_score("Market Mood Index changed from 41.2 to 38.75"),
            Some(("changed_from", 38.75))
        );
    }

    #[test]
    fn test_changed_from_beats_keyword() {
        // keyword pattern appears first in the text but has lower precedence
        let text = "MMI: 12.5 ... MMI changed from 50.00 52.92";
        assert_eq!(find_score(text), Some(("changed_from", 52.92)));
    }

    #[test]
    fn test_trailing_phrase() {
        assert_eq!(
            find_score("Current reading 63.4 NIFTY returned 1.2% this week"),
            Some(("trailing_phrase", 63.4))
        );
    }

    #[test]
    fn test_keyword_then_value() {
        assert_eq!(
            find_score("Market Mood Index: 47.10 as of close"),
            Some(("keyword_then_value", 47.10))
        );
        assert_eq!(find_score("mmi 33"), Some(("keyword_then_value", 33.0)));
    }

    #[test]
    fn test_value_then_keyword() {
        assert_eq!(
            find_score("today's reading is 71.25 MMI"),
            Some(("value_then_keyword", 71.25))
        );
    }

    #[test]
    fn test_out_of_range_values_skipped_within_matcher() {
        // "Index 500" is not a score; the later in-range occurrence is
        assert_eq!(
            find_score("Index 500 updated. Index: 58.3"),
            Some(("keyword_then_value", 58.3))
        );
    }

    #[test]
    fn test_changed_from_needs_mood_index_prefix() {
        let text = "NIFTY changed from 24350.10 24410.55 today. MMI changed from 50.00 52.92";
        assert_eq!(find_score(text), Some(("changed_from", 52.92)));
        assert_eq!(changed_from("The index changed from 41.2 to 38.75"), None);
    }

    #[test]
    fn test_digit_groups_of_larger_numbers_skipped() {
        let text = "Nifty 50 Index 24,350.10 closed higher. MMI: 52.92";
        assert_eq!(find_score(text), Some(("keyword_then_value", 52.92)));
        assert_eq!(find_score("Sensex 81,050 MMI"), None);
        assert_eq!(find_score("Index 24350.10 NIFTY returned 0.4%"), None);
    }

    #[test]
    fn test_out_of_range_hits_fall_through_to_next_matcher() {
        // changed_from matches, but neither of its hits is a valid score
        let text = "MMI changed from 250 300 overnight. MMI: 40";
        assert_eq!(changed_from(text), None);
        assert_eq!(find_score(text), Some(("keyword_then_value", 40.0)));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(find_score("Nothing to see here"), None);
        assert_eq!(find_score(""), None);
    }
}
