//! Score and label extraction from unstructured MMI pages.
//!
//! The pages have no stable schema, so extraction works on visible text
//! rather than on selectors:
//!
//! 1. **Strip markup**: keep text nodes outside `script`/`style`/`noscript`/
//!    `template`, collapse whitespace
//! 2. **Score**: run [`score::SCORE_MATCHERS`] in order, first hit wins
//! 3. **Label**: run [`label::LABEL_MATCHERS`] in order, first hit wins
//! 4. **Derive**: a score without a label gets [`Mood::from_score`]; a label
//!    without a score stays without one
//!
//! Matching is best-effort. When a page's wording drifts the affected field
//! is simply absent; nothing here returns an error.

pub mod label;
pub mod score;

use scraper::{Html, Node};
use tracing::{debug, instrument};

use crate::models::{Mood, Reading, SourceKind, SourceResult};
use crate::utils::normalize_ws;

const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Reduce an HTML document to its visible text on a single line.
pub fn strip_markup(page: &str) -> String {
    let document = Html::parse_document(page);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()));
        if !hidden {
            parts.push(text);
        }
    }

    normalize_ws(&parts.join(" "))
}

/// Extract a [`Reading`] from plain text that has already been stripped.
pub fn extract_reading(text: &str) -> Reading {
    let score = score::find_score(text);
    let label = label::find_label(text);

    match (&score, &label) {
        (Some((score_by, value)), Some((label_by, word))) => {
            debug!(score = value, score_by, label = %word, label_by, "Matched score and label")
        }
        (Some((score_by, value)), None) => {
            debug!(score = value, score_by, "Matched score only; deriving label")
        }
        (None, Some((label_by, word))) => debug!(label = %word, label_by, "Matched label only"),
        (None, None) => debug!("No score or label pattern matched"),
    }

    let score = score.map(|(_, value)| value);
    let label = label
        .map(|(_, word)| word)
        .or_else(|| score.map(|value| Mood::from_score(value).as_str().to_string()));

    Reading { score, label }
}

/// Extract a source's result from raw page text (HTML or plain).
#[instrument(level = "info", skip_all, fields(%kind, bytes = page_text.len()))]
pub fn extract(page_text: &str, kind: SourceKind) -> SourceResult {
    let text = strip_markup(page_text);
    SourceResult::extracted(kind, extract_reading(&text))
}
