//! Small string helpers shared by the extractor, formatter and logging.
//!
//! - Whitespace collapsing for text pulled out of HTML
//! - Title casing for captured sentiment words
//! - Truncation for logging page bodies and API responses

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Capitalize the first character of a string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(upcase("hello"), "Hello");
/// assert_eq!(upcase(""), "");
/// ```
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Title-case a captured phrase: `"extreme GREED"` becomes `"Extreme Greed"`.
///
/// Inner whitespace is collapsed to single spaces.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| upcase(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary) with
/// an ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte_boundary() {
        // "é" is two bytes; cutting at 1 must back off to 0
        let result = truncate_for_log("éé", 1);
        assert_eq!(result, "…(+4 bytes)");
    }

    #[test]
    fn test_normalize_ws() {
        assert_eq!(normalize_ws("  MMI \n\t is   52.9 "), "MMI is 52.9");
        assert_eq!(normalize_ws(""), "");
    }

    #[test]
    fn test_upcase() {
        assert_eq!(upcase("hello"), "Hello");
        assert_eq!(upcase(""), "");
        assert_eq!(upcase("a"), "A");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("greed"), "Greed");
        assert_eq!(title_case("extreme   FEAR"), "Extreme Fear");
        assert_eq!(title_case("NEUTRAL"), "Neutral");
    }
}
