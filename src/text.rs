use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[^>]+(>|$)").expect("valid html tag pattern"));

/// Keeps the first `limit` space-separated words, appending "..." when cut
pub fn limit_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split(' ').collect();
    if words.len() > limit {
        format!("{}...", words[..limit].join(" "))
    } else {
        text.to_string()
    }
}

/// Truncates to at most `max` characters, respecting char boundaries
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

pub fn strip_html_tags(text: &str) -> String {
    HTML_TAG_RE.replace_all(text, "").into_owned()
}
