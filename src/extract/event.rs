//! 8-K header fields: item topics, filed-as-of date and term counts.

use regex::Regex;
use std::sync::LazyLock;

static ITEM_INFORMATION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ITEM INFORMATION:[ \t]*(.+)").expect("valid regex"));
static ITEM_INFORMATION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ITEM INFORMATION:").expect("valid regex"));
static FILED_AS_OF_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFILED AS OF DATE:").expect("valid regex"));
static FILED_AS_OF_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFILED AS OF DATE:\s*(\d{8})\b").expect("valid regex"));
static BANKRUPTCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:bankruptcy|bankruptcies)\b").expect("valid regex"));
static DELISTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdelisting\b").expect("valid regex"));

pub const UNKNOWN_TOPIC: &str = "Unknown";

/// The first `ITEM INFORMATION:` line, or `Unknown`.
pub fn first_topic(text: &str) -> String {
    ITEM_INFORMATION_LINE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|topic| !topic.is_empty())
        .unwrap_or_else(|| UNKNOWN_TOPIC.to_string())
}

/// Every topic line from the first `ITEM INFORMATION:` up to `FILED AS OF DATE:`
/// (or the end of the text).
pub fn all_topics(text: &str) -> Vec<String> {
    let Some(header) = ITEM_INFORMATION_HEADER.find(text) else {
        return Vec::new();
    };
    let rest = &text[header.end()..];
    let block = match FILED_AS_OF_HEADER.find(rest) {
        Some(end) => &rest[..end.start()],
        None => rest,
    };

    block
        .lines()
        .map(|line| {
            let line = line.trim();
            // Later topics repeat the header on their own line
            ITEM_INFORMATION_HEADER
                .find(line)
                .filter(|m| m.start() == 0)
                .map(|m| line[m.end()..].trim())
                .unwrap_or(line)
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// The 8-digit `FILED AS OF DATE:` value.
pub fn filed_as_of(text: &str) -> Option<String> {
    FILED_AS_OF_DATE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whole-word occurrences of "bankruptcy" or "bankruptcies".
pub fn count_bankruptcy_terms(text: &str) -> usize {
    BANKRUPTCY.find_iter(text).count()
}

pub fn mentions_delisting(topic: &str) -> bool {
    DELISTING.is_match(topic)
}
