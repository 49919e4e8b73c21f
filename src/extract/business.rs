//! "Item 1. Business" extraction and the artificial-intelligence signal.

use super::TextSectionExtractor;
use regex::Regex;
use std::sync::LazyLock;

pub const AI_TERM: &str = "artificial intelligence";

static BUSINESS_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bitem\s+1\s*\.?\s*business\b").expect("valid regex"));
// An item number followed by one of the standard 10-K item titles, so
// running-text references such as "see Item 1A of this report" do not match.
static NEXT_ITEM_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bitem\s+(?:1[a-c]|[2-9][a-c]?|1[0-6])\s*[.:\-]?\s*\[?(?:risk\s+factors|unresolved|cybersecurity|properties|legal\s+proceedings|mine\s+safety|submission\s+of|market\s+for|selected|reserved|management|quantitative|financial\s+statements|changes\s+in|controls|other\s+information|disclosure|directors|executive|security\s+ownership|certain\s+relationships|principal\s+account|exhibits)",
    )
    .expect("valid regex")
});
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// Locates the business description of an annual report.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessSectionExtractor;

impl TextSectionExtractor for BusinessSectionExtractor {
    fn section_name(&self) -> &'static str {
        "Item 1. Business"
    }

    /// From an `Item 1. Business` heading up to the next titled `Item` heading.
    ///
    /// Tables of contents repeat the heading pair with nothing in between,
    /// so the longest candidate wins. Without a closing heading there is
    /// no section.
    fn extract_section<'a>(&self, text: &'a str) -> Option<&'a str> {
        BUSINESS_HEADING
            .find_iter(text)
            .filter_map(|heading| {
                NEXT_ITEM_HEADING
                    .find_at(text, heading.end())
                    .map(|next| &text[heading.start()..next.start()])
            })
            .max_by_key(|section| section.len())
    }
}

/// Case-insensitive substring check.
pub fn contains_term(text: &str, term: &str) -> bool {
    text.to_lowercase().contains(&term.to_lowercase())
}

pub fn mentions_ai(section: &str) -> bool {
    contains_term(section, AI_TERM)
}

/// Sentences (split after `.`, `!` or `?` plus whitespace) that contain `term`.
pub fn sentences_with_term(text: &str, term: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for brk in SENTENCE_BREAK.find_iter(text) {
        // keep the punctuation with its sentence
        sentences.push(&text[start..brk.start() + 1]);
        start = brk.end();
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty() && contains_term(s, term))
        .map(str::to_string)
        .collect()
}
