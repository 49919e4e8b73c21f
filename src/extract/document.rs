//! Turning raw EDGAR submissions into searchable plain text.

use regex::Regex;
use std::sync::LazyLock;

static DOCUMENT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<document>(.*?)</document>").expect("valid regex"));
static TYPE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<type>\s*([^\s<]+)").expect("valid regex"));
static SCRIPT_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>").expect("valid regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#([xX]?)([0-9a-fA-F]+);").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// The `<DOCUMENT>` block of a full submission whose `<TYPE>` is `form_code`.
pub fn find_document<'a>(raw: &'a str, form_code: &str) -> Option<&'a str> {
    DOCUMENT_BLOCK
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|block| {
            TYPE_TAG
                .captures(block)
                .and_then(|caps| caps.get(1))
                .is_some_and(|t| t.as_str().eq_ignore_ascii_case(form_code))
        })
}

/// Plain text of the `form_code` document inside a submission, or of the
/// whole input when no such document block exists.
pub fn document_text(raw: &str, form_code: &str) -> String {
    html_to_text(find_document(raw, form_code).unwrap_or(raw))
}

/// Strip markup, decode entities and collapse whitespace to single spaces.
pub fn html_to_text(html: &str) -> String {
    let without_code = SCRIPT_STYLE.replace_all(html, " ");
    let without_tags = TAG.replace_all(&without_code, " ");
    let decoded = decode_entities(&without_tags);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

pub fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let radix = if caps[1].is_empty() { 10 } else { 16 };
        u32::from_str_radix(&caps[2], radix)
            .ok()
            .and_then(char::from_u32)
            .map(|c| if c == '\u{a0}' { ' ' } else { c })
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
