//! Per-document extraction. Nothing here touches the network.

pub mod business;
pub mod document;
pub mod event;
pub mod form4;

pub use business::*;
pub use document::*;
pub use event::*;
pub use form4::*;

use crate::models::InsiderFiling;

/// Finds a named section in a document's plain text.
pub trait TextSectionExtractor {
    fn section_name(&self) -> &'static str;

    /// The section as a slice of `text`, or `None` when it cannot be located.
    fn extract_section<'a>(&self, text: &'a str) -> Option<&'a str>;
}

/// Reads structured transaction line items out of a filing.
pub trait TransactionFieldExtractor {
    /// Never fails as a whole: malformed items are reported in `issues`.
    fn extract_transactions(&self, accession_number: &str, document: &str) -> InsiderFiling;
}
