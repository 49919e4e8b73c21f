//! Filing sources: the query API, EDGAR archives and in-memory stand-ins.

pub mod edgar;
pub mod full_index;
pub mod memory;
pub mod query_api;

pub use edgar::*;
pub use full_index::*;
pub use memory::*;
pub use query_api::*;

use crate::error::RetrievalError;
use crate::models::{CompanyMetadata, FilingQuery, FilingRecord};
use async_trait::async_trait;
use std::collections::HashSet;

/// Turns a query into filing metadata records.
#[async_trait]
pub trait RecordFetcher: Send {
    async fn fetch_records(
        &mut self,
        query: &FilingQuery,
    ) -> Result<Vec<FilingRecord>, RetrievalError>;
}

/// Retrieves the raw text of a filing document.
#[async_trait]
pub trait DocumentSource: Send {
    async fn fetch_document(&mut self, url: &str) -> Result<String, RetrievalError>;
}

/// Looks up header details for a filer. `Ok(None)` when the filer is unknown.
#[async_trait]
pub trait CompanyMetadataSource: Send {
    async fn company_metadata(
        &mut self,
        cik: &str,
    ) -> Result<Option<CompanyMetadata>, RetrievalError>;
}

/// Drop repeated accession numbers, keeping the first occurrence and input order.
pub fn dedupe_records(records: Vec<FilingRecord>) -> Vec<FilingRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.accession_number.clone());
            if !fresh {
                tracing::debug!(accession = %record.accession_number, "Dropping duplicate filing");
            }
            fresh
        })
        .collect()
}
