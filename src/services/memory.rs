use super::{CompanyMetadataSource, DocumentSource, RecordFetcher};
use crate::error::RetrievalError;
use crate::models::{normalize_cik, CompanyMetadata, FilingQuery, FilingRecord};
use async_trait::async_trait;
use std::collections::HashMap;

/// A filing source backed by maps, for offline runs and tests.
///
/// Unknown document URLs answer with a 404 status, unknown CIKs with `None`.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<FilingRecord>,
    documents: HashMap<String, String>,
    companies: HashMap<String, CompanyMetadata>,
    pub requests: Vec<String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: FilingRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn with_document(mut self, url: &str, text: &str) -> Self {
        self.documents.insert(url.to_string(), text.to_string());
        self
    }

    pub fn with_company(mut self, cik: &str, metadata: CompanyMetadata) -> Self {
        self.companies.insert(normalize_cik(cik), metadata);
        self
    }
}

#[async_trait]
impl RecordFetcher for InMemorySource {
    async fn fetch_records(
        &mut self,
        query: &FilingQuery,
    ) -> Result<Vec<FilingRecord>, RetrievalError> {
        let matching: Vec<FilingRecord> = self
            .records
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();
        let mut records = super::dedupe_records(matching);
        if let Some(max) = query.max_records {
            records.truncate(max);
        }
        Ok(records)
    }
}

#[async_trait]
impl DocumentSource for InMemorySource {
    async fn fetch_document(&mut self, url: &str) -> Result<String, RetrievalError> {
        self.requests.push(url.to_string());
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| RetrievalError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

#[async_trait]
impl CompanyMetadataSource for InMemorySource {
    async fn company_metadata(
        &mut self,
        cik: &str,
    ) -> Result<Option<CompanyMetadata>, RetrievalError> {
        Ok(self.companies.get(&normalize_cik(cik)).cloned())
    }
}
