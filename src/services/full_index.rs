//! EDGAR quarterly full index (`master.idx`) as a record source.

use super::{dedupe_records, EdgarClient, RecordFetcher};
use crate::error::RetrievalError;
use crate::models::{FilingQuery, FilingRecord, FormType};
use crate::utils::{log_fetch, parse_filing_date};
use async_trait::async_trait;

/// One row of `master.idx`: `CIK|Company Name|Form Type|Date Filed|Filename`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub cik: String,
    pub company_name: String,
    pub form_type: String,
    pub date_filed: String,
    pub file_name: String,
}

impl IndexEntry {
    /// `edgar/data/1411579/0001411579-21-000010.txt` → `0001411579-21-000010`
    pub fn accession_number(&self) -> Option<&str> {
        let name = self.file_name.rsplit('/').next()?;
        let accession = name.strip_suffix(".txt").unwrap_or(name);
        if accession.is_empty() { None } else { Some(accession) }
    }

    pub fn into_record(self, archive_root: &str) -> Option<FilingRecord> {
        let accession_number = self.accession_number()?.to_string();
        let filed_at = parse_filing_date(&self.date_filed)?;
        Some(FilingRecord {
            accession_number,
            cik: self.cik,
            company_name: self.company_name,
            filed_at,
            form_type: FormType::from_code(&self.form_type),
            document_url: format!("{}{}", archive_root, self.file_name.trim_start_matches('/')),
        })
    }
}

/// Parse the body of a `master.idx` file.
///
/// The preamble ends with a line of dashes; rows before it are ignored. Rows
/// that do not have five fields or a numeric CIK are skipped.
pub fn parse_master_index(text: &str) -> Vec<IndexEntry> {
    let lines: Vec<&str> = text.lines().collect();
    let body_start = lines
        .iter()
        .position(|line| line.starts_with("---"))
        .map(|idx| idx + 1)
        .unwrap_or(0);

    lines[body_start..]
        .iter()
        .filter_map(|line| {
            let fields: Vec<&str> = line.trim().split('|').collect();
            if fields.len() != 5 {
                return None;
            }
            let cik = fields[0].trim();
            if cik.is_empty() || !cik.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Some(IndexEntry {
                cik: cik.to_string(),
                company_name: fields[1].trim().to_string(),
                form_type: fields[2].trim().to_string(),
                date_filed: fields[3].trim().to_string(),
                file_name: fields[4].trim().to_string(),
            })
        })
        .collect()
}

/// Index files are Latin-1; map each byte straight to its code point.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

impl EdgarClient {
    /// Download and parse one quarterly master index.
    pub async fn master_index(
        &mut self,
        year: i32,
        quarter: u32,
    ) -> Result<Vec<IndexEntry>, RetrievalError> {
        let url = self.master_index_url(year, quarter);
        log_fetch(&format!("Downloading master index {} Q{}", year, quarter));
        let bytes = self.get_bytes(&url).await?;
        let entries = parse_master_index(&decode_latin1(&bytes));
        if entries.is_empty() {
            return Err(RetrievalError::InvalidResponse {
                url,
                reason: "index contained no filing rows".to_string(),
            });
        }
        Ok(entries)
    }

    /// Every index row for the query's quarters, unfiltered.
    pub async fn index_entries(
        &mut self,
        query: &FilingQuery,
    ) -> Result<Vec<IndexEntry>, RetrievalError> {
        let mut entries = Vec::new();
        for (year, quarter) in query.quarters() {
            entries.extend(self.master_index(year, quarter).await?);
        }
        Ok(entries)
    }

    /// Every filing of the query's filers in its date range, whatever the form.
    pub async fn filer_records(
        &mut self,
        query: &FilingQuery,
    ) -> Result<Vec<FilingRecord>, RetrievalError> {
        let archive_root = self.archive_url("");
        let records = self
            .index_entries(query)
            .await?
            .into_iter()
            .filter_map(|entry| entry.into_record(&archive_root))
            .filter(|record| query.matches_filer(record))
            .collect();
        Ok(dedupe_records(records))
    }
}

#[async_trait]
impl RecordFetcher for EdgarClient {
    async fn fetch_records(
        &mut self,
        query: &FilingQuery,
    ) -> Result<Vec<FilingRecord>, RetrievalError> {
        let archive_root = self.archive_url("");
        let entries = self.index_entries(query).await?;
        let scanned = entries.len();

        let mut records: Vec<FilingRecord> = entries
            .into_iter()
            .filter_map(|entry| entry.into_record(&archive_root))
            .filter(|record| query.matches(record))
            .collect();
        records.sort_by(|a, b| a.filed_at.cmp(&b.filed_at));

        let mut records = dedupe_records(records);
        if let Some(max) = query.max_records {
            records.truncate(max);
        }

        log_fetch(&format!(
            "Full index: {} of {} rows matched {} filings",
            records.len(),
            scanned,
            query.form_type
        ));
        Ok(records)
    }
}
