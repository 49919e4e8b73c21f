use super::{dedupe_records, RecordFetcher};
use crate::config::AppConfig;
use crate::error::{FilingError, RetrievalError};
use crate::models::{FilingQuery, FilingRecord, FormType};
use crate::utils::{log_fetch, parse_filing_date, Logger};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use tokio::time::sleep;

const DEFAULT_PAGE_SIZE: usize = 200;
const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
pub struct QueryApiResponse {
    #[serde(default)]
    pub filings: Vec<QueryApiFiling>,
}

/// A filing as the query API returns it. Everything is optional until
/// validated by [`QueryApiFiling::into_record`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryApiFiling {
    pub accession_no: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub cik: Option<String>,
    pub company_name: Option<String>,
    pub form_type: Option<String>,
    pub filed_at: Option<String>,
    pub link_to_txt: Option<String>,
    pub link_to_filing_details: Option<String>,
    pub link_to_html: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl QueryApiFiling {
    /// Validate into a typed record. Returns `None` when an identifying
    /// field is missing.
    pub fn into_record(self) -> Option<FilingRecord> {
        let accession_number = self.accession_no.filter(|s| !s.is_empty())?;
        let cik = self.cik.filter(|s| !s.is_empty())?;
        let filed_at = self.filed_at.as_deref().and_then(parse_filing_date)?;
        // The full submission text carries the <DOCUMENT>/<TYPE> structure
        let document_url = self
            .link_to_txt
            .or(self.link_to_filing_details)
            .or(self.link_to_html)
            .filter(|s| !s.is_empty())?;

        Some(FilingRecord {
            accession_number,
            cik,
            company_name: self.company_name.unwrap_or_default(),
            filed_at,
            form_type: FormType::from_code(self.form_type.as_deref().unwrap_or_default()),
            document_url,
        })
    }
}

/// Client for the sec-api.io query endpoint.
pub struct QueryApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    page_size: usize,
    page_delay: Duration,
    logger: Logger,
}

impl QueryApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, FilingError> {
        let api_key = config.require_api_key()?.to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(RetrievalError::Client)?;

        Ok(Self {
            client,
            endpoint: config.query_api_url.clone(),
            api_key,
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: DEFAULT_PAGE_DELAY,
            logger: Logger::new("QUERY_API"),
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    /// Fetch a single page starting at `from`.
    pub async fn fetch_page(
        &self,
        query: &FilingQuery,
        from: usize,
    ) -> Result<Vec<QueryApiFiling>, RetrievalError> {
        let body = query.to_request(from, self.page_size);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("token", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::http(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let page: QueryApiResponse =
            response
                .json()
                .await
                .map_err(|e| RetrievalError::InvalidResponse {
                    url: self.endpoint.clone(),
                    reason: e.to_string(),
                })?;

        Ok(page.filings)
    }
}

/// Keep a uniform random subset of `count` records, in their original order.
pub fn sample_records(records: Vec<FilingRecord>, count: usize) -> Vec<FilingRecord> {
    if records.len() <= count {
        return records;
    }
    let mut picked = rand::seq::index::sample(&mut rand::rng(), records.len(), count).into_vec();
    picked.sort_unstable();

    let mut picked = picked.into_iter().peekable();
    records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            if picked.peek() == Some(&idx) {
                picked.next();
                Some(record)
            } else {
                None
            }
        })
        .collect()
}

#[async_trait]
impl RecordFetcher for QueryApiClient {
    async fn fetch_records(
        &mut self,
        query: &FilingQuery,
    ) -> Result<Vec<FilingRecord>, RetrievalError> {
        let target = query.max_records.unwrap_or(usize::MAX);
        let mut raw = Vec::new();
        let mut from = 0;

        while raw.len() < target {
            log_fetch(&format!("Fetching filings starting at {} ...", from));
            let page = self.fetch_page(query, from).await?;
            let page_len = page.len();
            raw.extend(page);

            if page_len < self.page_size {
                break;
            }
            from += self.page_size;
            if raw.len() < target {
                sleep(self.page_delay).await;
            }
        }

        let total = raw.len();
        let records: Vec<FilingRecord> = raw
            .into_iter()
            .filter_map(|filing| {
                let accession = filing.accession_no.clone();
                let record = filing.into_record();
                if record.is_none() {
                    self.logger.warn(&format!(
                        "Skipping filing with missing fields (accession {:?})",
                        accession
                    ));
                }
                record
            })
            .collect();

        let records = dedupe_records(records);
        let collected = records.len();
        let records = sample_records(records, target);
        if records.len() < collected {
            self.logger
                .info(&format!("Sampled {} of {} filings", records.len(), collected));
        }
        log_fetch(&format!(
            "Total filings collected: {} (kept {})",
            total,
            records.len()
        ));
        Ok(records)
    }
}
