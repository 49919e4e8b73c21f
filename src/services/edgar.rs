use super::{CompanyMetadataSource, DocumentSource};
use crate::config::AppConfig;
use crate::error::{FilingError, RetrievalError};
use crate::models::{padded_cik, CompanyMetadata, SubmissionHeader};
use crate::utils::Logger;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Client for the public EDGAR endpoints: archives, full index and submissions.
///
/// Every request carries the configured `User-Agent` and requests are spaced
/// at least `request_interval` apart.
pub struct EdgarClient {
    client: Client,
    archives_url: String,
    submissions_url: String,
    request_interval: Duration,
    last_request: Option<Instant>,
    logger: Logger,
}

impl EdgarClient {
    pub fn new(config: &AppConfig) -> Result<Self, FilingError> {
        let user_agent = config.require_user_agent()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|_| crate::error::ConfigError::Invalid {
                key: "SEC_USER_AGENT",
                value: user_agent.to_string(),
            })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(RetrievalError::Client)?;

        Ok(Self {
            client,
            archives_url: config.archives_url.clone(),
            submissions_url: config.submissions_url.clone(),
            request_interval: config.request_interval,
            last_request: None,
            logger: Logger::new("EDGAR"),
        })
    }

    /// Absolute URL of a path below the archives root (`edgar/data/...`).
    pub fn archive_url(&self, path: &str) -> String {
        format!("{}{}", self.archives_url, path.trim_start_matches('/'))
    }

    /// URL of the quarterly master index file.
    pub fn master_index_url(&self, year: i32, quarter: u32) -> String {
        self.archive_url(&format!("edgar/full-index/{}/QTR{}/master.idx", year, quarter))
    }

    async fn enforce_rate_limit(&mut self) {
        if let Some(last) = self.last_request {
            let since = last.elapsed();
            if since < self.request_interval {
                sleep(self.request_interval - since).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    pub(crate) async fn get_bytes(&mut self, url: &str) -> Result<Vec<u8>, RetrievalError> {
        self.enforce_rate_limit().await;
        self.logger.debug(&format!("GET {}", url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RetrievalError::http(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RetrievalError::http(url, e))?;
        Ok(body.to_vec())
    }

    /// Fetch a text resource. Invalid UTF-8 is replaced rather than rejected.
    pub async fn get_text(&mut self, url: &str) -> Result<String, RetrievalError> {
        let bytes = self.get_bytes(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Header details from the submissions API; `None` for unknown filers.
    pub async fn submission(&mut self, cik: &str) -> Result<Option<CompanyMetadata>, RetrievalError> {
        let url = format!("{}CIK{}.json", self.submissions_url, padded_cik(cik));

        let bytes = match self.get_bytes(&url).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => {
                self.logger.warn(&format!("No submission data for CIK {}", cik));
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let header: SubmissionHeader =
            serde_json::from_slice(&bytes).map_err(|e| RetrievalError::InvalidResponse {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Some(CompanyMetadata::from(header)))
    }
}

#[async_trait]
impl DocumentSource for EdgarClient {
    async fn fetch_document(&mut self, url: &str) -> Result<String, RetrievalError> {
        self.get_text(url).await
    }
}

#[async_trait]
impl CompanyMetadataSource for EdgarClient {
    async fn company_metadata(
        &mut self,
        cik: &str,
    ) -> Result<Option<CompanyMetadata>, RetrievalError> {
        self.submission(cik).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn config() -> AppConfig {
        AppConfig {
            user_agent: Some("Test Runner test@example.com".to_string()),
            request_interval: Duration::ZERO,
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_client_requires_user_agent() {
        let err = EdgarClient::new(&AppConfig::default()).err().unwrap();
        assert!(matches!(
            err,
            FilingError::Config(ConfigError::Missing("SEC_USER_AGENT"))
        ));
    }

    #[test]
    fn test_archive_urls() {
        let client = EdgarClient::new(&config()).unwrap();
        assert_eq!(
            client.master_index_url(2021, 3),
            "https://www.sec.gov/Archives/edgar/full-index/2021/QTR3/master.idx"
        );
        assert_eq!(
            client.archive_url("/edgar/data/1411579/0001411579-21-000001.txt"),
            "https://www.sec.gov/Archives/edgar/data/1411579/0001411579-21-000001.txt"
        );
    }
}
