use thiserror::Error;

/// Problems loading or validating process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Batch-level failures talking to a filing source. Fatal for the run.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl RetrievalError {
    pub fn http(url: &str, source: reqwest::Error) -> Self {
        RetrievalError::Http {
            url: url.to_string(),
            source,
        }
    }

    /// True when the source answered but had nothing for the key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RetrievalError::Status { status: 404, .. })
    }
}

/// Per-record extraction failures. Recorded on the record, never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("document unavailable: {0}")]
    DocumentUnavailable(String),

    #[error("section not found: {0}")]
    SectionNotFound(&'static str),

    #[error("company metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("malformed {field}: {reason}")]
    Malformed { field: &'static str, reason: String },
}

/// Failures writing charts and tables.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("chart serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Umbrella error for library callers driving a whole pipeline.
#[derive(Debug, Error)]
pub enum FilingError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
