//! # edgar-signals - signals mined from SEC EDGAR filings
//!
//! Two batch analyses over public filings, plus an 8-K topic survey:
//! - 10-K business sections checked for "artificial intelligence", charted by state
//! - Form 4 officer sells grouped by officer and date
//! - 8-K item topics, delisting notices and bankruptcy language
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgar_signals::prelude::*;
//! use edgar_signals::pipeline::annual_report;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let query = FilingQuery::new(
//!         FormType::AnnualReport,
//!         chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
//!         chrono::NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
//!     )
//!     .with_max_records(10);
//!
//!     let records = QueryApiClient::new(&config)?.fetch_records(&query).await?;
//!     let mut edgar = EdgarClient::new(&config)?;
//!     let filings = annual_report::enrich_filings(records, &mut edgar).await;
//!     annual_report::present(&filings, &config.output_dir)?;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Retrieval and per-document extraction
pub mod extract;
pub mod services;

// Aggregation, output and the runs tying it together
pub mod analysis;
pub mod pipeline;
pub mod render;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use edgar_signals::prelude::*;
    //! ```

    pub use crate::config::AppConfig;
    pub use crate::error::{ExtractionError, FilingError, RetrievalError};
    pub use crate::models::{
        CurrentReportSummary, EnrichedFiling, FilingQuery, FilingRecord, FormType, InsiderFiling,
        InsiderTransaction,
    };
    pub use crate::services::{
        CompanyMetadataSource, DocumentSource, EdgarClient, InMemorySource, QueryApiClient,
        RecordFetcher,
    };
}

pub use utils::{init_logger, Logger, Timer};
