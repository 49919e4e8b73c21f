use super::FilingRecord;
use chrono::NaiveDate;
use serde::Serialize;

/// What an 8-K says about itself in its SGML header plus a term count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentReportSummary {
    pub record: FilingRecord,
    pub first_topic: String,
    pub topics: Vec<String>,
    pub filed_as_of: Option<NaiveDate>,
    pub bankruptcy_mentions: usize,
    #[serde(skip)]
    pub issues: Vec<crate::error::ExtractionError>,
}

impl CurrentReportSummary {
    pub fn first_topic_mentions_delisting(&self) -> bool {
        crate::extract::mentions_delisting(&self.first_topic)
    }

    pub fn any_topic_mentions_delisting(&self) -> bool {
        self.topics
            .iter()
            .any(|topic| crate::extract::mentions_delisting(topic))
    }
}
