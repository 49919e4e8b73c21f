use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Form families the pipelines know how to handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormType {
    /// 10-K and its historical variants
    AnnualReport,
    /// 8-K
    CurrentReport,
    /// Form 4
    InsiderOwnership,
    Other(String),
}

impl FormType {
    /// Every form code EDGAR has used for the annual report.
    pub const ANNUAL_REPORT_CODES: [&'static str; 6] =
        ["10-K", "10-KT", "10KSB", "10KT405", "10KSB40", "10-K405"];

    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        if Self::ANNUAL_REPORT_CODES
            .iter()
            .any(|c| c.eq_ignore_ascii_case(code))
        {
            return FormType::AnnualReport;
        }
        match code {
            "8-K" => FormType::CurrentReport,
            "4" => FormType::InsiderOwnership,
            other => FormType::Other(other.to_string()),
        }
    }

    /// Primary form code, as written in `<TYPE>` headers and index files.
    pub fn code(&self) -> &str {
        match self {
            FormType::AnnualReport => "10-K",
            FormType::CurrentReport => "8-K",
            FormType::InsiderOwnership => "4",
            FormType::Other(code) => code,
        }
    }

    /// Form codes a query for this family has to match.
    pub fn query_codes(&self) -> Vec<&str> {
        match self {
            FormType::AnnualReport => Self::ANNUAL_REPORT_CODES.to_vec(),
            other => vec![other.code()],
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Filing metadata as returned by a record fetcher. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingRecord {
    pub accession_number: String,
    pub cik: String,
    pub company_name: String,
    pub filed_at: NaiveDate,
    pub form_type: FormType,
    pub document_url: String,
}

/// A 10-K record after metadata lookup and business-section analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedFiling {
    pub record: FilingRecord,
    pub company_name: String,
    pub state: Option<String>,
    pub sic: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub business_section: Option<String>,
    pub mentions_ai: bool,
    pub ai_sentences: Vec<String>,
    #[serde(skip)]
    pub issues: Vec<crate::error::ExtractionError>,
}

impl EnrichedFiling {
    pub fn accession_number(&self) -> &str {
        &self.record.accession_number
    }

    /// Whether every extraction step produced a value.
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_type_codes() {
        assert_eq!(FormType::from_code("10-K405"), FormType::AnnualReport);
        assert_eq!(FormType::from_code("10ksb"), FormType::AnnualReport);
        assert_eq!(FormType::from_code("4"), FormType::InsiderOwnership);
        assert_eq!(FormType::from_code(" 8-K "), FormType::CurrentReport);
        assert_eq!(
            FormType::from_code("4/A"),
            FormType::Other("4/A".to_string())
        );
        assert_eq!(FormType::AnnualReport.query_codes().len(), 6);
        assert_eq!(FormType::InsiderOwnership.query_codes(), vec!["4"]);
    }
}
