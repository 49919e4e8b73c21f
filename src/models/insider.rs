use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `transactionAcquiredDisposedCode` of a Form 4 line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionCode {
    Acquired,
    Disposed,
    Other(String),
}

impl TransactionCode {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "A" => TransactionCode::Acquired,
            "D" => TransactionCode::Disposed,
            other => TransactionCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionCode::Acquired => "A",
            TransactionCode::Disposed => "D",
            TransactionCode::Other(code) => code,
        }
    }
}

impl fmt::Display for TransactionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting owner block of a Form 4.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportingOwner {
    pub name: String,
    pub title: String,
    pub is_officer: bool,
}

/// One transaction line item from a Form 4.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsiderTransaction {
    pub accession_number: String,
    pub officer_name: String,
    pub officer_title: String,
    pub is_officer: bool,
    pub transaction_date: NaiveDate,
    pub transaction_code: TransactionCode,
    /// Form 4 coding letter (`S`, `P`, `M`, ...)
    pub coding: Option<String>,
    pub shares: f64,
    pub price_per_share: Option<f64>,
}

impl InsiderTransaction {
    /// Only dispositions count as sells. Everything else stays unclassified.
    pub fn is_sell(&self) -> bool {
        self.transaction_code == TransactionCode::Disposed
    }
}

/// Everything parsed out of a single Form 4 filing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsiderFiling {
    pub accession_number: String,
    pub owner: Option<ReportingOwner>,
    pub transactions: Vec<InsiderTransaction>,
    #[serde(skip)]
    pub issues: Vec<crate::error::ExtractionError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_code_parsing() {
        assert_eq!(TransactionCode::from_code("d"), TransactionCode::Disposed);
        assert_eq!(TransactionCode::from_code(" A "), TransactionCode::Acquired);
        assert_eq!(
            TransactionCode::from_code("X"),
            TransactionCode::Other("X".to_string())
        );
        assert_eq!(TransactionCode::Disposed.to_string(), "D");
    }
}
