//! Query building for the filing sources.

use super::{FilingRecord, FormType};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// What to ask a filing source for.
///
/// # Example
/// ```rust
/// use chrono::NaiveDate;
/// use edgar_signals::models::{FilingQuery, FormType};
///
/// let query = FilingQuery::new(
///     FormType::InsiderOwnership,
///     NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2021, 6, 30).unwrap(),
/// )
/// .with_cik("1411579");
/// assert_eq!(query.quarters(), vec![(2021, 1), (2021, 2)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilingQuery {
    pub form_type: FormType,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ciks: Vec<String>,
    pub max_records: Option<usize>,
}

impl FilingQuery {
    pub fn new(form_type: FormType, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            form_type,
            start,
            end,
            ciks: Vec::new(),
            max_records: None,
        }
    }

    /// Restrict the query to a single filer
    pub fn with_cik(mut self, cik: &str) -> Self {
        self.ciks.push(normalize_cik(cik));
        self
    }

    /// Restrict the query to a set of filers
    pub fn with_ciks(mut self, ciks: &[String]) -> Self {
        self.ciks.extend(ciks.iter().map(|c| normalize_cik(c)));
        self
    }

    /// Stop collecting after this many records
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Lucene-style query string understood by the sec-api.io query endpoint.
    pub fn to_query_string(&self) -> String {
        let forms = self
            .form_type
            .query_codes()
            .iter()
            .map(|code| format!("\"{}\"", code))
            .collect::<Vec<_>>()
            .join(",");

        let mut query = format!(
            "formType:({}) AND filedAt:[{} TO {}]",
            forms,
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        );

        match self.ciks.len() {
            0 => {}
            1 => query.push_str(&format!(" AND cik:{}", self.ciks[0])),
            _ => query.push_str(&format!(" AND cik:({})", self.ciks.join(" OR "))),
        }

        query
    }

    /// One page of the query as the query endpoint expects it.
    pub fn to_request(&self, from: usize, size: usize) -> QueryApiRequest {
        QueryApiRequest {
            query: QueryClause {
                query_string: QueryString {
                    query: self.to_query_string(),
                },
            },
            from,
            size,
            sort: vec![SortClause {
                filed_at: SortOrder { order: "desc" },
            }],
        }
    }

    /// `(year, quarter)` pairs of the EDGAR full-index files covering the range.
    pub fn quarters(&self) -> Vec<(i32, u32)> {
        if self.end < self.start {
            return Vec::new();
        }

        let mut quarters = Vec::new();
        let (mut year, mut quarter) = quarter_of(self.start);
        let last = quarter_of(self.end);

        loop {
            quarters.push((year, quarter));
            if (year, quarter) == last {
                break;
            }
            if quarter == 4 {
                year += 1;
                quarter = 1;
            } else {
                quarter += 1;
            }
        }

        quarters
    }

    /// Local filter for sources that cannot filter server-side.
    pub fn matches(&self, record: &FilingRecord) -> bool {
        // Variants such as 10-K405 already collapse into the family on parse
        record.form_type == self.form_type && self.matches_filer(record)
    }

    /// CIK and date filter only, any form type.
    pub fn matches_filer(&self, record: &FilingRecord) -> bool {
        let cik_matches =
            self.ciks.is_empty() || self.ciks.iter().any(|c| *c == normalize_cik(&record.cik));
        let date_matches = record.filed_at >= self.start && record.filed_at <= self.end;

        cik_matches && date_matches
    }
}

fn quarter_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), (date.month() - 1) / 3 + 1)
}

/// CIK without leading zeros.
pub fn normalize_cik(cik: &str) -> String {
    let trimmed = cik.trim().trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// CIK zero-padded to the ten digits `data.sec.gov` expects.
pub fn padded_cik(cik: &str) -> String {
    format!("{:0>10}", normalize_cik(cik))
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryApiRequest {
    pub query: QueryClause,
    pub from: usize,
    pub size: usize,
    pub sort: Vec<SortClause>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryClause {
    pub query_string: QueryString,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryString {
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SortClause {
    #[serde(rename = "filedAt")]
    pub filed_at: SortOrder,
}

#[derive(Debug, Clone, Serialize)]
pub struct SortOrder {
    pub order: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_annual_report_query_string() {
        let query = FilingQuery::new(FormType::AnnualReport, date(2023, 1, 1), date(2023, 12, 31));
        assert_eq!(
            query.to_query_string(),
            "formType:(\"10-K\",\"10-KT\",\"10KSB\",\"10KT405\",\"10KSB40\",\"10-K405\") AND filedAt:[2023-01-01 TO 2023-12-31]"
        );
    }

    #[test]
    fn test_query_string_with_ciks() {
        let query = FilingQuery::new(FormType::InsiderOwnership, date(2021, 1, 1), date(2021, 3, 31))
            .with_cik("0001411579");
        assert!(query.to_query_string().ends_with(" AND cik:1411579"));

        let query = query.with_cik("719739");
        assert!(query.to_query_string().ends_with(" AND cik:(1411579 OR 719739)"));
    }

    #[test]
    fn test_request_body_shape() {
        let query = FilingQuery::new(FormType::AnnualReport, date(2023, 1, 1), date(2023, 12, 31));
        let body = serde_json::to_value(query.to_request(200, 50)).unwrap();
        assert_eq!(body["from"], 200);
        assert_eq!(body["size"], 50);
        assert_eq!(body["sort"][0]["filedAt"]["order"], "desc");
        assert!(body["query"]["query_string"]["query"]
            .as_str()
            .unwrap()
            .starts_with("formType:("));
    }

    #[test]
    fn test_quarters_cover_range() {
        let query = FilingQuery::new(FormType::InsiderOwnership, date(2020, 7, 1), date(2022, 6, 30));
        let quarters = query.quarters();
        assert_eq!(quarters.len(), 8);
        assert_eq!(quarters.first(), Some(&(2020, 3)));
        assert_eq!(quarters.last(), Some(&(2022, 2)));

        let single = FilingQuery::new(FormType::CurrentReport, date(2023, 2, 1), date(2023, 2, 2));
        assert_eq!(single.quarters(), vec![(2023, 1)]);

        let inverted = FilingQuery::new(FormType::CurrentReport, date(2023, 2, 2), date(2023, 2, 1));
        assert!(inverted.quarters().is_empty());
    }

    #[test]
    fn test_local_match() {
        let query = FilingQuery::new(FormType::InsiderOwnership, date(2021, 1, 1), date(2021, 3, 31))
            .with_cik("1411579");
        let mut record = FilingRecord {
            accession_number: "0001411579-21-000010".to_string(),
            cik: "1411579".to_string(),
            company_name: "AMC".to_string(),
            filed_at: date(2021, 2, 1),
            form_type: FormType::InsiderOwnership,
            document_url: String::new(),
        };
        assert!(query.matches(&record));

        record.filed_at = date(2021, 4, 1);
        assert!(!query.matches(&record));

        record.filed_at = date(2021, 2, 1);
        record.form_type = FormType::CurrentReport;
        assert!(!query.matches(&record));
        assert!(query.matches_filer(&record));
    }

    #[test]
    fn test_cik_formats() {
        assert_eq!(normalize_cik("0000719739"), "719739");
        assert_eq!(padded_cik("719739"), "0000719739");
        assert_eq!(normalize_cik("000"), "0");
    }
}
