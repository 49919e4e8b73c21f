//! Form 4 ownership document parsing.

use super::TransactionFieldExtractor;
use crate::error::ExtractionError;
use crate::models::{InsiderFiling, InsiderTransaction, ReportingOwner, TransactionCode};
use crate::utils::parse_filing_date;
use regex::Regex;
use std::sync::LazyLock;

static OWNERSHIP_DOCUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*ownershipDocument\s*>").expect("valid regex"));
static REPORTING_OWNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<\s*reportingOwner\s*>(.*?)<\s*/\s*reportingOwner\s*>").expect("valid regex")
});
static NON_DERIVATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<\s*nonDerivativeTransaction\s*>(.*?)<\s*/\s*nonDerivativeTransaction\s*>")
        .expect("valid regex")
});
static DERIVATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<\s*derivativeTransaction\s*>(.*?)<\s*/\s*derivativeTransaction\s*>")
        .expect("valid regex")
});

const UNKNOWN: &str = "UNKNOWN";

macro_rules! tag_pattern {
    ($name:ident, $tag:literal) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(concat!(
                r"(?is)<\s*",
                $tag,
                r"\s*>\s*(?:<\s*value\s*>)?\s*([^<]*?)\s*<"
            ))
            .expect("valid regex")
        });
    };
}

tag_pattern!(OWNER_NAME, "rptOwnerName");
tag_pattern!(OFFICER_TITLE, "officerTitle");
tag_pattern!(IS_OFFICER, "isOfficer");
tag_pattern!(TRANSACTION_DATE, "transactionDate");
tag_pattern!(DISPOSED_CODE, "transactionAcquiredDisposedCode");
tag_pattern!(TRANSACTION_SHARES, "transactionShares");
tag_pattern!(TRANSACTION_CODE, "transactionCode");
tag_pattern!(PRICE_PER_SHARE, "transactionPricePerShare");

/// Text of a tag, or of its nested `<value>`, inside `block`. Empty values are `None`.
pub fn tag_value(block: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| super::decode_entities(m.as_str().trim()))
        .filter(|s| !s.is_empty())
}

/// Upper-case, comma-free, single-spaced officer title.
pub fn clean_officer_title(raw: &str) -> String {
    let cleaned = raw.replace("&amp;", "").replace('&', "").replace(',', "");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn parse_flag(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("1") | Some("true")
    )
}

fn parse_number(value: &str) -> Option<f64> {
    value.replace(',', "").trim().parse().ok()
}

/// Pulls reporting-owner and transaction fields out of a Form 4.
#[derive(Debug, Clone, Copy, Default)]
pub struct Form4Extractor;

impl Form4Extractor {
    pub fn reporting_owner(&self, document: &str) -> Option<ReportingOwner> {
        let block = REPORTING_OWNER
            .captures(document)
            .and_then(|caps| caps.get(1))?
            .as_str();

        Some(ReportingOwner {
            name: tag_value(block, &OWNER_NAME).unwrap_or_else(|| UNKNOWN.to_string()),
            title: tag_value(block, &OFFICER_TITLE)
                .map(|t| clean_officer_title(&t))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            is_officer: parse_flag(tag_value(block, &IS_OFFICER)),
        })
    }

    fn parse_transaction(
        &self,
        accession_number: &str,
        owner: &ReportingOwner,
        block: &str,
    ) -> Result<InsiderTransaction, ExtractionError> {
        let raw_date = tag_value(block, &TRANSACTION_DATE).ok_or(ExtractionError::Malformed {
            field: "transactionDate",
            reason: "missing".to_string(),
        })?;
        let transaction_date =
            parse_filing_date(&raw_date).ok_or_else(|| ExtractionError::Malformed {
                field: "transactionDate",
                reason: raw_date.clone(),
            })?;

        let code = tag_value(block, &DISPOSED_CODE).ok_or(
            ExtractionError::Malformed {
                field: "transactionAcquiredDisposedCode",
                reason: "missing".to_string(),
            },
        )?;

        let raw_shares = tag_value(block, &TRANSACTION_SHARES).ok_or(ExtractionError::Malformed {
            field: "transactionShares",
            reason: "missing".to_string(),
        })?;
        let shares = parse_number(&raw_shares).ok_or_else(|| ExtractionError::Malformed {
            field: "transactionShares",
            reason: raw_shares.clone(),
        })?;

        Ok(InsiderTransaction {
            accession_number: accession_number.to_string(),
            officer_name: owner.name.clone(),
            officer_title: owner.title.clone(),
            is_officer: owner.is_officer,
            transaction_date,
            transaction_code: TransactionCode::from_code(&code),
            coding: tag_value(block, &TRANSACTION_CODE).map(|c| c.to_ascii_uppercase()),
            shares,
            price_per_share: tag_value(block, &PRICE_PER_SHARE)
                .as_deref()
                .and_then(parse_number),
        })
    }
}

impl TransactionFieldExtractor for Form4Extractor {
    fn extract_transactions(&self, accession_number: &str, document: &str) -> InsiderFiling {
        let mut filing = InsiderFiling {
            accession_number: accession_number.to_string(),
            owner: None,
            transactions: Vec::new(),
            issues: Vec::new(),
        };

        if !OWNERSHIP_DOCUMENT.is_match(document) {
            filing.issues.push(ExtractionError::Malformed {
                field: "ownershipDocument",
                reason: "no ownership document in filing".to_string(),
            });
            return filing;
        }

        let owner = self.reporting_owner(document).unwrap_or_else(|| {
            filing.issues.push(ExtractionError::Malformed {
                field: "reportingOwner",
                reason: "missing".to_string(),
            });
            ReportingOwner {
                name: UNKNOWN.to_string(),
                title: UNKNOWN.to_string(),
                is_officer: false,
            }
        });

        // Both tables, in document order
        let mut blocks: Vec<(usize, &str)> = NON_DERIVATIVE
            .captures_iter(document)
            .chain(DERIVATIVE.captures_iter(document))
            .filter_map(|caps| caps.get(1))
            .map(|m| (m.start(), m.as_str()))
            .collect();
        blocks.sort_by_key(|(start, _)| *start);

        for (_, block) in blocks {
            match self.parse_transaction(accession_number, &owner, block) {
                Ok(transaction) => filing.transactions.push(transaction),
                Err(e) => filing.issues.push(e),
            }
        }

        filing.owner = Some(owner);
        filing
    }
}
