use crate::models::EnrichedFiling;
use serde::Serialize;
use std::collections::BTreeMap;

/// Two-letter codes Plotly's `USA-states` location mode understands.
pub const US_STATE_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

pub fn is_us_state(code: &str) -> bool {
    US_STATE_CODES.contains(&code)
}

/// Filings per state. Filings without a state are left out.
pub fn count_by_state(filings: &[EnrichedFiling]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for state in filings.iter().filter_map(|f| f.state.as_ref()) {
        *counts.entry(state.to_uppercase()).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateSummary {
    pub total_filings: usize,
    pub ai_filings: usize,
}

/// Total filings and filings mentioning artificial intelligence, per state.
pub fn state_summary(filings: &[EnrichedFiling]) -> BTreeMap<String, StateSummary> {
    let mut summary: BTreeMap<String, StateSummary> = BTreeMap::new();
    for filing in filings {
        let Some(state) = filing.state.as_ref() else {
            continue;
        };
        let entry = summary.entry(state.to_uppercase()).or_default();
        entry.total_filings += 1;
        if filing.mentions_ai {
            entry.ai_filings += 1;
        }
    }
    summary
}

/// Accession numbers whose business section mentions the term, in input order.
pub fn ai_mention_accessions(filings: &[EnrichedFiling]) -> Vec<&str> {
    filings
        .iter()
        .filter(|f| f.mentions_ai)
        .map(|f| f.accession_number())
        .collect()
}
