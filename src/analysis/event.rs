use crate::models::{normalize_cik, CurrentReportSummary, FilingRecord};
use std::collections::BTreeMap;

/// Filings per `(cik, form)`.
pub fn form_frequency(records: &[FilingRecord]) -> BTreeMap<(String, String), usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts
            .entry((normalize_cik(&record.cik), record.form_type.to_string()))
            .or_insert(0) += 1;
    }
    counts
}

/// Reports per `(cik, first topic)`, most frequent first.
pub fn topic_frequency(summaries: &[CurrentReportSummary]) -> Vec<((String, String), usize)> {
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for summary in summaries {
        *counts
            .entry((
                normalize_cik(&summary.record.cik),
                summary.first_topic.clone(),
            ))
            .or_insert(0) += 1;
    }

    let mut frequency: Vec<_> = counts.into_iter().collect();
    // stable sort keeps the key order among equal counts
    frequency.sort_by(|a, b| b.1.cmp(&a.1));
    frequency
}

/// Filed-as-of dates of reports announcing a delisting, per CIK.
///
/// With `all_topics` unset only the first topic is inspected.
pub fn delisting_dates(
    summaries: &[CurrentReportSummary],
    all_topics: bool,
) -> BTreeMap<String, Vec<String>> {
    let mut dates: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for summary in summaries {
        let delisting = if all_topics {
            summary.any_topic_mentions_delisting()
        } else {
            summary.first_topic_mentions_delisting()
        };
        if !delisting {
            continue;
        }
        if let Some(filed) = summary.filed_as_of {
            dates
                .entry(normalize_cik(&summary.record.cik))
                .or_default()
                .push(filed.format("%Y%m%d").to_string());
        }
    }
    for list in dates.values_mut() {
        list.sort();
    }
    dates
}

/// Bankruptcy-term occurrences summed per CIK.
pub fn bankruptcy_totals(summaries: &[CurrentReportSummary]) -> BTreeMap<String, usize> {
    let mut totals = BTreeMap::new();
    for summary in summaries {
        *totals
            .entry(normalize_cik(&summary.record.cik))
            .or_insert(0) += summary.bankruptcy_mentions;
    }
    totals
}
