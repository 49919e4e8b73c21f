use crate::models::{InsiderFiling, InsiderTransaction};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SellBucket {
    pub count: usize,
    pub shares: f64,
}

/// Sell transactions grouped by `(officer, date)`. Only code `D` contributes.
pub fn sells_by_officer_date(
    transactions: &[InsiderTransaction],
) -> BTreeMap<(String, NaiveDate), SellBucket> {
    let mut buckets: BTreeMap<(String, NaiveDate), SellBucket> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| tx.is_sell()) {
        let bucket = buckets
            .entry((tx.officer_name.clone(), tx.transaction_date))
            .or_default();
        bucket.count += 1;
        bucket.shares += tx.shares;
    }
    buckets
}

/// Sell transactions per date across all officers.
pub fn sells_by_date(transactions: &[InsiderTransaction]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| tx.is_sell()) {
        *counts.entry(tx.transaction_date).or_insert(0) += 1;
    }
    counts
}

/// Date with the most sells. Ties go to the earliest date.
pub fn busiest_sell_date(counts: &BTreeMap<NaiveDate, usize>) -> Option<(NaiveDate, usize)> {
    counts
        .iter()
        .fold(None, |best: Option<(NaiveDate, usize)>, (&date, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((date, count)),
        })
}

/// Transactions per acquired/disposed code.
pub fn transaction_code_frequency(transactions: &[InsiderTransaction]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tx in transactions {
        *counts.entry(tx.transaction_code.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Officer filings per cleaned title, most frequent first.
pub fn officer_title_frequency(filings: &[InsiderFiling]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for owner in filings
        .iter()
        .filter_map(|f| f.owner.as_ref())
        .filter(|owner| owner.is_officer)
    {
        *counts.entry(owner.title.as_str()).or_insert(0) += 1;
    }

    let mut frequency: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(title, count)| (title.to_string(), count))
        .collect();
    frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequency
}

/// Filings whose reporting owner is an officer.
pub fn officer_filings(filings: &[InsiderFiling]) -> impl Iterator<Item = &InsiderFiling> {
    filings
        .iter()
        .filter(|f| f.owner.as_ref().is_some_and(|owner| owner.is_officer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportingOwner, TransactionCode};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 6, d).unwrap()
    }

    fn tx(officer: &str, day: u32, code: &str, shares: f64) -> InsiderTransaction {
        InsiderTransaction {
            accession_number: format!("{}-{}", officer, day),
            officer_name: officer.to_string(),
            officer_title: "CFO".to_string(),
            is_officer: true,
            transaction_date: date(day),
            transaction_code: TransactionCode::from_code(code),
            coding: None,
            shares,
            price_per_share: None,
        }
    }

    #[test]
    fn test_only_dispositions_count() {
        let transactions = vec![
            tx("Smith", 2, "A", 10.0),
            tx("Smith", 2, "D", 100.0),
            tx("Smith", 2, "D", 50.0),
            tx("Smith", 2, "X", 5.0),
        ];
        let buckets = sells_by_officer_date(&transactions);
        assert_eq!(buckets.len(), 1);
        let bucket = buckets[&("Smith".to_string(), date(2))];
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.shares, 150.0);
    }

    #[test]
    fn test_order_independent() {
        let mut transactions = vec![
            tx("Smith", 2, "D", 1.0),
            tx("Jones", 3, "D", 2.0),
            tx("Smith", 3, "D", 3.0),
            tx("Jones", 3, "A", 4.0),
        ];
        let by_officer = sells_by_officer_date(&transactions);
        let by_date = sells_by_date(&transactions);
        transactions.reverse();
        assert_eq!(sells_by_officer_date(&transactions), by_officer);
        assert_eq!(sells_by_date(&transactions), by_date);
        assert_eq!(by_date[&date(3)], 2);
    }

    #[test]
    fn test_busiest_sell_date_prefers_earliest_tie() {
        let counts = BTreeMap::from([(date(5), 3), (date(1), 3), (date(9), 1)]);
        assert_eq!(busiest_sell_date(&counts), Some((date(1), 3)));
        assert_eq!(busiest_sell_date(&BTreeMap::new()), None);
    }

    #[test]
    fn test_code_frequency() {
        let transactions = vec![tx("a", 1, "A", 1.0), tx("a", 1, "D", 1.0), tx("b", 1, "D", 1.0)];
        let freq = transaction_code_frequency(&transactions);
        assert_eq!(freq["D"], 2);
        assert_eq!(freq["A"], 1);
    }

    #[test]
    fn test_officer_title_frequency() {
        let filing = |title: &str, is_officer: bool| InsiderFiling {
            accession_number: String::new(),
            owner: Some(ReportingOwner {
                name: "x".to_string(),
                title: title.to_string(),
                is_officer,
            }),
            transactions: Vec::new(),
            issues: Vec::new(),
        };
        let filings = vec![
            filing("CFO", true),
            filing("CEO", true),
            filing("CFO", true),
            filing("DIRECTOR", false),
        ];
        assert_eq!(
            officer_title_frequency(&filings),
            vec![("CFO".to_string(), 2), ("CEO".to_string(), 1)]
        );
        assert_eq!(officer_filings(&filings).count(), 3);
    }
}
