//! Form 4 pipeline: officer transactions, sells grouped by officer and date.

use super::RunArtifacts;
use crate::analysis::{
    busiest_sell_date, officer_filings, officer_title_frequency, sells_by_date,
    sells_by_officer_date, transaction_code_frequency,
};
use crate::error::{ExtractionError, RenderError};
use crate::extract::{Form4Extractor, TransactionFieldExtractor};
use crate::models::{FilingRecord, InsiderFiling, InsiderTransaction};
use crate::render::{
    ensure_output_dir, print_table, write_csv, BarChart, Chart, GroupedBarChart,
};
use crate::services::DocumentSource;
use crate::utils::{log_enrich, Logger, Timer};
use serde::Serialize;
use std::path::Path;

/// Fetch and parse every Form 4 in order. Unreachable documents become
/// filings with no transactions and a recorded issue.
pub async fn extract_insider_filings<D>(
    records: Vec<FilingRecord>,
    documents: &mut D,
) -> Vec<InsiderFiling>
where
    D: DocumentSource,
{
    let timer = Timer::start("Form 4 extraction");
    let logger = Logger::new("FORM4");
    let extractor = Form4Extractor;
    let total = records.len();
    let mut filings = Vec::with_capacity(total);

    for (i, record) in records.iter().enumerate() {
        crate::log_batch_progress!("FORM4", i + 1, total, &record.accession_number);
        let filing = match documents.fetch_document(&record.document_url).await {
            Ok(document) => extractor.extract_transactions(&record.accession_number, &document),
            Err(e) => {
                logger.warn_with_error(
                    &format!("Could not fetch {}", record.accession_number),
                    &e,
                );
                InsiderFiling {
                    accession_number: record.accession_number.clone(),
                    owner: None,
                    transactions: Vec::new(),
                    issues: vec![ExtractionError::DocumentUnavailable(e.to_string())],
                }
            }
        };
        filings.push(filing);
    }

    let transactions: usize = filings.iter().map(|f| f.transactions.len()).sum();
    log_enrich(&format!(
        "{} Form 4 filings parsed, {} transactions",
        filings.len(),
        transactions
    ));
    timer.log_elapsed();
    filings
}

/// Transactions reported by officers, in filing order.
pub fn officer_transactions(filings: &[InsiderFiling]) -> Vec<InsiderTransaction> {
    filings
        .iter()
        .flat_map(|f| f.transactions.iter())
        .filter(|tx| tx.is_officer)
        .cloned()
        .collect()
}

#[derive(Debug, Serialize)]
struct SellRow<'a> {
    officer: &'a str,
    date: String,
    sells: usize,
    shares: f64,
}

#[derive(Debug, Serialize)]
struct TransactionRow<'a> {
    accession_number: &'a str,
    officer: &'a str,
    title: &'a str,
    date: String,
    code: &'a str,
    coding: &'a str,
    shares: f64,
    price_per_share: Option<f64>,
}

/// Print the officer and sell summaries, write the sells chart and CSVs.
pub fn present(filings: &[InsiderFiling], output_dir: &Path) -> Result<RunArtifacts, RenderError> {
    ensure_output_dir(output_dir)?;
    let mut artifacts = RunArtifacts::default();
    let transactions = officer_transactions(filings);

    println!(
        "\n👔 {} of {} Form 4 filings were reported by officers",
        officer_filings(filings).count(),
        filings.len()
    );

    print_table(
        "Officer titles",
        &["Title", "Filings"],
        &officer_title_frequency(filings)
            .into_iter()
            .map(|(title, count)| vec![title, count.to_string()])
            .collect::<Vec<_>>(),
    );
    print_table(
        "Transaction codes",
        &["Code", "Transactions"],
        &transaction_code_frequency(&transactions)
            .into_iter()
            .map(|(code, count)| vec![code, count.to_string()])
            .collect::<Vec<_>>(),
    );

    let transaction_rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|tx| TransactionRow {
            accession_number: &tx.accession_number,
            officer: &tx.officer_name,
            title: &tx.officer_title,
            date: tx.transaction_date.to_string(),
            code: tx.transaction_code.as_str(),
            coding: tx.coding.as_deref().unwrap_or(""),
            shares: tx.shares,
            price_per_share: tx.price_per_share,
        })
        .collect();
    artifacts.push(write_csv(
        &output_dir.join("officer_transactions.csv"),
        &transaction_rows,
    )?);

    let grouped = sells_by_officer_date(&transactions);
    let sell_rows: Vec<SellRow> = grouped
        .iter()
        .map(|((officer, date), bucket)| SellRow {
            officer,
            date: date.to_string(),
            sells: bucket.count,
            shares: bucket.shares,
        })
        .collect();
    print_table(
        "Sells by officer and date",
        &["Officer", "Date", "Sells", "Shares"],
        &sell_rows
            .iter()
            .map(|r| {
                vec![
                    r.officer.to_string(),
                    r.date.clone(),
                    r.sells.to_string(),
                    format!("{:.0}", r.shares),
                ]
            })
            .collect::<Vec<_>>(),
    );
    artifacts.push(write_csv(&output_dir.join("sells_by_officer_date.csv"), &sell_rows)?);

    let chart = grouped.iter().fold(
        GroupedBarChart::new("Officer Sells by Officer and Date", "Date", "Number of sells"),
        |chart, ((officer, date), bucket)| {
            chart.with_bar(officer, &date.to_string(), bucket.count as f64)
        },
    );
    artifacts.push(chart.write_html(&output_dir.join("sells_by_officer_date.html"))?);

    let by_date = sells_by_date(&transactions);
    match busiest_sell_date(&by_date) {
        Some((date, count)) => println!("\n📉 Most officer sells on one day: {} on {}", count, date),
        None => println!("\n📉 No officer sells in range"),
    }

    let chart = by_date.iter().fold(
        BarChart::new("Officer Sells by Date", "Date", "Number of sells"),
        |chart, (date, &count)| chart.with_bar(&date.to_string(), count as f64),
    );
    artifacts.push(chart.write_html(&output_dir.join("officer_sells_by_date.html"))?);

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormType;
    use crate::services::InMemorySource;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(accession: &str) -> FilingRecord {
        FilingRecord {
            accession_number: accession.to_string(),
            cik: "1411579".to_string(),
            company_name: "AMC ENTERTAINMENT HOLDINGS, INC.".to_string(),
            filed_at: NaiveDate::from_ymd_opt(2021, 6, 3).unwrap(),
            form_type: FormType::InsiderOwnership,
            document_url: format!("https://example.test/{}.txt", accession),
        }
    }

    fn form4(officer: bool, codes: &[&str]) -> String {
        let items: String = codes
            .iter()
            .map(|code| {
                format!(
                    "<nonDerivativeTransaction>\
                     <transactionDate><value>2021-06-01</value></transactionDate>\
                     <transactionCoding><transactionCode>S</transactionCode></transactionCoding>\
                     <transactionAmounts>\
                     <transactionShares><value>100</value></transactionShares>\
                     <transactionPricePerShare><value>55.5</value></transactionPricePerShare>\
                     <transactionAcquiredDisposedCode><value>{}</value></transactionAcquiredDisposedCode>\
                     </transactionAmounts></nonDerivativeTransaction>",
                    code
                )
            })
            .collect();
        format!(
            "<XML><ownershipDocument><reportingOwner>\
             <reportingOwnerId><rptOwnerName>Doe Jane</rptOwnerName></reportingOwnerId>\
             <reportingOwnerRelationship><isOfficer>{}</isOfficer>\
             <officerTitle>EVP, Chief Financial Officer</officerTitle></reportingOwnerRelationship>\
             </reportingOwner><nonDerivativeTable>{}</nonDerivativeTable></ownershipDocument></XML>",
            if officer { 1 } else { 0 },
            items
        )
    }

    #[tokio::test]
    async fn test_extract_and_filter_officers() {
        let mut source = InMemorySource::new()
            .with_document("https://example.test/a.txt", &form4(true, &["D", "A"]))
            .with_document("https://example.test/b.txt", &form4(false, &["D"]));

        let filings = extract_insider_filings(
            vec![record("a"), record("b"), record("missing")],
            &mut source,
        )
        .await;
        assert_eq!(filings.len(), 3);
        assert_eq!(filings[2].issues.len(), 1);

        let officers = officer_transactions(&filings);
        assert_eq!(officers.len(), 2);
        assert!(officers.iter().all(|tx| tx.officer_name == "Doe Jane"));
    }

    #[tokio::test]
    async fn test_present_writes_chart() {
        let mut source = InMemorySource::new()
            .with_document("https://example.test/a.txt", &form4(true, &["A", "D", "D"]));
        let filings = extract_insider_filings(vec![record("a")], &mut source).await;

        let dir = TempDir::new().unwrap();
        let artifacts = present(&filings, dir.path()).unwrap();
        assert_eq!(artifacts.files.len(), 4);

        let html = std::fs::read_to_string(dir.path().join("sells_by_officer_date.html")).unwrap();
        assert!(html.contains("\"name\":\"Doe Jane\""));
        assert!(html.contains("\"barmode\":\"group\""));

        let csv = std::fs::read_to_string(dir.path().join("sells_by_officer_date.csv")).unwrap();
        assert_eq!(csv, "officer,date,sells,shares\nDoe Jane,2021-06-01,2,200.0\n");
    }
}
