use chrono::NaiveDate;
use edgar_signals::analysis::{ai_mention_accessions, count_by_state, sells_by_officer_date};
use edgar_signals::models::CompanyMetadata;
use edgar_signals::pipeline::{annual_report, insider};
use edgar_signals::prelude::*;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn annual(accession: &str, cik: &str) -> FilingRecord {
    FilingRecord {
        accession_number: accession.to_string(),
        cik: cik.to_string(),
        company_name: format!("Filer {}", cik),
        filed_at: date(2023, 2, 15),
        form_type: FormType::AnnualReport,
        document_url: format!("https://www.sec.gov/Archives/edgar/data/{}/{}.txt", cik, accession),
    }
}

fn ten_k(business: &str) -> String {
    format!(
        "<SEC-DOCUMENT><DOCUMENT><TYPE>EX-21<TEXT>Subsidiaries</TEXT></DOCUMENT>\
         <DOCUMENT><TYPE>10-K<TEXT><html><body>\
         <p>TABLE OF CONTENTS</p><p>Item 1. Business</p><p>Item 1A. Risk Factors</p>\
         <p>PART I</p><p>ITEM 1. BUSINESS</p><p>{}</p>\
         <p>ITEM 1A. RISK FACTORS</p><p>Our results may vary.</p>\
         </body></html></TEXT></DOCUMENT></SEC-DOCUMENT>",
        business
    )
}

fn metadata(state: &str) -> CompanyMetadata {
    CompanyMetadata {
        name: None,
        sic: Some("7372".to_string()),
        sic_description: None,
        state: Some(state.to_string()),
        city: None,
        zip: None,
    }
}

#[tokio::test]
async fn test_only_the_ai_filing_is_listed() {
    let first = annual("0000000101-23-000001", "101");
    let second = annual("0000000202-23-000001", "202");
    let mut source = InMemorySource::new()
        .with_document(
            &first.document_url,
            &ten_k("We sell Artificial Intelligence platforms to hospitals."),
        )
        .with_document(&second.document_url, &ten_k("We grow apples in orchards."))
        .with_company("101", metadata("NY"))
        .with_company("202", metadata("NY"));

    let filings = annual_report::enrich_filings(vec![first, second], &mut source).await;

    assert_eq!(ai_mention_accessions(&filings), vec!["0000000101-23-000001"]);
    assert!(filings.iter().all(|f| f.is_complete()));
    assert_eq!(count_by_state(&filings).get("NY"), Some(&2));
    // the table of contents pair is skipped in favour of the real section
    let section = filings[0].business_section.as_deref().unwrap();
    assert!(section.contains("hospitals"));
}

#[tokio::test]
async fn test_one_bad_record_does_not_affect_the_others() {
    let records = vec![
        annual("0000000001-23-000001", "1"),
        annual("0000000002-23-000001", "2"),
        annual("0000000003-23-000001", "3"),
    ];
    let good = InMemorySource::new()
        .with_document(&records[0].document_url, &ten_k("artificial intelligence"))
        .with_document(&records[2].document_url, &ten_k("We mine copper."))
        .with_company("1", metadata("CA"))
        .with_company("3", metadata("TX"));

    let mut source = good.clone();
    let filings = annual_report::enrich_filings(records.clone(), &mut source).await;
    assert_eq!(filings.len(), 3);
    assert!(!filings[1].is_complete());
    assert!(!filings[1].mentions_ai);

    // each surviving record matches what it produces on its own
    for idx in [0, 2] {
        let mut alone = good.clone();
        let single = annual_report::enrich_filing(records[idx].clone(), &mut alone).await;
        assert_eq!(filings[idx], single);
    }
}

#[tokio::test]
async fn test_malformed_document_does_not_affect_the_others() {
    let records = vec![
        annual("0000000001-23-000001", "1"),
        annual("0000000002-23-000001", "2"),
        annual("0000000003-23-000001", "3"),
    ];
    let source = InMemorySource::new()
        .with_document(&records[0].document_url, &ten_k("artificial intelligence"))
        .with_document(
            &records[1].document_url,
            "<DOCUMENT><TYPE>10-K<TEXT>\u{0}%PDF-1.4 garbage <<</Type /Page>> ITEM 1. BUSINESS",
        )
        .with_document(&records[2].document_url, &ten_k("We mine copper."))
        .with_company("1", metadata("CA"))
        .with_company("2", metadata("OH"))
        .with_company("3", metadata("TX"));

    let filings = annual_report::enrich_filings(records.clone(), &mut source.clone()).await;
    assert_eq!(filings.len(), 3);

    let bad = &filings[1];
    assert_eq!(bad.business_section, None);
    assert!(!bad.mentions_ai);
    assert!(matches!(bad.issues[..], [ExtractionError::SectionNotFound(_)]));
    assert_eq!(bad.state.as_deref(), Some("OH"));

    for idx in [0, 2] {
        let single = annual_report::enrich_filing(records[idx].clone(), &mut source.clone()).await;
        assert_eq!(filings[idx], single);
    }
    assert_eq!(ai_mention_accessions(&filings), vec!["0000000001-23-000001"]);
}

#[tokio::test]
async fn test_annual_report_artifacts() {
    let record = annual("0000000101-23-000001", "101");
    let mut source = InMemorySource::new()
        .with_document(&record.document_url, &ten_k("artificial intelligence"))
        .with_company("101", metadata("WA"));
    let filings = annual_report::enrich_filings(vec![record], &mut source).await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("charts");
    let artifacts = annual_report::present(&filings, &out).unwrap();
    assert!(artifacts.files.iter().all(|p| p.starts_with(&out) && p.exists()));

    let csv = std::fs::read_to_string(out.join("ai_mentions_by_state.csv")).unwrap();
    assert_eq!(csv, "state,total_filings,ai_filings\nWA,1,1\n");
}

fn form4(transactions: &[(&str, &str)]) -> String {
    let items: String = transactions
        .iter()
        .map(|(day, code)| {
            format!(
                "<nonDerivativeTransaction>\
                 <transactionDate><value>{}</value></transactionDate>\
                 <transactionCoding><transactionCode>S</transactionCode></transactionCoding>\
                 <transactionAmounts><transactionShares><value>10</value></transactionShares>\
                 <transactionAcquiredDisposedCode><value>{}</value></transactionAcquiredDisposedCode>\
                 </transactionAmounts></nonDerivativeTransaction>",
                day, code
            )
        })
        .collect();
    format!(
        "<XML><ownershipDocument><reportingOwner>\
         <reportingOwnerId><rptOwnerName>Smith John</rptOwnerName></reportingOwnerId>\
         <reportingOwnerRelationship><isOfficer>true</isOfficer>\
         <officerTitle>Chief Accounting Officer</officerTitle></reportingOwnerRelationship>\
         </reportingOwner><nonDerivativeTable>{}</nonDerivativeTable></ownershipDocument></XML>",
        items
    )
}

#[tokio::test]
async fn test_acquired_then_two_disposed_is_two_sells() {
    let record = FilingRecord {
        accession_number: "0001411579-21-000200".to_string(),
        cik: "1411579".to_string(),
        company_name: "AMC ENTERTAINMENT HOLDINGS, INC.".to_string(),
        filed_at: date(2021, 6, 4),
        form_type: FormType::InsiderOwnership,
        document_url: "https://www.sec.gov/Archives/edgar/data/1411579/0001411579-21-000200.txt"
            .to_string(),
    };
    let mut source = InMemorySource::new().with_document(
        &record.document_url,
        &form4(&[("2021-06-02", "A"), ("2021-06-02", "D"), ("2021-06-02", "D")]),
    );

    let filings = insider::extract_insider_filings(vec![record], &mut source).await;
    let transactions = insider::officer_transactions(&filings);
    assert_eq!(transactions.len(), 3);

    let sells = sells_by_officer_date(&transactions);
    let bucket = sells[&("Smith John".to_string(), date(2021, 6, 2))];
    assert_eq!(bucket.count, 2);
    assert_eq!(bucket.shares, 20.0);
}

#[tokio::test]
async fn test_records_come_back_in_query_window() {
    let mut source = InMemorySource::new()
        .with_record(annual("0000000001-23-000001", "1"))
        .with_record(FilingRecord {
            filed_at: date(2022, 12, 30),
            ..annual("0000000002-22-000001", "2")
        })
        .with_record(annual("0000000001-23-000001", "1"));

    let query = FilingQuery::new(FormType::AnnualReport, date(2023, 1, 1), date(2023, 12, 31));
    let records = source.fetch_records(&query).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].accession_number, "0000000001-23-000001");
}

#[tokio::test]
async fn test_max_records_counts_distinct_filings() {
    let mut source = InMemorySource::new()
        .with_record(annual("0000000001-23-000001", "1"))
        .with_record(annual("0000000001-23-000001", "1"))
        .with_record(annual("0000000002-23-000001", "2"))
        .with_record(annual("0000000003-23-000001", "3"));

    let query = FilingQuery::new(FormType::AnnualReport, date(2023, 1, 1), date(2023, 12, 31))
        .with_max_records(2);
    let records = source.fetch_records(&query).await.unwrap();
    let accessions: Vec<&str> = records.iter().map(|r| r.accession_number.as_str()).collect();
    assert_eq!(accessions, vec!["0000000001-23-000001", "0000000002-23-000001"]);
}
