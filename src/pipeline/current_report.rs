//! 8-K pipeline: item topics, delisting notices and bankruptcy language for
//! a handful of filers.

use super::RunArtifacts;
use crate::analysis::{bankruptcy_totals, delisting_dates, form_frequency, topic_frequency};
use crate::error::{ExtractionError, RenderError};
use crate::extract::{all_topics, count_bankruptcy_terms, filed_as_of, first_topic, UNKNOWN_TOPIC};
use crate::models::{CurrentReportSummary, FilingQuery, FilingRecord};
use crate::render::{ensure_output_dir, print_table, write_csv, BarChart, Chart};
use crate::services::DocumentSource;
use crate::utils::{log_enrich, parse_filing_date, Logger, Timer};
use serde::Serialize;
use std::path::Path;

/// Summaries plus the form mix of every filing the filers made in range.
#[derive(Debug, Clone)]
pub struct CurrentReportRun {
    pub filer_records: Vec<FilingRecord>,
    pub summaries: Vec<CurrentReportSummary>,
}

pub fn summarize(record: FilingRecord, text: &str) -> CurrentReportSummary {
    let mut issues = Vec::new();

    let topic = first_topic(text);
    if topic == UNKNOWN_TOPIC {
        issues.push(ExtractionError::SectionNotFound("ITEM INFORMATION"));
    }

    let filed = filed_as_of(text).and_then(|raw| {
        let parsed = parse_filing_date(&raw);
        if parsed.is_none() {
            issues.push(ExtractionError::Malformed {
                field: "FILED AS OF DATE",
                reason: raw.clone(),
            });
        }
        parsed
    });

    CurrentReportSummary {
        first_topic: topic,
        topics: all_topics(text),
        filed_as_of: filed,
        bankruptcy_mentions: count_bankruptcy_terms(text),
        issues,
        record,
    }
}

/// Summarize the query's 8-Ks out of `filer_records`, which may hold any form.
pub async fn summarize_current_reports<D>(
    filer_records: Vec<FilingRecord>,
    query: &FilingQuery,
    documents: &mut D,
) -> CurrentReportRun
where
    D: DocumentSource,
{
    let timer = Timer::start("8-K summaries");
    let logger = Logger::new("8-K");
    let reports: Vec<FilingRecord> = filer_records
        .iter()
        .filter(|record| query.matches(record))
        .cloned()
        .collect();
    let total = reports.len();
    let mut summaries = Vec::with_capacity(total);

    for (i, record) in reports.into_iter().enumerate() {
        crate::log_batch_progress!("8-K", i + 1, total, &record.accession_number);
        let summary = match documents.fetch_document(&record.document_url).await {
            Ok(text) => summarize(record, &text),
            Err(e) => {
                logger.warn_with_error(
                    &format!("Could not fetch {}", record.accession_number),
                    &e,
                );
                CurrentReportSummary {
                    first_topic: UNKNOWN_TOPIC.to_string(),
                    topics: Vec::new(),
                    filed_as_of: None,
                    bankruptcy_mentions: 0,
                    issues: vec![ExtractionError::DocumentUnavailable(e.to_string())],
                    record,
                }
            }
        };
        summaries.push(summary);
    }

    log_enrich(&format!(
        "{} current reports summarized out of {} filings",
        summaries.len(),
        filer_records.len()
    ));
    timer.log_elapsed();
    CurrentReportRun {
        filer_records,
        summaries,
    }
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    accession_number: &'a str,
    cik: &'a str,
    filed_as_of: String,
    first_topic: &'a str,
    topic_count: usize,
    bankruptcy_mentions: usize,
}

pub fn present(run: &CurrentReportRun, output_dir: &Path) -> Result<RunArtifacts, RenderError> {
    ensure_output_dir(output_dir)?;
    let mut artifacts = RunArtifacts::default();

    print_table(
        "Forms filed",
        &["CIK", "Form", "Filings"],
        &form_frequency(&run.filer_records)
            .into_iter()
            .map(|((cik, form), count)| vec![cik, form, count.to_string()])
            .collect::<Vec<_>>(),
    );

    let topics = topic_frequency(&run.summaries);
    print_table(
        "8-K first topics",
        &["CIK", "Topic", "Reports"],
        &topics
            .iter()
            .map(|((cik, topic), count)| vec![cik.clone(), topic.clone(), count.to_string()])
            .collect::<Vec<_>>(),
    );

    for (label, all) in [("first topic", false), ("any topic", true)] {
        let dates = delisting_dates(&run.summaries, all);
        print_table(
            &format!("Delisting notices ({})", label),
            &["CIK", "Filed as of"],
            &dates
                .into_iter()
                .map(|(cik, dates)| vec![cik, dates.join(", ")])
                .collect::<Vec<_>>(),
        );
    }

    let totals = bankruptcy_totals(&run.summaries);
    print_table(
        "Bankruptcy mentions",
        &["CIK", "Mentions"],
        &totals
            .iter()
            .map(|(cik, total)| vec![cik.clone(), total.to_string()])
            .collect::<Vec<_>>(),
    );

    let rows: Vec<SummaryRow> = run
        .summaries
        .iter()
        .map(|s| SummaryRow {
            accession_number: &s.record.accession_number,
            cik: &s.record.cik,
            filed_as_of: s
                .filed_as_of
                .map(|d| d.format("%Y%m%d").to_string())
                .unwrap_or_default(),
            first_topic: &s.first_topic,
            topic_count: s.topics.len(),
            bankruptcy_mentions: s.bankruptcy_mentions,
        })
        .collect();
    artifacts.push(write_csv(&output_dir.join("current_reports.csv"), &rows)?);

    let chart = topics.iter().fold(
        BarChart::new("8-K First Topics", "CIK / topic", "Reports"),
        |chart, ((cik, topic), count)| chart.with_bar(&format!("{} {}", cik, topic), *count as f64),
    );
    artifacts.push(chart.write_html(&output_dir.join("current_report_topics.html"))?);

    Ok(artifacts)
}
