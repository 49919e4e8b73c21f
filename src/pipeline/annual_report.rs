//! 10-K pipeline: enrich each filing with filer metadata and the business
//! section, flag artificial-intelligence mentions and chart them by state.

use super::RunArtifacts;
use crate::analysis::{ai_mention_accessions, count_by_state, state_summary};
use crate::error::{ExtractionError, RenderError};
use crate::extract::{
    document_text, mentions_ai, sentences_with_term, BusinessSectionExtractor,
    TextSectionExtractor, AI_TERM,
};
use crate::models::{CompanyMetadata, EnrichedFiling, FilingRecord, FormType};
use crate::render::{ensure_output_dir, print_table, write_csv, Chart, ChoroplethChart};
use crate::services::{CompanyMetadataSource, DocumentSource};
use crate::utils::{log_enrich, Logger, Timer};
use serde::Serialize;
use std::path::Path;

/// Enrich records one at a time. A failure on one record is kept on that
/// record and never stops the rest.
pub async fn enrich_filings<S>(records: Vec<FilingRecord>, source: &mut S) -> Vec<EnrichedFiling>
where
    S: DocumentSource + CompanyMetadataSource,
{
    let timer = Timer::start("10-K enrichment");
    let total = records.len();
    let mut filings = Vec::with_capacity(total);

    for (i, record) in records.into_iter().enumerate() {
        crate::log_batch_progress!("ENRICH", i + 1, total, &record.accession_number);
        filings.push(enrich_filing(record, source).await);
    }

    let incomplete = filings.iter().filter(|f| !f.is_complete()).count();
    log_enrich(&format!(
        "{} filings enriched, {} with issues",
        filings.len(),
        incomplete
    ));
    timer.log_elapsed();
    filings
}

pub async fn enrich_filing<S>(record: FilingRecord, source: &mut S) -> EnrichedFiling
where
    S: DocumentSource + CompanyMetadataSource,
{
    let logger = Logger::new("ENRICH");
    let mut issues = Vec::new();

    let metadata = match source.company_metadata(&record.cik).await {
        Ok(found) => found.unwrap_or_default(),
        Err(e) => {
            logger.warn_with_error(&format!("No metadata for CIK {}", record.cik), &e);
            issues.push(ExtractionError::MetadataUnavailable(e.to_string()));
            CompanyMetadata::default()
        }
    };

    let extractor = BusinessSectionExtractor;
    let (business_section, ai_sentences) = match source.fetch_document(&record.document_url).await
    {
        Ok(raw) => {
            let text = document_text(&raw, FormType::AnnualReport.code());
            let section = extractor.extract_section(&text).map(str::to_string);
            if section.is_none() {
                logger.debug(&format!(
                    "{} has no {} section",
                    record.accession_number,
                    extractor.section_name()
                ));
                issues.push(ExtractionError::SectionNotFound(extractor.section_name()));
            }
            (section, sentences_with_term(&text, AI_TERM))
        }
        Err(e) => {
            logger.warn_with_error(
                &format!("Could not fetch {}", record.accession_number),
                &e,
            );
            issues.push(ExtractionError::DocumentUnavailable(e.to_string()));
            (None, Vec::new())
        }
    };

    let flagged = business_section.as_deref().is_some_and(mentions_ai);
    let company_name = metadata
        .name
        .unwrap_or_else(|| record.company_name.clone());

    EnrichedFiling {
        company_name,
        state: metadata.state,
        sic: metadata.sic,
        city: metadata.city,
        zip: metadata.zip,
        business_section,
        mentions_ai: flagged,
        ai_sentences,
        issues,
        record,
    }
}

#[derive(Debug, Serialize)]
struct FilingRow<'a> {
    accession_number: &'a str,
    company_name: &'a str,
    filed_at: String,
    state: &'a str,
    sic: &'a str,
    mentions_ai: bool,
    issues: String,
}

#[derive(Debug, Serialize)]
struct StateRow<'a> {
    state: &'a str,
    total_filings: usize,
    ai_filings: usize,
}

/// Print the summary tables and write the state maps and CSV exports.
pub fn present(filings: &[EnrichedFiling], output_dir: &Path) -> Result<RunArtifacts, RenderError> {
    ensure_output_dir(output_dir)?;
    let mut artifacts = RunArtifacts::default();

    let rows: Vec<Vec<String>> = filings
        .iter()
        .take(10)
        .map(|f| {
            vec![
                f.accession_number().to_string(),
                f.company_name.clone(),
                f.record.filed_at.to_string(),
                f.state.clone().unwrap_or_default(),
                f.sic.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(
        &format!("10-K filings (first {} of {})", rows.len(), filings.len()),
        &["Accession", "Company", "Filed", "State", "SIC"],
        &rows,
    );

    let filing_rows: Vec<FilingRow> = filings
        .iter()
        .map(|f| FilingRow {
            accession_number: f.accession_number(),
            company_name: &f.company_name,
            filed_at: f.record.filed_at.to_string(),
            state: f.state.as_deref().unwrap_or(""),
            sic: f.sic.as_deref().unwrap_or(""),
            mentions_ai: f.mentions_ai,
            issues: f
                .issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        })
        .collect();
    artifacts.push(write_csv(&output_dir.join("annual_reports.csv"), &filing_rows)?);

    let counts = count_by_state(filings);
    print_table(
        "Filings by state",
        &["State", "Filings"],
        &counts
            .iter()
            .map(|(state, count)| vec![state.clone(), count.to_string()])
            .collect::<Vec<_>>(),
    );
    let chart = ChoroplethChart::from_counts(
        "Number of Firms by State (Headquarters)",
        "Filings",
        &counts,
    );
    artifacts.push(chart.write_html(&output_dir.join("filings_by_state.html"))?);

    println!("\n🔎 Business sections mentioning \"{}\"", AI_TERM);
    let matches = ai_mention_accessions(filings);
    if matches.is_empty() {
        println!("   No documents mention \"{}\".", AI_TERM);
    }
    for filing in filings.iter().filter(|f| f.mentions_ai) {
        println!("=== Accession Number: {} ===", filing.accession_number());
        for sentence in &filing.ai_sentences {
            println!("  • {}", sentence);
        }
    }

    let summary = state_summary(filings);
    let state_rows: Vec<StateRow> = summary
        .iter()
        .map(|(state, s)| StateRow {
            state,
            total_filings: s.total_filings,
            ai_filings: s.ai_filings,
        })
        .collect();
    print_table(
        "AI mentions by state",
        &["State", "Filings", "AI mentions"],
        &state_rows
            .iter()
            .map(|r| {
                vec![
                    r.state.to_string(),
                    r.total_filings.to_string(),
                    r.ai_filings.to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    );
    artifacts.push(write_csv(&output_dir.join("ai_mentions_by_state.csv"), &state_rows)?);

    let chart = summary.iter().fold(
        ChoroplethChart::new("Filings Mentioning Artificial Intelligence by State", "AI mentions"),
        |chart, (state, s)| {
            chart.with_state(
                state,
                s.ai_filings as f64,
                &format!("{}: {} of {} filings", state, s.ai_filings, s.total_filings),
            )
        },
    );
    artifacts.push(chart.write_html(&output_dir.join("ai_mentions_by_state.html"))?);

    Ok(artifacts)
}
