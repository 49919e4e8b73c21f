use clap::Parser;
use edgar_signals::{
    config::AppConfig,
    init_logger,
    models::{FilingQuery, FormType},
    pipeline::annual_report,
    services::{EdgarClient, QueryApiClient, RecordFetcher},
    utils::parse_cli_date,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ai-mentions")]
#[command(about = "Flag 10-K business sections that mention artificial intelligence and map them by state")]
struct Cli {
    /// First filing date (YYYY-MM-DD)
    #[arg(long, default_value = "2023-01-01", value_parser = parse_cli_date)]
    start: chrono::NaiveDate,
    /// Last filing date (YYYY-MM-DD)
    #[arg(long, default_value = "2023-12-31", value_parser = parse_cli_date)]
    end: chrono::NaiveDate,
    /// Number of filings to analyze
    #[arg(long, default_value_t = 10)]
    max_records: usize,
    /// Query API page size
    #[arg(long, default_value_t = 200)]
    page_size: usize,
    /// Directory for charts and CSV files
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logger()?;
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(dir) = cli.out_dir {
        config.output_dir = dir;
    }

    println!(
        "[{}] 🚀 Searching 10-K filings from {} to {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        cli.start,
        cli.end
    );

    let query = FilingQuery::new(FormType::AnnualReport, cli.start, cli.end)
        .with_max_records(cli.max_records);
    let mut query_api = QueryApiClient::new(&config)?.with_page_size(cli.page_size);
    let records = query_api.fetch_records(&query).await?;
    println!("📊 {} filings selected", records.len());

    let mut edgar = EdgarClient::new(&config)?;
    let filings = annual_report::enrich_filings(records, &mut edgar).await;

    let artifacts = annual_report::present(&filings, &config.output_dir)?;
    for path in &artifacts.files {
        println!("💾 {}", path.display());
    }
    Ok(())
}
