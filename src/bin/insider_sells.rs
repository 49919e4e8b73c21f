use clap::Parser;
use edgar_signals::{
    config::AppConfig,
    init_logger,
    models::{FilingQuery, FormType},
    pipeline::insider,
    services::{EdgarClient, RecordFetcher},
    utils::parse_cli_date,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "insider-sells")]
#[command(about = "Group officer Form 4 sells by officer and date")]
struct Cli {
    /// Issuer CIK
    #[arg(long, default_value = "1411579")]
    cik: String,
    /// First filing date (YYYY-MM-DD)
    #[arg(long, default_value = "2020-07-01", value_parser = parse_cli_date)]
    start: chrono::NaiveDate,
    /// Last filing date (YYYY-MM-DD)
    #[arg(long, default_value = "2022-06-30", value_parser = parse_cli_date)]
    end: chrono::NaiveDate,
    /// Stop after this many filings
    #[arg(long)]
    max_records: Option<usize>,
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
        "[{}] 🚀 Collecting Form 4 filings for CIK {} from {} to {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        cli.cik,
        cli.start,
        cli.end
    );

    let mut query =
        FilingQuery::new(FormType::InsiderOwnership, cli.start, cli.end).with_cik(&cli.cik);
    if let Some(max) = cli.max_records {
        query = query.with_max_records(max);
    }

    let mut edgar = EdgarClient::new(&config)?;
    let records = edgar.fetch_records(&query).await?;
    println!("📊 {} Form 4 filings found", records.len());

    let filings = insider::extract_insider_filings(records, &mut edgar).await;
    let artifacts = insider::present(&filings, &config.output_dir)?;
    for path in &artifacts.files {
        println!("💾 {}", path.display());
    }
    Ok(())
}
