use clap::Parser;
use edgar_signals::{
    config::AppConfig,
    init_logger,
    models::{FilingQuery, FormType},
    pipeline::current_report,
    services::EdgarClient,
    utils::parse_cli_date,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "event-topics")]
#[command(about = "Survey 8-K item topics, delisting notices and bankruptcy language")]
struct Cli {
    /// Filer CIKs (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "719739,834285")]
    ciks: Vec<String>,
    /// First filing date (YYYY-MM-DD)
    #[arg(long, default_value = "2022-10-01", value_parser = parse_cli_date)]
    start: chrono::NaiveDate,
    /// Last filing date (YYYY-MM-DD)
    #[arg(long, default_value = "2024-09-30", value_parser = parse_cli_date)]
    end: chrono::NaiveDate,
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
        "[{}] 🚀 Surveying 8-K filings for CIKs {} from {} to {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        cli.ciks.join(", "),
        cli.start,
        cli.end
    );

    let query = FilingQuery::new(FormType::CurrentReport, cli.start, cli.end).with_ciks(&cli.ciks);
    let mut edgar = EdgarClient::new(&config)?;
    let filer_records = edgar.filer_records(&query).await?;
    println!("📊 {} filings found for these filers", filer_records.len());

    let run = current_report::summarize_current_reports(filer_records, &query, &mut edgar).await;
    let artifacts = current_report::present(&run, &config.output_dir)?;
    for path in &artifacts.files {
        println!("💾 {}", path.display());
    }
    Ok(())
}
