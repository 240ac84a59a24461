mod export;
mod harvest;
mod models;
mod scrapers;

use std::env;

use export::{sheets::SHEETS_ENDPOINT, CsvSink, RecordSink, SheetsSink};
use harvest::{HarvestConfig, HarvestController};
use scrapers::HmallBrowser;
use tracing::{error, info, warn, Level};
use tracing_subscriber;

/// Default output file for the CSV sink
const CSV_PATH: &str = "hmall_schedule.csv";
/// Default sheet tab when SHEETS_TAB is not set
const DEFAULT_SHEET_TAB: &str = "크롤링";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("📺 Schedule Scout - hmall Broadcast Schedule Harvester");
    info!("======================================================");
    info!(
        "Run started at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("");

    let config = HarvestConfig::default();
    let page = HmallBrowser::new()?;

    info!("Starting harvest from {}", config.start_url);
    info!("");

    let items = HarvestController::new(&page, &config).run();

    if items.is_empty() {
        warn!("⚠️ No records collected, skipping export");
        return Ok(());
    }

    info!("\n✅ Harvested {} schedule records\n", items.len());

    for (i, item) in items.iter().enumerate() {
        println!(
            "{}. {} {} [{}] {}",
            i + 1,
            item.date,
            item.time,
            item.code,
            item.name
        );
    }

    for sink in build_sinks() {
        if let Err(error) = sink.publish(&items).await {
            error!("❌ {} export failed: {error:#}", sink.sink_name());
        }
    }

    info!("\n🎉 Done!");
    Ok(())
}

/// The CSV file is always written; the sheet push joins in only when the
/// environment provides a spreadsheet and a token.
fn build_sinks() -> Vec<Box<dyn RecordSink>> {
    let sheets = match (
        env::var("SHEETS_SPREADSHEET_ID"),
        env::var("SHEETS_ACCESS_TOKEN"),
    ) {
        (Ok(spreadsheet_id), Ok(token)) => {
            let tab = env::var("SHEETS_TAB").unwrap_or_else(|_| DEFAULT_SHEET_TAB.to_string());
            Some(SheetsSink::new(SHEETS_ENDPOINT, spreadsheet_id, tab, token))
        }
        _ => {
            info!("SHEETS_SPREADSHEET_ID / SHEETS_ACCESS_TOKEN not set, skipping the sheet push");
            None
        }
    };
    assemble_sinks(sheets)
}

/// The CSV sink always leads the list and publishes first; a sheet client
/// that cannot be built is logged and dropped, never fatal to the run.
fn assemble_sinks(sheets: Option<anyhow::Result<SheetsSink>>) -> Vec<Box<dyn RecordSink>> {
    let mut sinks: Vec<Box<dyn RecordSink>> = vec![Box::new(CsvSink::new(CSV_PATH))];
    match sheets {
        Some(Ok(sink)) => sinks.push(Box::new(sink)),
        Some(Err(error)) => error!("❌ Google Sheets sink unavailable: {error:#}"),
        None => {}
    }
    sinks
}
