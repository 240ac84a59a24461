//! CSV export with the encoding quirks spreadsheet apps expect.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::Writer;
use tracing::info;

use crate::export::{RecordSink, COLUMNS};
use crate::models::ScheduleItem;

/// Excel detects UTF-8 only when the file opens with a byte order mark;
/// without it the Korean header renders as mojibake.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes the harvested schedule to a local CSV file
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSink for CsvSink {
    async fn publish(&self, items: &[ScheduleItem]) -> Result<()> {
        let bytes = render(items)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!("💾 Saved {} records to {}", items.len(), self.path.display());
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "CSV file"
    }
}

/// Renders the records as BOM-prefixed CSV bytes, header row first.
fn render(items: &[ScheduleItem]) -> Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = Writer::from_writer(&mut buffer);
        writer
            .write_record(COLUMNS)
            .context("Failed to write the CSV header")?;
        for item in items {
            writer
                .write_record([&item.date, &item.time, &item.code, &item.name])
                .context("Failed to write a CSV row")?;
        }
        writer.flush().context("Failed to flush the CSV buffer")?;
    }
    Ok(buffer)
}
