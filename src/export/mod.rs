pub mod csv;
pub mod sheets;

pub use csv::CsvSink;
pub use sheets::SheetsSink;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ScheduleItem;

/// Output column headers, matching the sheet the schedule feeds
pub(crate) const COLUMNS: [&str; 4] = ["날짜", "방송시간", "상품코드", "상품명"];

/// Common trait for all schedule destinations
/// Sinks are independent of each other: one failing must not stop the rest
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Publish the full record collection to the destination
    async fn publish(&self, items: &[ScheduleItem]) -> Result<()>;

    /// Get the name of the destination
    fn sink_name(&self) -> &'static str;
}
