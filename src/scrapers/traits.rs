use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

/// Everything the harvesting loop needs from a live schedule page
/// This allows the loop to run against a scripted page in tests
pub trait SchedulePage {
    /// Navigate to `url`, waiting up to `timeout` for the load to finish
    fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Evaluate a JavaScript expression and return its value
    fn evaluate(&self, script: &str) -> Result<Value>;

    /// Total scrollable content height, a proxy for how much has loaded
    fn scroll_extent(&self) -> Result<f64>;

    /// Scroll the viewport forward by `delta` pixels
    fn scroll_by(&self, delta: f64) -> Result<()>;

    /// Click the first visible element matching `needle`, tried first as a
    /// CSS selector and then as a button/link text fragment. Returns whether
    /// anything was clicked; an absent element is `Ok(false)`, not an error.
    fn click_if_visible(&self, needle: &str) -> Result<bool>;

    /// Capture the current DOM as an HTML string
    fn content(&self) -> Result<String>;
}
