//! Growth trigger: one scroll-forward cycle against the live page.

use tracing::{debug, warn};

use crate::harvest::types::{settle, HarvestConfig};
use crate::scrapers::SchedulePage;

/// What one growth cycle observed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthOutcome {
    /// Content extent before the cycle
    pub before: f64,
    /// Content extent after scrolling and settling
    pub after: f64,
    /// Whether a "load more" affordance was activated this cycle
    pub expanded: bool,
}

/// Scrolls the viewport forward once, activates a visible "load more"
/// affordance when the page offers one, and re-measures the content extent
/// after the configured settle delays.
///
/// Browser hiccups never propagate out of a cycle: a step that fails is
/// logged and the cycle degrades to a no-growth observation around
/// `prior_extent`, which feeds the completion policy like any other stall.
pub fn advance(page: &dyn SchedulePage, config: &HarvestConfig, prior_extent: f64) -> GrowthOutcome {
    let before = match page.scroll_extent() {
        Ok(extent) => extent,
        Err(error) => {
            warn!("Could not read content extent, reusing prior value: {error}");
            prior_extent
        }
    };

    if let Err(error) = page.scroll_by(config.scroll_step) {
        warn!("Scroll step failed: {error}");
    }
    settle(config.scroll_settle);

    let expanded = activate_load_more(page, config);

    let after = match page.scroll_extent() {
        Ok(extent) => extent,
        Err(error) => {
            warn!("Could not re-read content extent, assuming no growth: {error}");
            before
        }
    };

    GrowthOutcome {
        before,
        after,
        expanded,
    }
}

/// Clicks the first matching "load more" target, if any is present and
/// visible. Absence is the normal case, not an error.
fn activate_load_more(page: &dyn SchedulePage, config: &HarvestConfig) -> bool {
    for target in &config.load_more_targets {
        match page.click_if_visible(target) {
            Ok(true) => {
                debug!("Expanded the list via '{target}'");
                settle(config.load_more_settle);
                return true;
            }
            Ok(false) => {}
            Err(error) => warn!("Load-more click on '{target}' failed: {error}"),
        }
    }
    false
}
