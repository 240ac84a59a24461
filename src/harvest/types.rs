use std::thread;
use std::time::Duration;

/// Tuning knobs for one harvesting run
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Schedule page entry point
    pub start_url: String,
    /// Hard timeout for the initial navigation
    pub nav_timeout: Duration,
    /// Wait after navigation before touching the page
    pub nav_settle: Duration,
    /// Wait after switching to a date tab
    pub tab_settle: Duration,
    /// Wait after applying the category filter
    pub filter_settle: Duration,
    /// Pixels per scroll-forward step
    pub scroll_step: f64,
    /// Wait after each scroll step
    pub scroll_settle: Duration,
    /// Wait after activating a "load more" affordance
    pub load_more_settle: Duration,
    /// Button texts or CSS selectors that expand the list when activated
    pub load_more_targets: Vec<String>,
    /// Consecutive no-growth cycles before the list counts as exhausted
    pub stagnant_limit: u32,
    /// Hard ceiling on harvesting cycles per tab
    pub max_cycles: u32,
    /// How many date tabs to process, starting from the today tab
    pub max_tabs: usize,
    /// Label fragment identifying the today tab
    pub today_marker: String,
    /// Category filter to activate on each tab, when the page offers one
    pub category_filter: Option<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            start_url: "https://www.hmall.com/md/dpl/index?mainDispSeq=2&brodType=all"
                .to_string(),
            nav_timeout: Duration::from_secs(120),
            nav_settle: Duration::from_secs(10),
            tab_settle: Duration::from_secs(4),
            filter_settle: Duration::from_secs(5),
            scroll_step: 1000.0,
            scroll_settle: Duration::from_millis(1500),
            load_more_settle: Duration::from_secs(2),
            load_more_targets: vec!["상품 더보기".to_string(), ".btn_more".to_string()],
            stagnant_limit: 15,
            max_cycles: 200,
            max_tabs: 1,
            today_marker: "오늘".to_string(),
            category_filter: Some("TV쇼핑".to_string()),
        }
    }
}

/// Fixed wait for the page to settle after a side effect. A zero duration
/// returns immediately without sleeping.
pub fn settle(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}
