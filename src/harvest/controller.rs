//! Harvest controller: drives a full run across the schedule's date tabs.
//!
//! A run navigates to the schedule page, discovers the date tab strip,
//! and for each requested tab alternates growth cycles with extraction
//! passes until the completion policy rules the tab exhausted. Each tab
//! harvests into its own store, which is folded into the run result when
//! the tab completes.

use anyhow::{bail, Context, Result};
use chrono::Local;
use tracing::{debug, error, info, warn};

use crate::harvest::dates::{collapse_whitespace, normalize};
use crate::harvest::extract::extract_candidates;
use crate::harvest::growth::advance;
use crate::harvest::stagnation::CompletionPolicy;
use crate::harvest::store::RecordStore;
use crate::harvest::types::{settle, HarvestConfig};
use crate::models::ScheduleItem;
use crate::scrapers::SchedulePage;

/// Tab strip buttons longer than this are other page chrome, not date tabs.
const MAX_TAB_LABEL_CHARS: usize = 15;

pub struct HarvestController<'a> {
    page: &'a dyn SchedulePage,
    config: &'a HarvestConfig,
}

impl<'a> HarvestController<'a> {
    pub fn new(page: &'a dyn SchedulePage, config: &'a HarvestConfig) -> Self {
        Self { page, config }
    }

    /// Runs a full harvest. Failures before any tab is reached produce an
    /// empty result rather than an error; per-tab failures skip that tab.
    pub fn run(&self) -> Vec<ScheduleItem> {
        if let Err(error) = self.page.navigate(&self.config.start_url, self.config.nav_timeout) {
            error!("Failed to open {}: {error:#}", self.config.start_url);
            return Vec::new();
        }
        settle(self.config.nav_settle);

        let tabs = match self.discover_tabs() {
            Ok(tabs) if !tabs.is_empty() => tabs,
            Ok(_) => {
                warn!("No date tabs found on the schedule page");
                return Vec::new();
            }
            Err(error) => {
                error!("Date tab discovery failed: {error:#}");
                return Vec::new();
            }
        };
        info!("Found {} date tabs", tabs.len());

        let start = tabs
            .iter()
            .position(|label| label.contains(self.config.today_marker.as_str()))
            .unwrap_or(0);

        let mut results = Vec::new();
        for label in tabs.iter().skip(start).take(self.config.max_tabs) {
            let display = collapse_whitespace(label);
            match self.harvest_tab(label) {
                Ok(store) => {
                    let collected = store.len();
                    results.extend(store.into_items());
                    info!(
                        "Tab '{}' done: {} records ({} total)",
                        display,
                        collected,
                        results.len()
                    );
                }
                Err(error) => warn!("Skipping tab '{display}': {error:#}"),
            }
        }
        results
    }

    /// Harvests one date tab to exhaustion and returns its record store.
    fn harvest_tab(&self, tab_label: &str) -> Result<RecordStore> {
        let display = collapse_whitespace(tab_label);
        info!("Collecting tab '{display}'...");

        self.select_tab(tab_label)?;
        self.apply_category_filter()?;

        let mut store = RecordStore::new();
        let mut policy = CompletionPolicy::new(self.config.stagnant_limit, self.config.max_cycles);
        let mut prior_extent = 0.0;

        loop {
            let outcome = advance(self.page, self.config, prior_extent);
            prior_extent = outcome.after;

            self.collect_visible(tab_label, &mut store);

            if policy.observe(outcome).is_done() {
                break;
            }
            if policy.cycles() % 10 == 0 {
                info!(
                    "Still scrolling ({} cycles, {} records so far)",
                    policy.cycles(),
                    store.len()
                );
            }
        }

        info!("Tab '{display}' exhausted after {} cycles", policy.cycles());
        Ok(store)
    }

    /// Finds the date tab strip. Date tabs are the short buttons whose label
    /// carries the today marker or a digit.
    fn discover_tabs(&self) -> Result<Vec<String>> {
        let script = tab_listing_script(&self.config.today_marker);
        let value = self
            .page
            .evaluate(&script)
            .context("Failed to list date tab buttons")?;
        let raw = value
            .as_str()
            .context("Tab listing did not return a string")?;
        let tabs: Vec<String> =
            serde_json::from_str(raw).context("Tab listing was not a string array")?;
        Ok(tabs)
    }

    /// Clicks a date tab by the first line of its label. Tab buttons render
    /// the day word on the first line and the date below it.
    fn select_tab(&self, tab_label: &str) -> Result<()> {
        let button_label = tab_label.lines().next().unwrap_or(tab_label).trim();
        let clicked = self
            .page
            .click_if_visible(button_label)
            .with_context(|| format!("Failed to click tab button '{button_label}'"))?;
        if !clicked {
            bail!("Tab button '{button_label}' not found");
        }
        settle(self.config.tab_settle);
        Ok(())
    }

    /// Activates the configured category filter when the tab offers it.
    /// A missing filter control is normal and the tab proceeds unfiltered.
    fn apply_category_filter(&self) -> Result<()> {
        if let Some(filter) = &self.config.category_filter {
            let clicked = self
                .page
                .click_if_visible(filter)
                .with_context(|| format!("Failed to apply the '{filter}' filter"))?;
            if clicked {
                info!("Applied the '{filter}' filter");
                settle(self.config.filter_settle);
            } else {
                debug!("No '{filter}' filter control on this tab");
            }
        }
        Ok(())
    }

    /// Captures the DOM and merges every extractable record into the store.
    /// A failed capture costs one pass, never the run.
    fn collect_visible(&self, tab_label: &str, store: &mut RecordStore) {
        let html = match self.page.content() {
            Ok(html) => html,
            Err(error) => {
                warn!("Could not capture page content this cycle: {error}");
                return;
            }
        };

        let reference = Local::now().date_naive();
        for candidate in extract_candidates(&html) {
            let date = normalize(&candidate.date_label, reference, tab_label);
            store.insert(ScheduleItem {
                date,
                time: candidate.time_label,
                code: candidate.code,
                name: candidate.name,
            });
        }
    }
}

/// Single JS expression returning the tab strip labels as a JSON array
/// string. Arrays do not come back by value from the page, strings do.
fn tab_listing_script(today_marker: &str) -> String {
    let marker = serde_json::to_string(today_marker).expect("string serializes to a JS literal");
    format!(
        "JSON.stringify(Array.from(document.querySelectorAll('button'))\
         .filter(b => (b.innerText.includes({marker}) || /\\d+/.test(b.innerText))\
         && b.innerText.length < {MAX_TAB_LABEL_CHARS})\
         .map(b => b.innerText.trim()))"
    )
}
