use std::ffi::{OsStr, OsString};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use tracing::info;

use crate::scrapers::traits::SchedulePage;

/// The schedule page only serves the scrollable list layout to mobile
/// browsers, so the tab emulates an iPhone.
const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
const MOBILE_VIEWPORT: (u32, u32) = (390, 844);

/// Live schedule page driven through headless Chrome
pub struct HmallBrowser {
    // The browser process shuts down when this is dropped.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl HmallBrowser {
    /// Launch headless Chrome with the mobile profile and open a blank tab
    pub fn new() -> Result<Self> {
        info!("Launching headless Chrome...");

        let user_agent = OsString::from(format!("--user-agent={MOBILE_USER_AGENT}"));
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some(MOBILE_VIEWPORT))
            .args(vec![
                user_agent.as_os_str(),
                OsStr::new("--disable-blink-features=AutomationControlled"),
            ])
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open a browser tab")?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl SchedulePage for HmallBrowser {
    fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        self.tab.set_default_timeout(timeout);
        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to open {url}"))?;
        self.tab
            .wait_until_navigated()
            .context("Navigation did not finish")?;
        Ok(())
    }

    fn evaluate(&self, script: &str) -> Result<Value> {
        let result = self.tab.evaluate(script, false)?;
        Ok(result.value.unwrap_or(Value::Null))
    }

    fn scroll_extent(&self) -> Result<f64> {
        let value = self.evaluate("document.body.scrollHeight")?;
        value
            .as_f64()
            .ok_or_else(|| anyhow!("scrollHeight was not a number: {value}"))
    }

    fn scroll_by(&self, delta: f64) -> Result<()> {
        self.evaluate(&format!("window.scrollBy(0, {delta})"))?;
        Ok(())
    }

    fn click_if_visible(&self, needle: &str) -> Result<bool> {
        let value = self.evaluate(&click_script(needle))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn content(&self) -> Result<String> {
        let value = self.evaluate("document.documentElement.outerHTML")?;
        match value.as_str() {
            Some(html) => Ok(html.to_string()),
            None => Err(anyhow!("Could not get HTML from page")),
        }
    }
}

/// JS that clicks the first visible element matching `needle`. Tries the
/// needle as a CSS selector first; when that is invalid or matches nothing,
/// falls back to scanning button and link texts. Elements without an
/// offsetParent are detached or hidden and never clicked.
fn click_script(needle: &str) -> String {
    let literal = serde_json::to_string(needle).expect("string serializes to a JS literal");
    format!(
        r#"(() => {{
            const needle = {literal};
            let el = null;
            try {{ el = document.querySelector(needle); }} catch (e) {{}}
            if (!el) {{
                el = Array.from(document.querySelectorAll('button, a'))
                    .find(b => (b.innerText || '').includes(needle));
            }}
            if (!el || el.offsetParent === null) return false;
            el.click();
            return true;
        }})()"#
    )
}
