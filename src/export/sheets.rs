//! Google Sheets export over the v4 REST surface.
//!
//! A push makes sure the target tab exists, clears it, then writes the
//! whole collection in one bulk update. Token acquisition is the caller's
//! problem: the sink takes a ready bearer token.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::export::{RecordSink, COLUMNS};
use crate::models::ScheduleItem;

/// Production API endpoint; tests point the sink at a local server instead.
pub const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com";

/// Grid dimensions for a freshly created tab.
const NEW_TAB_ROWS: u32 = 5000;
const NEW_TAB_COLS: u32 = 10;

/// Pushes the harvested schedule to a Google Sheets tab
pub struct SheetsSink {
    client: Client,
    endpoint: String,
    spreadsheet_id: String,
    tab_name: String,
    token: String,
}

impl SheetsSink {
    pub fn new(
        endpoint: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        tab_name: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            spreadsheet_id: spreadsheet_id.into(),
            tab_name: tab_name.into(),
            token: token.into(),
        })
    }

    /// Creates the target tab when the spreadsheet does not have it yet.
    async fn ensure_tab(&self) -> Result<()> {
        let url = format!(
            "{}/v4/spreadsheets/{}?fields=sheets.properties.title",
            self.endpoint, self.spreadsheet_id
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .context("Failed to fetch spreadsheet metadata")?;
        if !response.status().is_success() {
            bail!("Spreadsheet metadata request failed: {}", response.status());
        }

        let metadata: Value = response
            .json()
            .await
            .context("Failed to read spreadsheet metadata")?;
        let tab_exists = metadata["sheets"].as_array().is_some_and(|sheets| {
            sheets
                .iter()
                .any(|sheet| sheet["properties"]["title"].as_str() == Some(self.tab_name.as_str()))
        });
        if tab_exists {
            return Ok(());
        }

        debug!("Tab '{}' is missing, creating it", self.tab_name);
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.endpoint, self.spreadsheet_id
        );
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": self.tab_name,
                        "gridProperties": {
                            "rowCount": NEW_TAB_ROWS,
                            "columnCount": NEW_TAB_COLS,
                        },
                    },
                },
            }],
        });
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("Failed to create the sheet tab")?;
        if !response.status().is_success() {
            bail!("Sheet tab creation failed: {}", response.status());
        }
        Ok(())
    }

    /// Empties the tab so removed broadcasts do not linger from older runs.
    async fn clear_tab(&self) -> Result<()> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}:clear",
            self.endpoint, self.spreadsheet_id, self.tab_name
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({}))
            .send()
            .await
            .context("Failed to clear the sheet tab")?;
        if !response.status().is_success() {
            bail!("Sheet clear failed: {}", response.status());
        }
        Ok(())
    }

    /// Bulk-writes the header and every record starting at A1. The header
    /// row carries an update timestamp in its last cell.
    async fn write_rows(&self, items: &[ScheduleItem]) -> Result<()> {
        let mut header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
        header.push(format!("업데이트: {}", Local::now().format("%Y-%m-%d %H:%M")));

        let mut rows = vec![header];
        for item in items {
            rows.push(vec![
                item.date.clone(),
                item.time.clone(),
                item.code.clone(),
                item.name.clone(),
            ]);
        }

        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}!A1?valueInputOption=RAW",
            self.endpoint, self.spreadsheet_id, self.tab_name
        );
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": rows }))
            .send()
            .await
            .context("Failed to write sheet rows")?;
        if !response.status().is_success() {
            bail!("Sheet update failed: {}", response.status());
        }
        Ok(())
    }
}

#[async_trait]
impl RecordSink for SheetsSink {
    async fn publish(&self, items: &[ScheduleItem]) -> Result<()> {
        info!("📊 Pushing {} records to Google Sheets...", items.len());
        self.ensure_tab().await?;
        self.clear_tab().await?;
        self.write_rows(items).await?;
        info!("✅ Sheet tab '{}' updated", self.tab_name);
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "Google Sheets"
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn item(code: &str) -> ScheduleItem {
        ScheduleItem {
            date: "03.05".to_string(),
            time: "09:40".to_string(),
            code: code.to_string(),
            name: "무선 청소기 세트".to_string(),
        }
    }

    fn metadata_with_tab(title: &str) -> Value {
        json!({ "sheets": [{ "properties": { "title": title } }] })
    }

    async fn mount_happy_write_path(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sid/values/schedule:clear"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v4/spreadsheets/sid/values/schedule!A1"))
            .and(query_param("valueInputOption", "RAW"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn publish_writes_header_and_rows_to_an_existing_tab() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sid"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(metadata_with_tab("schedule")),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_happy_write_path(&server).await;

        let sink =
            SheetsSink::new(server.uri(), "sid", "schedule", "test-token").expect("build sink");
        sink.publish(&[item("100"), item("200")])
            .await
            .expect("publish succeeds");

        let requests = server.received_requests().await.expect("recording enabled");
        let update = requests
            .iter()
            .find(|request| request.url.path().ends_with("!A1"))
            .expect("bulk update request sent");
        let body: Value = serde_json::from_slice(&update.body).expect("valid JSON body");

        let values = body["values"].as_array().expect("values array");
        assert_eq!(values.len(), 3);
        assert_eq!(values[0][0], "날짜");
        assert_eq!(values[0][3], "상품명");
        assert!(values[0][4]
            .as_str()
            .expect("marker cell")
            .starts_with("업데이트:"));
        assert_eq!(values[1][2], "100");
        assert_eq!(values[2][2], "200");
    }

    #[tokio::test]
    async fn missing_tab_is_created_before_writing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(metadata_with_tab("other")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sid:batchUpdate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        mount_happy_write_path(&server).await;

        let sink =
            SheetsSink::new(server.uri(), "sid", "schedule", "test-token").expect("build sink");
        sink.publish(&[item("100")]).await.expect("publish succeeds");
    }

    #[tokio::test]
    async fn failed_clear_aborts_the_push() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sid"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(metadata_with_tab("schedule")),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sid/values/schedule:clear"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v4/spreadsheets/sid/values/schedule!A1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let sink =
            SheetsSink::new(server.uri(), "sid", "schedule", "test-token").expect("build sink");
        let result = sink.publish(&[item("100")]).await;
        assert!(result.is_err());
    }
}
