use std::time::Duration;

use anyhow::{Context as _, Result};
use reqwest::{Client, Response, header};
use serde::Deserialize;

use crate::telemetry::{NameTable, RawReading};

const API_KEY_HEADER: &str = "X-Cisco-Meraki-API-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(7);
const PER_PAGE: u32 = 1000;

#[derive(Debug, Clone)]
pub struct MerakiClient {
    http: Client,
    base_url: String,
    api_key: String,
    organization_id: String,
}

#[derive(Debug, Deserialize)]
struct InventoryDevice {
    serial: String,
    name: Option<String>,
}

impl MerakiClient {
    pub fn new(base_url: &str, api_key: &str, organization_id: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            organization_id: organization_id.to_string(),
        })
    }

    /// Builds the serial-to-name table from the organization's sensor
    /// inventory. Unnamed devices are left out; a reading from one fails
    /// normalization rather than getting a default name.
    pub async fn sensor_name_table(&self) -> Result<NameTable> {
        let url = format!(
            "{}/organizations/{}/inventory/devices?productTypes[]=sensor",
            self.base_url, self.organization_id,
        );

        let devices: Vec<InventoryDevice> = self
            .get(&url)
            .await
            .context("failed to fetch sensor inventory")?
            .json()
            .await
            .context("failed to decode sensor inventory")?;

        Ok(devices
            .into_iter()
            .filter_map(|d| Some((d.serial, d.name?)))
            .collect())
    }

    /// Fetches all sensor readings within the lookback window, following
    /// `Link` headers until every page is consumed.
    pub async fn sensor_readings_history(&self, timespan_secs: u64) -> Result<Vec<RawReading>> {
        let first = format!(
            "{}/organizations/{}/sensor/readings/history?timespan={}&perPage={}",
            self.base_url, self.organization_id, timespan_secs, PER_PAGE,
        );

        let mut readings = Vec::new();
        let mut next = Some(first);

        while let Some(url) = next {
            let response = self
                .get(&url)
                .await
                .context("failed to fetch sensor readings page")?;

            next = next_page_url(response.headers());

            let mut page: Vec<RawReading> = response
                .json()
                .await
                .context("failed to decode sensor readings page")?;
            readings.append(&mut page);
        }

        Ok(readings)
    }

    async fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        Ok(response.error_for_status()?)
    }
}

fn next_page_url(headers: &header::HeaderMap) -> Option<String> {
    let link = headers.get(header::LINK)?.to_str().ok()?;
    parse_next_link(link)
}

/// Pulls the `rel=next` target out of an RFC 5988 `Link` header, if any.
fn parse_next_link(link: &str) -> Option<String> {
    for part in link.split(',') {
        let mut segments = part.trim().split(';');
        let target = segments.next()?.trim();

        let is_next = segments
            .map(str::trim)
            .any(|s| s == "rel=next" || s == "rel=\"next\"");
        if is_next {
            return Some(
                target
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string(),
            );
        }
    }

    None
}
