// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Back-office API client for scan payloads

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::models::ScanPayload;
use crate::{CatScanError, Result};

/// Client for the back-office scan endpoints
pub struct ScanApiClient {
    client: Client,
    base_url: String,
}

impl ScanApiClient {
    /// Create a new client with a request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        // Normalize URL
        let base_url = base_url
            .trim_end_matches('/')
            .trim_end_matches("/api")
            .to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn scan_url(&self, id: u64) -> String {
        format!("{}/api/scans/{}", self.base_url, id)
    }

    /// Check that the back-office answers
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/up", self.base_url);
        let response = self.client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatScanError::Api {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(())
    }

    /// Fetch the session and result for a scan
    pub async fn fetch_payload(&self, id: u64) -> Result<ScanPayload> {
        let url = self.scan_url(id);
        debug!("Fetching scan payload from {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(CatScanError::Api {
                status: response.status().as_u16(),
                url,
            });
        }

        let payload: ScanPayload = response.json().await?;
        Ok(payload)
    }

    /// Poll a scan until the pipeline has finished with it.
    ///
    /// Returns the last payload seen, finished or not, once `attempts` polls
    /// have been made.
    pub async fn wait_for_result(&self, id: u64, interval: Duration, attempts: u32) -> Result<ScanPayload> {
        let mut attempt = 0;
        loop {
            let payload = self.fetch_payload(id).await?;
            let status = payload.session()?.status;
            attempt += 1;

            if status.is_finished() {
                info!("Scan {} finished with status {}", id, status);
                return Ok(payload);
            }
            if attempt >= attempts {
                warn!("Scan {} still {} after {} polls", id, status, attempt);
                return Ok(payload);
            }

            debug!("Scan {} is {}, polling again in {:?}", id, status, interval);
            tokio::time::sleep(interval).await;
        }
    }
}
