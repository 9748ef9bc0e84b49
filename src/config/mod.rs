// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for catscan

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::aggregator::FALLBACK_HERO_IMAGE;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Web UI settings
    #[serde(default)]
    pub web: WebConfig,

    /// Back-office API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Payload store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Result page settings
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Seconds between polls while waiting for a scan to finish
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Polls before giving up on a scan that is still processing
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplayConfig {
    /// Hero image used when a scan has no image at all
    #[serde(default = "default_fallback_image")]
    pub fallback_image: String,
    /// Sessions listed on the index page
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

// Default value functions
fn default_web_host() -> String { "127.0.0.1".to_string() }
fn default_web_port() -> u16 { 8080 }
fn default_api_url() -> String { "http://localhost:8000".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_poll_interval() -> u64 { 5 }
fn default_poll_attempts() -> u32 { 60 }
fn default_store_path() -> String { "catscan_payloads.jsonl".to_string() }
fn default_fallback_image() -> String { FALLBACK_HERO_IMAGE.to_string() }
fn default_recent_limit() -> usize { 20 }

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout(),
            poll_interval_secs: default_poll_interval(),
            poll_attempts: default_poll_attempts(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fallback_image: default_fallback_image(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::CatScanError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
