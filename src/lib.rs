// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! catscan: cat health scan results
//!
//! Turns the scan payloads produced by the back-office (a session with its
//! photos, and the per-area analysis result) into the result view shown to
//! the cat's owner: ordered areas, hero image, summary and area selection.

pub mod aggregator;
pub mod api;
pub mod areas;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod web;

pub use aggregator::{ScanResultAggregator, ScanResultView, ScanSummary};
pub use config::AppConfig;
pub use error::{CatScanError, Result};
