// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for catscan

use thiserror::Error;

/// Result type alias for catscan operations
pub type Result<T> = std::result::Result<T, CatScanError>;

/// catscan error types
#[derive(Error, Debug)]
pub enum CatScanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    Api { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The result view was requested without a scan session to derive it from.
    /// This is a caller bug, never a data condition.
    #[error("Scan result view used without a scan session")]
    MissingSession,

    #[error("Scan session not found: {0}")]
    SessionNotFound(u64),

    #[error("Invalid scan payload: {0}")]
    InvalidPayload(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}
