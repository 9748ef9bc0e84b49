// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Scan payload types as emitted by the back-office
//!
//! Field names follow the JSON the back-office produces (snake_case). Missing
//! optional fields decode to `None`; unknown fields are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CatScanError, Result};

/// Processing status of a scan session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Processing,
    Done,
    Failed,
}

impl ScanStatus {
    /// Whether the external pipeline has finished with this session
    pub fn is_finished(self) -> bool {
        !matches!(self, ScanStatus::Processing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScanStatus::Processing => "processing",
            ScanStatus::Done => "done",
            ScanStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anatomical area key of a result detail.
///
/// Anything outside the five known areas is kept verbatim in `Other` so that
/// newer analysis outputs still decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AreaKey {
    LeftEye,
    RightEye,
    Mouth,
    LeftEar,
    RightEar,
    Other(String),
}

impl AreaKey {
    pub fn as_str(&self) -> &str {
        match self {
            AreaKey::LeftEye => "left_eye",
            AreaKey::RightEye => "right_eye",
            AreaKey::Mouth => "mouth",
            AreaKey::LeftEar => "left_ear",
            AreaKey::RightEar => "right_ear",
            AreaKey::Other(name) => name,
        }
    }
}

impl From<String> for AreaKey {
    fn from(value: String) -> Self {
        match value.as_str() {
            "left_eye" => AreaKey::LeftEye,
            "right_eye" => AreaKey::RightEye,
            "mouth" => AreaKey::Mouth,
            "left_ear" => AreaKey::LeftEar,
            "right_ear" => AreaKey::RightEar,
            _ => AreaKey::Other(value),
        }
    }
}

impl From<&str> for AreaKey {
    fn from(value: &str) -> Self {
        AreaKey::from(value.to_string())
    }
}

impl From<AreaKey> for String {
    fn from(key: AreaKey) -> Self {
        match key {
            AreaKey::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AreaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured photo of the cat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanImage {
    pub id: u64,
    #[serde(default)]
    pub img_original_url: Option<String>,
    #[serde(default)]
    pub img_roi_url: Option<String>,
    #[serde(default)]
    pub img_remove_bg_url: Option<String>,
}

/// A user-initiated capture-and-analysis attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSession {
    pub id: u64,
    pub status: ScanStatus,
    #[serde(default)]
    pub scan_type: Option<String>,
    #[serde(default)]
    pub checkup_type: Option<String>,
    #[serde(default)]
    pub images: Vec<ScanImage>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Per-area classification outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResultDetail {
    pub id: u64,
    #[serde(default)]
    pub scan_result_id: u64,
    #[serde(default)]
    pub area_name: Option<AreaKey>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub img_roi_url: Option<String>,
    #[serde(default)]
    pub img_gradcam_url: Option<String>,
}

impl ScanResultDetail {
    /// Case-insensitive match on the "abnormal" label. A missing label counts
    /// as not abnormal.
    pub fn is_abnormal(&self) -> bool {
        self.label
            .as_deref()
            .is_some_and(|label| label.eq_ignore_ascii_case("abnormal"))
    }
}

/// Aggregate outcome of analyzing a session's images
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub id: u64,
    #[serde(default)]
    pub scan_id: u64,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub img_landmark_url: Option<String>,
    #[serde(default)]
    pub details: Vec<ScanResultDetail>,
}

/// Page-load payload: a session and, once analysis is done, its result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanPayload {
    #[serde(default)]
    pub session: Option<ScanSession>,
    #[serde(default)]
    pub result: Option<ScanResult>,
}

impl ScanPayload {
    pub fn new(session: ScanSession, result: Option<ScanResult>) -> Self {
        Self {
            session: Some(session),
            result,
        }
    }

    /// The session this payload describes; absent is a usage error
    pub fn session(&self) -> Result<&ScanSession> {
        self.session.as_ref().ok_or(CatScanError::MissingSession)
    }

    /// Check the invariants the store relies on
    pub fn validate(&self) -> Result<()> {
        let session = self.session()?;
        let Some(result) = &self.result else {
            return Ok(());
        };

        if result.scan_id != 0 && result.scan_id != session.id {
            return Err(CatScanError::InvalidPayload(format!(
                "result {} belongs to scan {}, not {}",
                result.id, result.scan_id, session.id
            )));
        }

        for detail in &result.details {
            if let Some(score) = detail.confidence_score {
                if !(0.0..=1.0).contains(&score) {
                    return Err(CatScanError::InvalidPayload(format!(
                        "detail {} has confidence score {} outside [0, 1]",
                        detail.id, score
                    )));
                }
            }
        }

        Ok(())
    }
}
