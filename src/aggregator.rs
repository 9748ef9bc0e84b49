// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Scan result aggregation
//!
//! Derives everything the result page shows from a `(session, result)` pair:
//! the ordered area details, the hero image, summary statistics and the
//! currently selected area. All derived values are recomputed on every call;
//! the selected area is the only state the aggregator owns.

use serde::Serialize;
use tracing::debug;

use crate::areas::{self, AreaMeta};
use crate::models::{AreaKey, ScanResult, ScanResultDetail, ScanSession, ScanStatus};

/// Remark shown while the analysis has not produced any text yet
pub const PENDING_REMARK: &str = "Sedang dianalisis";

/// Image shown when neither the result nor the session has one
pub const FALLBACK_HERO_IMAGE: &str = "/images/cat-placeholder.png";

/// Summary statistics over a result's details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    pub abnormal_count: usize,
    pub average_confidence: f64,
    pub average_percent: f64,
    pub remark: String,
}

/// One detail as presented, with its display annotations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    #[serde(flatten)]
    pub detail: ScanResultDetail,
    pub area_label: String,
    pub is_abnormal: bool,
    pub confidence_percent: Option<f64>,
    pub is_active: bool,
}

/// Snapshot handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResultView {
    pub session_id: u64,
    pub status: ScanStatus,
    pub hero_image: String,
    pub summary: ScanSummary,
    pub active_area: Option<AreaKey>,
    pub details: Vec<DetailView>,
}

impl ScanResultView {
    /// The detail for the active area, if any
    pub fn active_detail(&self) -> Option<&DetailView> {
        self.details.iter().find(|d| d.is_active)
    }
}

/// Details in display order, as a new vector.
///
/// Known areas come first in table order; unknown or missing areas follow in
/// their input order (`sort_by_key` is stable).
pub fn sort_details(details: &[ScanResultDetail]) -> Vec<ScanResultDetail> {
    let mut sorted = details.to_vec();
    sorted.sort_by_key(|d| areas::rank(d.area_name.as_ref()));
    sorted
}

/// `value * 100`, rounded to two decimals
pub fn to_percent(value: f64) -> f64 {
    (value * 10000.0).round() / 100.0
}

/// Summary statistics; an absent result summarizes as empty
pub fn compute_summary(result: Option<&ScanResult>) -> ScanSummary {
    let details = result.map(|r| r.details.as_slice()).unwrap_or_default();

    let abnormal_count = details.iter().filter(|d| d.is_abnormal()).count();

    let scores: Vec<f64> = details.iter().filter_map(|d| d.confidence_score).collect();
    let average_confidence = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    let remark = result
        .and_then(|r| r.remarks.as_deref())
        .filter(|r| !r.is_empty())
        .unwrap_or(PENDING_REMARK)
        .to_string();

    ScanSummary {
        abnormal_count,
        average_confidence,
        average_percent: to_percent(average_confidence),
        remark,
    }
}

/// First present image of: landmark, first image's ROI, first image's
/// original, then `fallback`
pub fn select_hero_image<'a>(
    session: &'a ScanSession,
    result: Option<&'a ScanResult>,
    fallback: &'a str,
) -> &'a str {
    let first_image = session.images.first();

    [
        result.and_then(|r| r.img_landmark_url.as_deref()),
        first_image.and_then(|i| i.img_roi_url.as_deref()),
        first_image.and_then(|i| i.img_original_url.as_deref()),
    ]
    .into_iter()
    .flatten()
    .find(|url| !url.is_empty())
    .unwrap_or(fallback)
}

/// Area of the first detail that names one
fn first_area(sorted: &[ScanResultDetail]) -> Option<&AreaKey> {
    sorted.iter().find_map(|d| d.area_name.as_ref())
}

/// Result page state for one viewer
#[derive(Debug, Clone)]
pub struct ScanResultAggregator {
    active_area: Option<AreaKey>,
    fallback_image: String,
}

impl Default for ScanResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanResultAggregator {
    pub fn new() -> Self {
        Self {
            active_area: None,
            fallback_image: FALLBACK_HERO_IMAGE.to_string(),
        }
    }

    /// Use a different placeholder for the hero image
    pub fn with_fallback_image(mut self, path: impl Into<String>) -> Self {
        self.fallback_image = path.into();
        self
    }

    /// Select an area. Returns whether the stored key changed.
    ///
    /// The return value tracks the stored key, not the area that resolves
    /// against a result: on a fresh aggregator the effective area may already
    /// be the one being set and this still returns `true`. Any key is
    /// accepted; one that is not among the details is replaced by the first
    /// available area on the next read.
    pub fn set_active_area(&mut self, area: AreaKey) -> bool {
        if self.active_area.as_ref() == Some(&area) {
            return false;
        }
        debug!("Active area set to {}", area);
        self.active_area = Some(area);
        true
    }

    /// Ordered details of `result`
    pub fn details(&self, result: Option<&ScanResult>) -> Vec<ScanResultDetail> {
        result.map(|r| sort_details(&r.details)).unwrap_or_default()
    }

    /// The selected area as it resolves against `sorted`, without storing it
    pub fn active_area<'a>(&'a self, sorted: &'a [ScanResultDetail]) -> Option<&'a AreaKey> {
        match &self.active_area {
            Some(area) if sorted.iter().any(|d| d.area_name.as_ref() == Some(area)) => Some(area),
            _ => first_area(sorted),
        }
    }

    /// Resolve the selection against `sorted` and keep the outcome
    pub fn sync_active_area(&mut self, sorted: &[ScanResultDetail]) -> Option<&AreaKey> {
        let resolved = self.active_area(sorted).cloned();
        if resolved != self.active_area {
            debug!(
                "Active area reset from {:?} to {:?}",
                self.active_area.as_ref().map(AreaKey::as_str),
                resolved.as_ref().map(AreaKey::as_str)
            );
            self.active_area = resolved;
        }
        self.active_area.as_ref()
    }

    pub fn hero_image<'a>(&'a self, session: &'a ScanSession, result: Option<&'a ScanResult>) -> &'a str {
        select_hero_image(session, result, &self.fallback_image)
    }

    pub fn summary(&self, result: Option<&ScanResult>) -> ScanSummary {
        compute_summary(result)
    }

    pub fn area_meta(&self, area: &AreaKey) -> Option<&'static AreaMeta> {
        areas::meta(area)
    }

    /// Derive the full view for `(session, result)`
    pub fn view(&mut self, session: &ScanSession, result: Option<&ScanResult>) -> ScanResultView {
        let sorted = self.details(result);
        let active_area = self.sync_active_area(&sorted).cloned();

        // Only the first detail of the active area is marked
        let mut marked = false;
        let details = sorted
            .into_iter()
            .map(|detail| {
                let is_active = !marked && active_area.is_some() && detail.area_name == active_area;
                marked |= is_active;
                DetailView {
                    area_label: areas::label(detail.area_name.as_ref()),
                    is_abnormal: detail.is_abnormal(),
                    confidence_percent: detail.confidence_score.map(to_percent),
                    is_active,
                    detail,
                }
            })
            .collect();

        ScanResultView {
            session_id: session.id,
            status: session.status,
            hero_image: self.hero_image(session, result).to_string(),
            summary: self.summary(result),
            active_area,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScanImage;

    fn session(images: Vec<ScanImage>) -> ScanSession {
        ScanSession {
            id: 1,
            status: ScanStatus::Done,
            scan_type: Some("full".to_string()),
            checkup_type: None,
            images,
            created_at: None,
        }
    }

    fn detail(id: u64, area: Option<&str>, score: Option<f64>, label: Option<&str>) -> ScanResultDetail {
        ScanResultDetail {
            id,
            scan_result_id: 9,
            area_name: area.map(AreaKey::from),
            confidence_score: score,
            label: label.map(String::from),
            ..Default::default()
        }
    }

    fn result(details: Vec<ScanResultDetail>, remarks: Option<&str>) -> ScanResult {
        ScanResult {
            id: 9,
            scan_id: 1,
            remarks: remarks.map(String::from),
            img_landmark_url: None,
            details,
        }
    }

    fn ids(details: &[ScanResultDetail]) -> Vec<u64> {
        details.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_sort_known_areas_in_table_order() {
        let input = vec![
            detail(1, Some("right_ear"), None, None),
            detail(2, Some("mouth"), None, None),
            detail(3, Some("left_eye"), None, None),
            detail(4, Some("left_ear"), None, None),
            detail(5, Some("right_eye"), None, None),
        ];
        assert_eq!(ids(&sort_details(&input)), vec![3, 5, 2, 4, 1]);
        // input untouched
        assert_eq!(ids(&input), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sort_unknown_areas_last_in_input_order() {
        let input = vec![
            detail(1, Some("tail"), None, None),
            detail(2, Some("mouth"), None, None),
            detail(3, None, None, None),
            detail(4, Some("nose"), None, None),
            detail(5, Some("left_eye"), None, None),
        ];
        assert_eq!(ids(&sort_details(&input)), vec![5, 2, 1, 3, 4]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let input = vec![
            detail(1, Some("nose"), None, None),
            detail(2, Some("right_ear"), None, None),
            detail(3, Some("left_eye"), None, None),
            detail(4, None, None, None),
        ];
        let once = sort_details(&input);
        let twice = sort_details(&once);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_empty_details_defaults() {
        let mut aggregator = ScanResultAggregator::new();
        let r = result(vec![], None);
        let view = aggregator.view(&session(vec![]), Some(&r));

        assert_eq!(view.active_area, None);
        assert_eq!(view.summary.abnormal_count, 0);
        assert_eq!(view.summary.average_confidence, 0.0);
        assert_eq!(view.summary.average_percent, 0.0);
        assert!(view.details.is_empty());
    }

    #[test]
    fn test_absent_result_defaults() {
        let mut aggregator = ScanResultAggregator::new();
        let view = aggregator.view(&session(vec![]), None);

        assert_eq!(view.active_area, None);
        assert_eq!(view.summary.remark, PENDING_REMARK);
        assert_eq!(view.hero_image, FALLBACK_HERO_IMAGE);
    }

    #[test]
    fn test_average_skips_missing_scores() {
        let r = result(
            vec![
                detail(1, Some("left_eye"), Some(0.8), None),
                detail(2, Some("right_eye"), Some(0.6), None),
                detail(3, Some("mouth"), None, None),
            ],
            None,
        );
        let summary = compute_summary(Some(&r));
        assert!((summary.average_confidence - 0.7).abs() < 1e-9);
        assert_eq!(summary.average_percent, 70.0);
    }

    #[test]
    fn test_average_percent_rounds_to_two_decimals() {
        let r = result(
            vec![
                detail(1, Some("left_eye"), Some(0.12345), None),
                detail(2, Some("right_eye"), Some(0.5), None),
            ],
            None,
        );
        // mean 0.311725
        assert_eq!(compute_summary(Some(&r)).average_percent, 31.17);
        assert_eq!(to_percent(0.9), 90.0);
    }

    #[test]
    fn test_abnormal_count_is_case_insensitive() {
        let r = result(
            vec![
                detail(1, Some("left_eye"), None, Some("abnormal")),
                detail(2, Some("right_eye"), None, Some("Abnormal")),
                detail(3, Some("mouth"), None, Some("normal")),
                detail(4, Some("left_ear"), None, None),
                detail(5, Some("right_ear"), None, Some("pending")),
            ],
            None,
        );
        assert_eq!(compute_summary(Some(&r)).abnormal_count, 2);
    }

    #[test]
    fn test_remark_fallback() {
        assert_eq!(compute_summary(Some(&result(vec![], Some("")))).remark, PENDING_REMARK);
        assert_eq!(compute_summary(Some(&result(vec![], None))).remark, PENDING_REMARK);
        assert_eq!(
            compute_summary(Some(&result(vec![], Some("Looks healthy")))).remark,
            "Looks healthy"
        );
    }

    #[test]
    fn test_hero_image_chain() {
        let s = session(vec![ScanImage {
            id: 1,
            img_original_url: Some("a.jpg".to_string()),
            img_roi_url: None,
            img_remove_bg_url: None,
        }]);
        let r = result(vec![], None);
        assert_eq!(select_hero_image(&s, Some(&r), FALLBACK_HERO_IMAGE), "a.jpg");

        let s = session(vec![ScanImage {
            id: 1,
            img_original_url: Some("a.jpg".to_string()),
            img_roi_url: Some("roi.jpg".to_string()),
            img_remove_bg_url: None,
        }]);
        assert_eq!(select_hero_image(&s, None, FALLBACK_HERO_IMAGE), "roi.jpg");

        let mut with_landmark = result(vec![], None);
        with_landmark.img_landmark_url = Some("landmark.jpg".to_string());
        assert_eq!(
            select_hero_image(&s, Some(&with_landmark), FALLBACK_HERO_IMAGE),
            "landmark.jpg"
        );
    }

    #[test]
    fn test_hero_image_skips_empty_strings() {
        let s = session(vec![ScanImage {
            id: 1,
            img_original_url: Some("a.jpg".to_string()),
            img_roi_url: Some(String::new()),
            img_remove_bg_url: None,
        }]);
        let mut r = result(vec![], None);
        r.img_landmark_url = Some(String::new());
        assert_eq!(select_hero_image(&s, Some(&r), FALLBACK_HERO_IMAGE), "a.jpg");
    }

    #[test]
    fn test_hero_image_fallback() {
        let s = session(vec![ScanImage::default()]);
        assert_eq!(select_hero_image(&s, None, FALLBACK_HERO_IMAGE), FALLBACK_HERO_IMAGE);

        let aggregator = ScanResultAggregator::new().with_fallback_image("/img/none.png");
        assert_eq!(aggregator.hero_image(&session(vec![]), None), "/img/none.png");
    }

    #[test]
    fn test_active_area_defaults_to_first_sorted() {
        let mut aggregator = ScanResultAggregator::new();
        let r = result(
            vec![
                detail(1, Some("mouth"), None, None),
                detail(2, Some("right_eye"), None, None),
            ],
            None,
        );
        let view = aggregator.view(&session(vec![]), Some(&r));
        assert_eq!(view.active_area, Some(AreaKey::RightEye));
        assert_eq!(view.active_detail().map(|d| d.detail.id), Some(2));
    }

    #[test]
    fn test_set_active_area_is_idempotent() {
        let mut aggregator = ScanResultAggregator::new();
        assert!(aggregator.set_active_area(AreaKey::Mouth));
        assert!(!aggregator.set_active_area(AreaKey::Mouth));

        let r = result(
            vec![
                detail(1, Some("left_eye"), None, None),
                detail(2, Some("mouth"), None, None),
            ],
            None,
        );
        let view = aggregator.view(&session(vec![]), Some(&r));
        assert_eq!(view.active_area, Some(AreaKey::Mouth));
    }

    #[test]
    fn test_active_area_not_present_resets_to_first() {
        let mut aggregator = ScanResultAggregator::new();
        aggregator.set_active_area(AreaKey::from("tail"));

        let r = result(
            vec![
                detail(1, Some("left_ear"), None, None),
                detail(2, Some("right_eye"), None, None),
            ],
            None,
        );
        let sorted = aggregator.details(Some(&r));
        assert_eq!(aggregator.active_area(&sorted), Some(&AreaKey::RightEye));
        assert_eq!(aggregator.sync_active_area(&sorted), Some(&AreaKey::RightEye));

        // result changes underneath the selection
        let empty = result(vec![], None);
        let view = aggregator.view(&session(vec![]), Some(&empty));
        assert_eq!(view.active_area, None);
    }

    #[test]
    fn test_view_annotates_details() {
        let mut aggregator = ScanResultAggregator::new();
        let r = result(
            vec![
                detail(1, Some("left_eye"), Some(0.915), Some("abnormal")),
                detail(2, Some("tail"), None, None),
            ],
            Some("Periksa ke dokter"),
        );
        let view = aggregator.view(&session(vec![]), Some(&r));

        assert_eq!(view.details[0].area_label, "Mata Kiri");
        assert!(view.details[0].is_abnormal);
        assert_eq!(view.details[0].confidence_percent, Some(91.5));
        assert!(view.details[0].is_active);
        assert_eq!(view.details[1].area_label, "tail");
        assert!(!view.details[1].is_active);
        assert_eq!(view.summary.remark, "Periksa ke dokter");
    }

    #[test]
    fn test_only_first_detail_of_active_area_is_marked() {
        let mut aggregator = ScanResultAggregator::new();
        let r = result(
            vec![
                detail(1, Some("left_eye"), Some(0.6), None),
                detail(2, Some("left_eye"), Some(0.8), None),
                detail(3, Some("mouth"), None, None),
            ],
            None,
        );
        let view = aggregator.view(&session(vec![]), Some(&r));

        let flags: Vec<bool> = view.details.iter().map(|d| d.is_active).collect();
        assert_eq!(flags, vec![true, false, false]);
        assert_eq!(view.active_detail().map(|d| d.detail.id), Some(1));
    }

    #[test]
    fn test_set_active_area_reports_stored_key_change() {
        let mut aggregator = ScanResultAggregator::new();
        let r = result(vec![detail(1, Some("left_eye"), None, None)], None);
        let sorted = aggregator.details(Some(&r));
        assert_eq!(aggregator.active_area(&sorted), Some(&AreaKey::LeftEye));

        // effective area unchanged, stored key goes from none to left_eye
        assert!(aggregator.set_active_area(AreaKey::LeftEye));
        assert_eq!(aggregator.active_area(&sorted), Some(&AreaKey::LeftEye));
        assert!(!aggregator.set_active_area(AreaKey::LeftEye));
    }
}
