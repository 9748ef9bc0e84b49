// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Display order and metadata of the scanned areas

use serde::Serialize;

use crate::models::AreaKey;

/// Display metadata for a known area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AreaMeta {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// Known areas in display order. Position in this table is the sort rank.
pub static AREAS: [AreaMeta; 5] = [
    AreaMeta {
        key: "left_eye",
        label: "Mata Kiri",
        description: "Kondisi mata kiri: kemerahan, kotoran mata, dan kekeruhan",
    },
    AreaMeta {
        key: "right_eye",
        label: "Mata Kanan",
        description: "Kondisi mata kanan: kemerahan, kotoran mata, dan kekeruhan",
    },
    AreaMeta {
        key: "mouth",
        label: "Mulut",
        description: "Kondisi gusi dan gigi",
    },
    AreaMeta {
        key: "left_ear",
        label: "Telinga Kiri",
        description: "Kebersihan dan tanda infeksi telinga kiri",
    },
    AreaMeta {
        key: "right_ear",
        label: "Telinga Kanan",
        description: "Kebersihan dan tanda infeksi telinga kanan",
    },
];

/// Sort rank of an area; unknown or missing areas rank after every known one
pub fn rank(key: Option<&AreaKey>) -> usize {
    key.and_then(|k| AREAS.iter().position(|meta| meta.key == k.as_str()))
        .unwrap_or(AREAS.len())
}

/// Metadata lookup for an area key
pub fn meta(key: &AreaKey) -> Option<&'static AreaMeta> {
    AREAS.iter().find(|meta| meta.key == key.as_str())
}

/// Label to show for an area, falling back to the raw key
pub fn label(key: Option<&AreaKey>) -> String {
    match key {
        Some(k) => meta(k).map_or_else(|| k.as_str().to_string(), |m| m.label.to_string()),
        None => "-".to_string(),
    }
}
