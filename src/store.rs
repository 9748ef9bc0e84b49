// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Append-only store of received scan payloads
//!
//! One JSON payload per line. A session may appear several times as the
//! pipeline moves it through its statuses; the last line wins.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::models::ScanPayload;
use crate::Result;

/// JSON-lines payload store
pub struct PayloadStore {
    path: PathBuf,
}

impl PayloadStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append a payload after checking it
    pub fn append(&self, payload: &ScanPayload) -> Result<()> {
        payload.validate()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(payload)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }

    /// Read every stored payload in insertion order
    pub fn read_all(&self) -> Result<Vec<ScanPayload>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut payloads = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(payload) => payloads.push(payload),
                Err(e) => {
                    tracing::warn!("Skipping malformed payload on line {}: {}", index + 1, e);
                }
            }
        }

        Ok(payloads)
    }

    /// Latest payload for a session.
    ///
    /// A line written without a session still matches through its result's
    /// `scan_id`, so callers see the missing session instead of a miss.
    pub fn find(&self, session_id: u64) -> Result<Option<ScanPayload>> {
        let payloads = self.read_all()?;
        Ok(payloads.into_iter().rev().find(|p| match &p.session {
            Some(session) => session.id == session_id,
            None => p.result.as_ref().is_some_and(|r| r.scan_id == session_id),
        }))
    }

    /// Latest payload per session, newest first
    pub fn latest(&self, count: usize) -> Result<Vec<ScanPayload>> {
        let payloads = self.read_all()?;
        let mut seen = HashSet::new();

        Ok(payloads
            .into_iter()
            .rev()
            .filter(|p| match &p.session {
                Some(session) => seen.insert(session.id),
                None => false,
            })
            .take(count)
            .collect())
    }

    /// Remove the store file
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
