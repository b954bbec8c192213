//! Best-result table
//!
//! Tracks the deepest runs: level reached and seconds left on the clock
//! when the run ended. Persisted as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of records to keep
pub const MAX_RECORDS: usize = 10;

/// A single finished-run record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Level the run reached
    pub level: u32,
    /// Seconds remaining when the run ended
    pub seconds_left: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

impl RecordEntry {
    /// Ordering key: deeper level first, more time left breaking ties
    fn rank_key(&self) -> (u32, u32) {
        (self.level, self.seconds_left)
    }
}

/// The record table, sorted best-first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Records {
    pub entries: Vec<RecordEntry>,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a run qualifies for the table
    pub fn qualifies(&self, level: u32, seconds_left: u32) -> bool {
        if level == 0 {
            return false;
        }
        if self.entries.len() < MAX_RECORDS {
            return true;
        }
        self.entries
            .last()
            .map(|e| (level, seconds_left) > e.rank_key())
            .unwrap_or(true)
    }

    /// Insert a finished run, keeping the table sorted and trimmed.
    /// Returns the 1-indexed rank achieved, or `None` if it didn't
    /// qualify.
    pub fn add(&mut self, level: u32, seconds_left: u32, timestamp: u64) -> Option<usize> {
        if !self.qualifies(level, seconds_left) {
            return None;
        }

        let entry = RecordEntry {
            level,
            seconds_left,
            timestamp,
        };

        let pos = self
            .entries
            .iter()
            .position(|e| entry.rank_key() > e.rank_key());
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_RECORDS);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The deepest run on record, if any
    pub fn best(&self) -> Option<&RecordEntry> {
        self.entries.first()
    }

    /// Load the table from `path`, falling back to an empty one.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Records>(&json) {
                Ok(records) => {
                    log::info!("loaded {} records", records.entries.len());
                    records
                }
                Err(err) => {
                    log::warn!("record file {} is corrupt: {err}", path.display());
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("no records at {}, starting fresh", path.display());
                Self::new()
            }
        }
    }

    /// Save the table to `path`. Failures are logged, not fatal.
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    log::warn!("could not save records to {}: {err}", path.display());
                } else {
                    log::info!("records saved ({} entries)", self.entries.len());
                }
            }
            Err(err) => log::warn!("could not serialize records: {err}"),
        }
    }
}
