//! Best score per level
//!
//! Persisted as a flat JSON object keyed by level index (`{"0": 500, ...}`).
//! A record only ever goes up, except through an explicit reset from the menu.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistenceError};
use crate::sim::Level;

/// Anything that remembers finished sessions
pub trait ScoreStore {
    /// Report a session's final score; only a new best is kept
    fn record_score(&mut self, level: Level, score: u64);
}

/// Best score for each level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelRecords {
    best: BTreeMap<String, u64>,
}

impl Default for LevelRecords {
    fn default() -> Self {
        Self {
            best: Level::ALL.iter().map(|l| (l.to_string(), 0)).collect(),
        }
    }
}

impl LevelRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score on `level`, 0 if never played
    pub fn best(&self, level: Level) -> u64 {
        self.best.get(&level.to_string()).copied().unwrap_or(0)
    }

    /// Keep `score` if it beats the current record. Returns true on a new record.
    pub fn record(&mut self, level: Level, score: u64) -> bool {
        let entry = self.best.entry(level.to_string()).or_insert(0);
        if score > *entry {
            *entry = score;
            true
        } else {
            false
        }
    }

    /// Zero one level's record
    pub fn reset(&mut self, level: Level) {
        self.best.insert(level.to_string(), 0);
    }
}

impl ScoreStore for LevelRecords {
    fn record_score(&mut self, level: Level, score: u64) {
        self.record(level, score);
    }
}

/// Records backed by a JSON file, saved on every new best
#[derive(Debug)]
pub struct RecordsFile {
    path: PathBuf,
    records: LevelRecords,
}

impl RecordsFile {
    /// Open the records file, starting fresh if it is missing or corrupt
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = persistence::load_or_default(&path);
        log::info!("Loaded level records from {}", path.display());
        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &LevelRecords {
        &self.records
    }

    pub fn save(&self) -> Result<(), PersistenceError> {
        persistence::save_json(&self.path, &self.records)
    }

    /// Zero one level's record and persist it
    pub fn reset(&mut self, level: Level) -> Result<(), PersistenceError> {
        self.records.reset(level);
        log::info!("Record for level {level} reset");
        self.save()
    }
}

impl ScoreStore for RecordsFile {
    fn record_score(&mut self, level: Level, score: u64) {
        if !self.records.record(level, score) {
            return;
        }
        log::info!("New record on level {level}: {score}");
        if let Err(e) = self.save() {
            log::warn!("Failed to save records: {e}");
        }
    }
}
