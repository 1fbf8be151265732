//! High score and achievement records
//!
//! Read once at startup and written back whenever something worth keeping
//! happens (a new achievement, a finished run).

use serde::{Deserialize, Serialize};

use crate::sim::Achievement;

/// Persisted player records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Records {
    /// Best distance in metres
    pub high_score: u32,
    /// Unlocked achievement ids, in unlock order
    #[serde(default)]
    pub achievements: Vec<String>,
}

impl Records {
    /// Storage key for backends that need one
    pub const STORAGE_KEY: &'static str = "ebi_dash_records";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score beats the current best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.high_score
    }

    /// Record a finished run's score. Returns true on a new high score.
    pub fn submit_score(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.high_score = score;
        true
    }

    pub fn has(&self, achievement: Achievement) -> bool {
        self.achievements.iter().any(|id| id == achievement.as_str())
    }

    /// Returns true if the achievement was newly added
    pub fn unlock(&mut self, achievement: Achievement) -> bool {
        if self.has(achievement) {
            return false;
        }
        self.achievements.push(achievement.as_str().to_string());
        true
    }

    /// Known achievements (ids from newer versions are skipped)
    pub fn unlocked(&self) -> Vec<Achievement> {
        self.achievements
            .iter()
            .filter_map(|id| Achievement::from_str(id))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from a store, starting fresh when nothing usable is there
    pub fn load(store: &dyn RecordStore) -> Self {
        let Some(json) = store.read() else {
            log::info!("No records found, starting fresh");
            return Self::new();
        };
        match Self::from_json(&json) {
            Ok(records) => {
                log::info!(
                    "Loaded records (best {}m, {} achievements)",
                    records.high_score,
                    records.achievements.len()
                );
                records
            }
            Err(e) => {
                log::warn!("Failed to parse records, starting fresh: {e}");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn RecordStore) {
        match self.to_json() {
            Ok(json) => {
                store.write(&json);
                log::debug!("Records saved (best {}m)", self.high_score);
            }
            Err(e) => log::warn!("Failed to serialize records: {e}"),
        }
    }
}

/// Backing storage for [`Records`]
pub trait RecordStore {
    /// Raw saved blob, if any
    fn read(&self) -> Option<String>;
    fn write(&mut self, json: &str);
}

/// In-memory store (tests, headless runs)
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blob: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            blob: Some(json.into()),
            writes: 0,
        }
    }

    /// Number of writes so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl RecordStore for MemoryStore {
    fn read(&self) -> Option<String> {
        self.blob.clone()
    }

    fn write(&mut self, json: &str) {
        self.blob = Some(json.to_string());
        self.writes += 1;
    }
}

/// JSON file on disk (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl RecordStore for FileStore {
    fn read(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn write(&mut self, json: &str) {
        if let Err(e) = std::fs::write(&self.path, json) {
            log::warn!("Failed to write {}: {e}", self.path.display());
        }
    }
}
