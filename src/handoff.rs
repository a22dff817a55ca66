use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{MissingState, PublishError};
use crate::results::ResultsRecord;

pub const RESULTS_KEY: &str = "quizResults";

/// Total bytes of keys and values the storage accepts.
pub const STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// String key/value store that lives exactly as long as the running app.
#[derive(Debug, Default, Clone)]
pub struct SessionStorage {
    items: HashMap<String, String>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`. A write that would exceed the quota leaves the
    /// storage untouched.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), PublishError> {
        let (key, value) = (key.into(), value.into());
        let replaced = self.items.get(&key).map_or(0, |old| key.len() + old.len());
        let needed = self.used_bytes() - replaced + key.len() + value.len();
        if needed > STORAGE_QUOTA_BYTES {
            return Err(PublishError::QuotaExceeded {
                needed,
                quota: STORAGE_QUOTA_BYTES,
            });
        }
        self.items.insert(key, value);
        Ok(())
    }

    fn used_bytes(&self) -> usize {
        self.items.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.items.remove(key)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Typed handoff of the latest results record from the quiz to the review screen.
#[derive(Debug, Default, Clone)]
pub struct ResultsChannel {
    storage: SessionStorage,
}

impl ResultsChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage(storage: SessionStorage) -> Self {
        Self { storage }
    }

    pub fn publish(&mut self, record: &ResultsRecord) -> Result<(), PublishError> {
        let json = serde_json::to_string(record)?;
        self.storage.set(RESULTS_KEY, json)?;
        tracing::debug!(score = record.score, "results published");
        Ok(())
    }

    pub fn receive(&self) -> Result<ResultsRecord, MissingState> {
        let raw = self.storage.get(RESULTS_KEY).ok_or(MissingState::Absent)?;
        parse_record(raw)
    }

    pub fn clear(&mut self) {
        self.storage.remove(RESULTS_KEY);
    }

    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }
}

fn parse_record(raw: &str) -> Result<ResultsRecord, MissingState> {
    serde_json::from_str(raw).map_err(|e| MissingState::Corrupt(e.to_string()))
}

/// Read a results record saved as JSON. Unreadable files count as missing state.
pub fn load_record_file<P: AsRef<Path>>(path: P) -> Result<ResultsRecord, MissingState> {
    let raw = match fs::read_to_string(path.as_ref()) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(MissingState::Absent),
        Err(e) => return Err(MissingState::Corrupt(e.to_string())),
    };
    parse_record(&raw)
}
