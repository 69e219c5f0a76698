//! Durable conversation state store
//!
//! Owns the live chat-id → record map and the append-only reset history.
//! Both persist as JSON files rewritten wholesale on mutation, matching the
//! files the bot has always written. Persistence failures are never fatal:
//! the in-memory state stays authoritative and the error is logged.

use crate::state_machine::ConversationRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Reset snapshots kept; oldest entries are dropped at save time.
const HISTORY_CAP: usize = 1000;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// How a record ended up in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetType {
    Single,
    Bulk,
}

/// Immutable snapshot taken when a live record is reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub chat_id: String,
    pub reset_date: DateTime<Utc>,
    pub last_state: ConversationRecord,
    pub reset_type: ResetType,
}

/// Aggregate counters for the admin surface. `last_update` is the moment of
/// computation, not of the underlying data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_users: usize,
    pub human_mode_users: usize,
    pub active_users: usize,
    pub total_history_records: usize,
    pub last_update: DateTime<Utc>,
}

struct Paths {
    state: PathBuf,
    history: PathBuf,
}

#[derive(Default)]
struct Inner {
    live: HashMap<String, ConversationRecord>,
    history: Vec<HistoryEntry>,
}

/// Thread-safe store handle. Constructed once in `main` and injected; tests
/// use [`StateStore::in_memory`] for a backing-free double.
pub struct StateStore {
    inner: Mutex<Inner>,
    paths: Option<Paths>,
}

impl StateStore {
    /// Open the store against its two JSON files, loading whatever state
    /// already exists. Unreadable or corrupt files degrade to an empty
    /// in-memory state rather than failing startup.
    pub fn open(state_path: impl Into<PathBuf>, history_path: impl Into<PathBuf>) -> Self {
        let paths = Paths {
            state: state_path.into(),
            history: history_path.into(),
        };

        if let Some(dir) = paths.state.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                tracing::error!(dir = %dir.display(), error = %e, "Failed to create data directory");
            }
        }

        let live = match load_json::<HashMap<String, ConversationRecord>>(&paths.state) {
            Ok(live) => {
                tracing::info!(users = live.len(), "Conversation state loaded");
                live
            }
            Err(e) => {
                tracing::error!(path = %paths.state.display(), error = %e, "Failed to load state, starting empty");
                HashMap::new()
            }
        };
        let history = match load_json::<Vec<HistoryEntry>>(&paths.history) {
            Ok(history) => {
                tracing::info!(records = history.len(), "Conversation history loaded");
                history
            }
            Err(e) => {
                tracing::error!(path = %paths.history.display(), error = %e, "Failed to load history, starting empty");
                Vec::new()
            }
        };

        Self {
            inner: Mutex::new(Inner { live, history }),
            paths: Some(paths),
        }
    }

    /// A store with no file backing (tests and dry runs).
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            paths: None,
        }
    }

    /// Current record for a chat, if any.
    pub fn get(&self, chat_id: &str) -> Option<ConversationRecord> {
        self.inner.lock().unwrap().live.get(chat_id).cloned()
    }

    /// Whole-record write: stamps `lastUpdated` and rewrites the state file.
    pub fn set(&self, chat_id: &str, mut record: ConversationRecord) {
        record.last_updated = Utc::now();
        let mut inner = self.inner.lock().unwrap();
        inner.live.insert(chat_id.to_string(), record);
        self.save_state(&inner);
        tracing::debug!(chat_id = %chat_id, "Record updated");
    }

    /// Move one live record into history. Returns false (and writes no
    /// history entry) when the chat id is unknown.
    pub fn reset_one(&self, chat_id: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let Some(record) = inner.live.remove(chat_id) else {
            tracing::warn!(chat_id = %chat_id, "Reset requested for unknown chat");
            return false;
        };
        inner.history.push(HistoryEntry {
            chat_id: chat_id.to_string(),
            reset_date: Utc::now(),
            last_state: record,
            reset_type: ResetType::Single,
        });
        self.save_state(&inner);
        self.save_history(&mut inner);
        tracing::info!(chat_id = %chat_id, "Record reset into history");
        true
    }

    /// Move every live record into history. The live set is snapshotted
    /// under the lock, so records arriving concurrently for other chats are
    /// either fully in or fully out.
    pub fn reset_all(&self) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let drained: Vec<(String, ConversationRecord)> = inner.live.drain().collect();
        let count = drained.len();
        for (chat_id, record) in drained {
            inner.history.push(HistoryEntry {
                chat_id,
                reset_date: now,
                last_state: record,
                reset_type: ResetType::Bulk,
            });
        }
        self.save_state(&inner);
        self.save_history(&mut inner);
        tracing::info!(count, "All records reset into history");
        count
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.lock().unwrap();
        let human_mode_users = inner.live.values().filter(|r| r.is_human()).count();
        StoreStats {
            total_users: inner.live.len(),
            human_mode_users,
            active_users: inner.live.len() - human_mode_users,
            total_history_records: inner.history.len(),
            last_update: Utc::now(),
        }
    }

    /// Up to `limit` most recent history entries, most recent first.
    pub fn history(&self, limit: usize) -> Vec<HistoryEntry> {
        let inner = self.inner.lock().unwrap();
        inner.history.iter().rev().take(limit).cloned().collect()
    }

    /// Snapshot of every live record, for the admin surface.
    pub fn all_states(&self) -> HashMap<String, ConversationRecord> {
        self.inner.lock().unwrap().live.clone()
    }

    fn save_state(&self, inner: &Inner) {
        let Some(paths) = &self.paths else { return };
        if let Err(e) = write_json(&paths.state, &inner.live) {
            tracing::error!(path = %paths.state.display(), error = %e, "Failed to save state");
        }
    }

    fn save_history(&self, inner: &mut Inner) {
        let Some(paths) = &self.paths else {
            // Still enforce the cap so an in-memory store behaves the same.
            trim_history(&mut inner.history);
            return;
        };
        trim_history(&mut inner.history);
        if let Err(e) = write_json(&paths.history, &inner.history) {
            tracing::error!(path = %paths.history.display(), error = %e, "Failed to save history");
        }
    }
}

fn trim_history(history: &mut Vec<HistoryEntry>) {
    if history.len() > HISTORY_CAP {
        let excess = history.len() - HISTORY_CAP;
        history.drain(..excess);
    }
}

fn load_json<T: serde::de::DeserializeOwned + Default>(path: &Path) -> StoreResult<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
