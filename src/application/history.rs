//! Generation history
//!
//! Keeps the most recent results as one JSON array in the key-value store,
//! newest first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::ports::{PersistenceBackend, PersistenceError};
use crate::domain::generation::FormFields;

/// Key holding the history array
pub const HISTORY_KEY: &str = "videoPromptHistory";

/// Maximum number of entries kept
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// A recorded generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub form_data: FormFields,
    pub vendor: String,
    #[serde(default)]
    pub fallback: bool,
    pub generated_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        form_data: FormFields,
        vendor: impl Into<String>,
        fallback: bool,
    ) -> Self {
        let generated_at = Utc::now();
        let title = title.into();
        Self {
            id: format!("local_{}", generated_at.timestamp_millis()),
            title: if title.trim().is_empty() {
                format!("Prompt {}", generated_at.format("%Y-%m-%d"))
            } else {
                title
            },
            content: content.into(),
            category: category.into(),
            form_data,
            vendor: vendor.into(),
            fallback,
            generated_at,
        }
    }
}

/// History over an optional key-value backend
pub struct HistoryRecorder {
    backend: Option<Arc<dyn PersistenceBackend>>,
    // Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl HistoryRecorder {
    pub fn new(backend: Option<Arc<dyn PersistenceBackend>>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// All entries, newest first. Unreadable data yields an empty list.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        let Some(backend) = &self.backend else {
            return Vec::new();
        };
        match backend.get(HISTORY_KEY).await {
            Ok(Some(blob)) => serde_json::from_str(&blob).unwrap_or_else(|e| {
                warn!(error = %e, "Corrupt history, ignoring");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read history");
                Vec::new()
            }
        }
    }

    /// Prepend an entry, dropping the oldest beyond the cap
    pub async fn record(&self, entry: HistoryEntry) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.list().await;
        // Ids are millisecond stamps; keep them unique within a burst
        let mut entry = entry;
        while entries.iter().any(|e| e.id == entry.id) {
            entry.id.push('_');
        }
        debug!(id = %entry.id, category = %entry.category, "Recording history entry");
        entries.insert(0, entry);
        entries.truncate(MAX_HISTORY_ENTRIES);
        self.write(&entries).await
    }

    /// Delete one entry. Returns whether it existed.
    pub async fn delete(&self, id: &str) -> Result<bool, PersistenceError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.list().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write(&entries).await?;
        Ok(true)
    }

    pub async fn clear(&self) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;
        match &self.backend {
            Some(backend) => backend.remove(HISTORY_KEY).await,
            None => Ok(()),
        }
    }

    async fn write(&self, entries: &[HistoryEntry]) -> Result<(), PersistenceError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };
        let blob =
            serde_json::to_string(entries).map_err(|e| PersistenceError::Encode(e.to_string()))?;
        backend.set(HISTORY_KEY, &blob).await
    }
}
