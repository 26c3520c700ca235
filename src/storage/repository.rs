use super::kv_store::KeyValueStore;
use crate::error::StorageError;
use crate::types::document::{AlignmentDocument, FontSize};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const SESSIONS_KEY: &str = "savedSessions";
pub const FONT_SIZE_KEY: &str = "translationFontSize";
pub const TITLE_MAX_CHARS: usize = 50;
pub const UNTITLED_SESSION: &str = "Untitled Session";

/// A named, independent copy of a document. `id` is the identity used for
/// load, delete and import; `title` only drives the update-or-copy prompt.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub data: AlignmentDocument,
}

/// Title for a document: track A's heading cut to `TITLE_MAX_CHARS`.
pub fn session_title(document: &AlignmentDocument) -> String {
    let title: String = document
        .track_a
        .heading
        .chars()
        .take(TITLE_MAX_CHARS)
        .collect();
    if title.is_empty() {
        UNTITLED_SESSION.to_string()
    } else {
        title
    }
}

pub fn display_date(now: &DateTime<Local>) -> String {
    now.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Serializes a collection for a backup file. An empty collection is refused.
pub fn export_collection(sessions: &[SavedSession]) -> Result<String, StorageError> {
    if sessions.is_empty() {
        return Err(StorageError::NothingToExport);
    }
    serde_json::to_string_pretty(sessions).map_err(StorageError::Serialize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    /// Overwrite the session that already carries this title.
    UpdateExisting,
    /// Always append a new record.
    NewCopy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Updated { id: i64, title: String },
    Created { id: i64, title: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: usize,
}

pub struct SessionRepository<S> {
    store: S,
}

impl<S: KeyValueStore> SessionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All saved sessions in insertion order.
    pub fn list(&self) -> Result<Vec<SavedSession>, StorageError> {
        match self.store.get(SESSIONS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                key: SESSIONS_KEY.to_string(),
                source,
            }),
        }
    }

    /// Sessions as the list screen shows them, newest first.
    pub fn list_newest_first(&self) -> Result<Vec<SavedSession>, StorageError> {
        let mut sessions = self.list()?;
        sessions.reverse();
        Ok(sessions)
    }

    /// Replaces the whole stored collection.
    pub fn save(&mut self, sessions: &[SavedSession]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(sessions).map_err(StorageError::Serialize)?;
        self.store.set(SESSIONS_KEY, &raw)
    }

    pub fn find_by_title(&self, title: &str) -> Result<Option<SavedSession>, StorageError> {
        Ok(self.list()?.into_iter().find(|s| s.title == title))
    }

    pub fn save_document(
        &mut self,
        document: &AlignmentDocument,
        choice: SaveChoice,
    ) -> Result<SaveOutcome, StorageError> {
        self.save_document_at(document, choice, Local::now())
    }

    /// Saves `document` under its derived title. With `UpdateExisting` and a
    /// title match, the match keeps its id and gets the new data and date;
    /// otherwise a new record is appended.
    pub fn save_document_at(
        &mut self,
        document: &AlignmentDocument,
        choice: SaveChoice,
        now: DateTime<Local>,
    ) -> Result<SaveOutcome, StorageError> {
        let title = session_title(document);
        let mut sessions = self.list()?;

        if choice == SaveChoice::UpdateExisting {
            if let Some(existing) = sessions.iter_mut().find(|s| s.title == title) {
                existing.data = document.clone();
                existing.date = display_date(&now);
                let id = existing.id;
                self.save(&sessions)?;
                log::info!("updated session {} ({:?})", id, title);
                return Ok(SaveOutcome::Updated { id, title });
            }
        }

        let id = next_id(&sessions, now.timestamp_millis());
        sessions.push(SavedSession {
            id,
            title: title.clone(),
            date: display_date(&now),
            data: document.clone(),
        });
        self.save(&sessions)?;
        log::info!("saved new session {} ({:?})", id, title);
        Ok(SaveOutcome::Created { id, title })
    }

    pub fn load(&self, id: i64) -> Result<Option<AlignmentDocument>, StorageError> {
        Ok(self.list()?.into_iter().find(|s| s.id == id).map(|s| s.data))
    }

    /// Removes the session with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: i64) -> Result<bool, StorageError> {
        let mut sessions = self.list()?;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return Ok(false);
        }
        self.save(&sessions)?;
        log::info!("deleted session {}", id);
        Ok(true)
    }

    /// The whole collection as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, StorageError> {
        export_collection(&self.list()?)
    }

    /// Merges a backup into the collection by id. Records whose id is already
    /// present are skipped. A malformed file imports nothing.
    pub fn import_json(&mut self, text: &str) -> Result<ImportReport, StorageError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(StorageError::ImportParse)?;
        if !value.is_array() {
            return Err(StorageError::ImportNotArray);
        }
        let imported: Vec<SavedSession> =
            serde_json::from_value(value).map_err(StorageError::ImportParse)?;

        let mut sessions = self.list()?;
        let mut known: HashSet<i64> = sessions.iter().map(|s| s.id).collect();
        let mut report = ImportReport::default();
        for session in imported {
            if known.insert(session.id) {
                sessions.push(session);
                report.added += 1;
            } else {
                report.skipped += 1;
            }
        }

        if report.added > 0 {
            self.save(&sessions)?;
        }
        log::info!(
            "import added {} session(s), skipped {}",
            report.added,
            report.skipped
        );
        Ok(report)
    }

    pub fn load_font_size(&self) -> Result<Option<FontSize>, StorageError> {
        let Some(raw) = self.store.get(FONT_SIZE_KEY)? else {
            return Ok(None);
        };
        match raw.trim().parse::<f32>() {
            Ok(value) => Ok(Some(FontSize::new(value))),
            Err(e) => {
                log::warn!("ignoring stored font size {:?}: {}", raw, e);
                Ok(None)
            }
        }
    }

    pub fn save_font_size(&mut self, size: FontSize) -> Result<(), StorageError> {
        self.store.set(FONT_SIZE_KEY, &size.value().to_string())
    }
}

/// Creation time in ms, bumped past the largest id on collision.
fn next_id(sessions: &[SavedSession], now_ms: i64) -> i64 {
    if sessions.iter().any(|s| s.id == now_ms) {
        sessions.iter().map(|s| s.id).max().unwrap_or(now_ms) + 1
    } else {
        now_ms
    }
}
