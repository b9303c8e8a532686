//! Citation history
//!
//! A most-recent-first list of past lookups, at most one entry per DOI and at
//! most `max_items` entries. Hydrated once from a [`HistoryStorage`] backend
//! and written through on every mutation.

pub mod storage;

pub use storage::*;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::HistoryConfig;
use crate::error::HistoryError;
use crate::fetch::CitationResult;
use crate::formatter::CitationFormats;
use crate::metadata::RawMetadataRecord;
use crate::normalize::{
    clean_html_str, format_authors, format_date, get_journal_name, plain_title,
    HISTORY_MAX_AUTHORS,
};

/// One remembered lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub doi: String,
    /// Plain text, markup stripped
    pub title: String,
    pub authors: String,
    pub journal: String,
    pub date: String,
    pub citations: CitationFormats,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn from_record(
        record: &RawMetadataRecord,
        citations: &CitationFormats,
        max_authors: usize,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            doi: record.doi(),
            title: plain_title(record),
            authors: format_authors(record.authors(), max_authors),
            journal: clean_html_str(&get_journal_name(record)),
            date: format_date(&record.date_parts()),
            citations: citations.clone(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

pub struct HistoryStore<S: HistoryStorage> {
    storage: S,
    key: String,
    max_items: usize,
    max_authors: usize,
    entries: Vec<HistoryEntry>,
}

impl<S: HistoryStorage> HistoryStore<S> {
    /// Open the store and hydrate from `storage`.
    ///
    /// Unreadable or malformed content yields an empty history.
    pub fn open(storage: S, config: &HistoryConfig) -> Self {
        let key = config.storage_key.clone();
        let mut entries = match storage.load(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Error loading citation history, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Citation history unavailable, starting empty");
                Vec::new()
            }
        };

        // The newest entry always fits
        let max_items = config.max_items.max(1);

        // Persisted content may predate a smaller limit
        let mut seen = std::collections::HashSet::new();
        entries.retain(|e| seen.insert(e.doi.clone()));
        entries.truncate(max_items);
        debug!(count = entries.len(), "Citation history loaded");

        Self {
            storage,
            key,
            max_items,
            max_authors: HISTORY_MAX_AUTHORS,
            entries,
        }
    }

    /// Override the author limit used for new entries
    pub fn with_max_authors(mut self, max_authors: usize) -> Self {
        self.max_authors = max_authors;
        self
    }

    /// Upsert to front: drop any entry with the same DOI, prepend, cap.
    ///
    /// The in-memory list is updated even when persisting fails.
    pub fn save(
        &mut self,
        record: &RawMetadataRecord,
        citations: &CitationFormats,
    ) -> Result<&HistoryEntry, HistoryError> {
        let entry = HistoryEntry::from_record(record, citations, self.max_authors);
        self.insert(entry)
    }

    pub fn save_result(&mut self, result: &CitationResult) -> Result<&HistoryEntry, HistoryError> {
        self.save(&result.record, &result.citations)
    }

    /// Insert a prebuilt entry with the same upsert rules as [`save`](Self::save).
    pub fn insert(&mut self, entry: HistoryEntry) -> Result<&HistoryEntry, HistoryError> {
        self.entries.retain(|e| e.doi != entry.doi);
        info!(doi = %entry.doi, "Saved to citation history");
        self.entries.insert(0, entry);
        if self.entries.len() > self.max_items {
            let evicted = self.entries.len() - self.max_items;
            self.entries.truncate(self.max_items);
            debug!(evicted, "Evicted oldest history entries");
        }
        self.persist()?;
        Ok(&self.entries[0])
    }

    /// Remove every entry
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.entries.clear();
        info!("Citation history cleared");
        self.persist()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn find_by_doi(&self, doi: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.doi == doi)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<(), HistoryError> {
        let json = serde_json::to_string(&self.entries)?;
        self.storage.store(&self.key, &json)?;
        Ok(())
    }
}
