use crate::domain::{DateKey, EntryLookup, EntrySummary, JournalError, LOAD_ENTRIES_FAILED};
use log::{debug, warn};
use std::collections::HashMap;

/// Client-side cache of the signed-in user's entries, keyed by date.
///
/// The only source of "which dates have entries". Replaced wholesale by
/// every successful load; a failed load keeps the previous collection.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: HashMap<DateKey, EntrySummary>,
    error: Option<String>,
    loaded: bool,
    issued: u64,
    applied: u64,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the sequence number for a new list request.
    pub fn begin_load(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Applies a list response. Responses older than one already applied
    /// are dropped; returns whether this one was applied.
    pub fn apply_load(&mut self, seq: u64, result: Result<Vec<EntrySummary>, JournalError>) -> bool {
        if seq <= self.applied {
            debug!("Dropping entry list #{seq}, #{} already applied", self.applied);
            return false;
        }
        self.applied = seq;

        match result {
            Ok(entries) => {
                debug!("Loaded {} entries", entries.len());
                self.entries = entries.into_iter().map(|e| (e.date, e)).collect();
                self.error = None;
                self.loaded = true;
            }
            Err(e) => {
                warn!("Could not load entries: {e}");
                self.error = Some(LOAD_ENTRIES_FAILED.to_string());
            }
        }
        true
    }

    pub fn has_entry(&self, key: &DateKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn find(&self, key: &DateKey) -> Option<&EntrySummary> {
        self.entries.get(key)
    }

    /// Entries newest first.
    pub fn entries(&self) -> Vec<&EntrySummary> {
        let mut entries: Vec<&EntrySummary> = self.entries.values().collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl EntryLookup for EntryStore {
    fn find(&self, key: &DateKey) -> Option<&EntrySummary> {
        self.entries.get(key)
    }
}
