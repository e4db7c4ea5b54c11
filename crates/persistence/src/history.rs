// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use adc_desk_domain::{HistoryItem, SearchHistory};
use tracing::{info, warn};

use crate::Persistence;
use crate::error::PersistenceError;

/// Key the search history document is stored under.
pub const SEARCH_HISTORY_KEY: &str = "nortegas_search_history";

/// The search history, cached in memory and written through to storage.
///
/// Every change rewrites the whole document. The in-memory copy only
/// changes once the write succeeded.
#[derive(Debug)]
pub struct SearchHistoryStore {
    persistence: Persistence,
    history: SearchHistory,
}

impl SearchHistoryStore {
    /// Opens the store and rehydrates the history from storage.
    #[must_use]
    pub fn open(persistence: Persistence) -> Self {
        let mut store: Self = Self {
            persistence,
            history: SearchHistory::new(),
        };
        store.load();
        store
    }

    /// Reloads the history from storage.
    ///
    /// A missing document, unreadable storage or corrupt JSON all yield an
    /// empty history. Failures are logged, never returned.
    pub fn load(&mut self) -> &SearchHistory {
        self.history = match self.persistence.get(SEARCH_HISTORY_KEY) {
            Ok(Some(document)) => match serde_json::from_str::<Vec<HistoryItem>>(&document) {
                Ok(items) => SearchHistory::from_items(items),
                Err(e) => {
                    warn!(error = %e, "Stored search history is corrupt, starting empty");
                    SearchHistory::new()
                }
            },
            Ok(None) => SearchHistory::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read search history, starting empty");
                SearchHistory::new()
            }
        };
        info!(items = self.history.len(), "Loaded search history");
        &self.history
    }

    /// Records a lookup, replacing the entry with the same `ic` in place or
    /// prepending a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be written.
    pub fn upsert(&mut self, item: HistoryItem) -> Result<(), PersistenceError> {
        let mut updated: SearchHistory = self.history.clone();
        updated.upsert(item);
        self.save(&updated)?;
        self.history = updated;
        Ok(())
    }

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be written.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.persistence.delete(SEARCH_HISTORY_KEY)?;
        self.history.clear();
        Ok(())
    }

    /// The remembered lookups, newest insertions first.
    #[must_use]
    pub fn items(&self) -> &[HistoryItem] {
        self.history.items()
    }

    /// Finds an entry by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&HistoryItem> {
        self.history.find(id)
    }

    fn save(&mut self, history: &SearchHistory) -> Result<(), PersistenceError> {
        let document: String = serde_json::to_string(history)?;
        self.persistence.put(SEARCH_HISTORY_KEY, &document)
    }
}
