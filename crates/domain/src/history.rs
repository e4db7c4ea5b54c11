// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::customer::CustomerSummary;
use crate::types::{SearchMode, SearchQuery};
use serde::{Deserialize, Serialize};

/// Maximum number of remembered lookups.
pub const MAX_HISTORY_ITEMS: usize = 10;

/// A previously successful customer lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Identifier derived from the creation timestamp. Unique within the
    /// history and kept when the entry is refreshed.
    pub id: String,
    /// Internal customer identifier. Unique within the history.
    pub ic: String,
    /// Tax identifier (`cif` or `nif`).
    pub cif: String,
    /// Business or first name.
    pub business_name: String,
    /// First surname, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name1: Option<String>,
    /// The mode the lookup was made with.
    pub search_mode: SearchMode,
    /// The normalized value the lookup was made with.
    pub search_value: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl HistoryItem {
    /// Builds a history item from a successful lookup.
    ///
    /// Returns `None` unless the customer has an `ic`, a tax identifier and
    /// a business name.
    #[must_use]
    pub fn from_lookup(
        summary: &CustomerSummary,
        query: &SearchQuery,
        timestamp_ms: i64,
    ) -> Option<Self> {
        if !summary.is_history_worthy() {
            return None;
        }
        Some(Self {
            id: timestamp_ms.to_string(),
            ic: summary.ic.clone()?,
            cif: summary.cif.clone()?,
            business_name: summary.business_name.clone()?,
            last_name1: summary.last_name1.clone(),
            search_mode: query.mode(),
            search_value: query.value().to_string(),
            timestamp: timestamp_ms,
        })
    }
}

/// Ordered list of remembered lookups, newest insertions first.
///
/// Invariants: at most [`MAX_HISTORY_ITEMS`] entries, and no two entries share
/// an `ic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SearchHistory {
    items: Vec<HistoryItem>,
}

impl SearchHistory {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Restores a history from previously stored items.
    ///
    /// Stored data is not trusted: duplicates by `ic` keep their first
    /// occurrence and the list is cut to the maximum length.
    #[must_use]
    pub fn from_items(items: Vec<HistoryItem>) -> Self {
        let mut restored: Self = Self::new();
        for mut item in items {
            if restored.items.len() == MAX_HISTORY_ITEMS {
                break;
            }
            if restored.items.iter().any(|existing| existing.ic == item.ic) {
                continue;
            }
            item.id = restored.unique_id(&item.id);
            restored.items.push(item);
        }
        restored
    }

    /// Inserts or replaces an item.
    ///
    /// An item whose `ic` already exists replaces that entry in place,
    /// keeping its position and id. Otherwise the item is prepended, with a
    /// `-<n>` suffix on its id if another entry already holds it, and the
    /// list is cut to the maximum length.
    pub fn upsert(&mut self, mut item: HistoryItem) {
        if let Some(existing) = self.items.iter_mut().find(|existing| existing.ic == item.ic) {
            item.id = std::mem::take(&mut existing.id);
            *existing = item;
            return;
        }
        item.id = self.unique_id(&item.id);
        self.items.insert(0, item);
        self.items.truncate(MAX_HISTORY_ITEMS);
    }

    fn unique_id(&self, base: &str) -> String {
        let taken = |id: &str| self.items.iter().any(|item| item.id == id);
        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|n: usize| format!("{base}-{n}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// All items in display order.
    #[must_use]
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
