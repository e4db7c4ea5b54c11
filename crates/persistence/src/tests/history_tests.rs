// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::create_history_item;
use crate::{Persistence, SEARCH_HISTORY_KEY, SearchHistoryStore};
use adc_desk_domain::{HistoryItem, MAX_HISTORY_ITEMS};

fn reopen(store: SearchHistoryStore) -> SearchHistoryStore {
    // Reloading from the same connection proves the document was written.
    let mut store: SearchHistoryStore = store;
    store.load();
    store
}

#[test]
fn test_empty_storage_loads_empty_history() {
    let store: SearchHistoryStore = SearchHistoryStore::open(Persistence::new_in_memory().unwrap());

    assert!(store.items().is_empty());
}

#[test]
fn test_upsert_persists_across_reload() {
    let mut store: SearchHistoryStore =
        SearchHistoryStore::open(Persistence::new_in_memory().unwrap());

    store.upsert(create_history_item("IC-1", 1)).unwrap();
    store.upsert(create_history_item("IC-2", 2)).unwrap();
    let store: SearchHistoryStore = reopen(store);

    let ics: Vec<&str> = store.items().iter().map(|item| item.ic.as_str()).collect();
    assert_eq!(ics, vec!["IC-2", "IC-1"]);
}

#[test]
fn test_upsert_same_ic_replaces_in_place() {
    let mut store: SearchHistoryStore =
        SearchHistoryStore::open(Persistence::new_in_memory().unwrap());
    store.upsert(create_history_item("IC-1", 1)).unwrap();
    store.upsert(create_history_item("IC-2", 2)).unwrap();

    store.upsert(create_history_item("IC-1", 3)).unwrap();

    let items: &[HistoryItem] = store.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].ic, "IC-1");
    assert_eq!(items[1].timestamp, 3);
}

#[test]
fn test_history_is_capped() {
    let mut store: SearchHistoryStore =
        SearchHistoryStore::open(Persistence::new_in_memory().unwrap());

    for n in 0..12 {
        store
            .upsert(create_history_item(&format!("IC-{n}"), i64::from(n)))
            .unwrap();
    }
    let store: SearchHistoryStore = reopen(store);

    assert_eq!(store.items().len(), MAX_HISTORY_ITEMS);
    assert_eq!(store.items()[0].ic, "IC-11");
    assert!(store.items().iter().all(|item| item.ic != "IC-0"));
}

#[test]
fn test_clear_removes_document() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence.put("other", "kept").unwrap();
    let mut store: SearchHistoryStore = SearchHistoryStore::open(persistence);
    store.upsert(create_history_item("IC-1", 1)).unwrap();

    store.clear().unwrap();
    let store: SearchHistoryStore = reopen(store);

    assert!(store.items().is_empty());
}

#[test]
fn test_corrupt_document_loads_empty() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence.put(SEARCH_HISTORY_KEY, "{not json").unwrap();

    let store: SearchHistoryStore = SearchHistoryStore::open(persistence);

    assert!(store.items().is_empty());
}

#[test]
fn test_stored_duplicates_are_collapsed_on_load() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let items: Vec<HistoryItem> = vec![
        create_history_item("IC-1", 2),
        create_history_item("IC-1", 1),
    ];
    persistence
        .put(SEARCH_HISTORY_KEY, &serde_json::to_string(&items).unwrap())
        .unwrap();

    let store: SearchHistoryStore = SearchHistoryStore::open(persistence);

    assert_eq!(store.items().len(), 1);
    assert_eq!(store.items()[0].timestamp, 2);
}

#[test]
fn test_find_by_id() {
    let mut store: SearchHistoryStore =
        SearchHistoryStore::open(Persistence::new_in_memory().unwrap());
    store.upsert(create_history_item("IC-1", 42)).unwrap();

    assert_eq!(store.find("42").map(|item| item.ic.as_str()), Some("IC-1"));
    assert!(store.find("43").is_none());
}
