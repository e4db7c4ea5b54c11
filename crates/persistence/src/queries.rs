// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::KvEntry;
use crate::diesel_schema::kv_store;
use crate::error::PersistenceError;

/// Reads the value stored under `key`.
///
/// # Errors
///
/// Returns an error if the query fails. A missing key is `Ok(None)`.
pub fn get_value(conn: &mut SqliteConnection, key: &str) -> Result<Option<String>, PersistenceError> {
    debug!(key, "Reading key-value entry");

    let entry: Option<KvEntry> = kv_store::table
        .filter(kv_store::key.eq(key))
        .select(KvEntry::as_select())
        .first(conn)
        .optional()?;

    Ok(entry.map(|entry| entry.value))
}

/// Lists every stored key, sorted.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_keys(conn: &mut SqliteConnection) -> Result<Vec<String>, PersistenceError> {
    Ok(kv_store::table
        .select(kv_store::key)
        .order(kv_store::key.asc())
        .load::<String>(conn)?)
}
