// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::NewKvEntry;
use crate::diesel_schema::kv_store;
use crate::error::PersistenceError;

/// Stores `value` under `key`, replacing any previous value.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn put_value(conn: &mut SqliteConnection, key: &str, value: &str) -> Result<(), PersistenceError> {
    debug!(key, bytes = value.len(), "Writing key-value entry");

    diesel::replace_into(kv_store::table)
        .values(&NewKvEntry { key, value })
        .execute(conn)?;

    Ok(())
}

/// Removes the value stored under `key`.
///
/// Returns whether a value was removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_value(conn: &mut SqliteConnection, key: &str) -> Result<bool, PersistenceError> {
    let removed: usize = diesel::delete(kv_store::table.filter(kv_store::key.eq(key))).execute(conn)?;
    debug!(key, removed, "Deleted key-value entry");
    Ok(removed > 0)
}
