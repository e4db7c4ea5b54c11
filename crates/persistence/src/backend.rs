// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening the `SQLite` store. Reads and writes live in `queries` and
//! `mutations`.

use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a writer waits on a locked file before giving up.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Where the store lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreLocation<'a> {
    /// A private shared-cache in-memory database with this name.
    Memory(&'a str),
    /// A database file.
    File(&'a str),
}

/// Opens the store and brings its schema up to date.
///
/// File-backed stores additionally switch to WAL journaling so readers do
/// not block the history writer.
///
/// # Errors
///
/// Returns an error if the connection, a migration or a `PRAGMA` fails.
pub fn open_store(location: StoreLocation<'_>) -> Result<SqliteConnection, PersistenceError> {
    let url: String = match location {
        StoreLocation::Memory(name) => format!("file:{name}?mode=memory&cache=shared"),
        StoreLocation::File(path) => path.to_string(),
    };
    info!(url = %url, "Opening key-value store");

    let mut conn: SqliteConnection = SqliteConnection::establish(&url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::Migration(e.to_string()))?;
    debug!(applied = applied.len(), "Store schema is current");

    if matches!(location, StoreLocation::File(_)) {
        // PRAGMA has no Diesel DSL.
        diesel::sql_query("PRAGMA journal_mode = WAL").execute(&mut conn)?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}")).execute(&mut conn)?;
    }

    Ok(conn)
}
