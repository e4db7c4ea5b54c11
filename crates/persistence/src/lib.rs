// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the ADC support desk.
//!
//! Durable state is a small key-value table in `SQLite`, managed by Diesel
//! migrations. The only document stored today is the search history.
//!
//! ## Testing
//!
//! Tests run against shared in-memory databases. Each call to
//! [`Persistence::new_in_memory`] gets its own database, named from an
//! atomic counter.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod history;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

use backend::StoreLocation;
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

pub use error::PersistenceError;
pub use history::{SEARCH_HISTORY_KEY, SearchHistoryStore};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Key-value persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let name: String = format!("adc_desk_{db_id}");
        let conn: SqliteConnection = backend::open_store(StoreLocation::Memory(&name))?;

        Ok(Self { conn })
    }

    /// Opens the `SQLite` database file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path: &Path = path.as_ref();
        let path_str: &str = path
            .to_str()
            .ok_or_else(|| PersistenceError::InvalidPath(path.display().to_string()))?;
        let conn: SqliteConnection = backend::open_store(StoreLocation::File(path_str))?;

        Ok(Self { conn })
    }

    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&mut self, key: &str) -> Result<Option<String>, PersistenceError> {
        queries::get_value(&mut self.conn, key)
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn put(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        mutations::put_value(&mut self.conn, key, value)
    }

    /// Removes the value stored under `key`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&mut self, key: &str) -> Result<bool, PersistenceError> {
        mutations::delete_value(&mut self.conn, key)
    }

    /// Lists every stored key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn keys(&mut self) -> Result<Vec<String>, PersistenceError> {
        queries::list_keys(&mut self.conn)
    }
}
