// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Failures of the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The database could not be opened.
    #[error("Cannot open database: {0}")]
    Connection(String),
    /// The schema could not be brought up to date.
    #[error("Schema migration failed: {0}")]
    Migration(String),
    /// A statement failed.
    #[error("Storage query failed: {0}")]
    Query(String),
    /// A stored document could not be encoded or decoded.
    #[error("Stored document is not valid JSON: {0}")]
    Encoding(String),
    /// The database path is not valid UTF-8.
    #[error("Invalid database path: {0}")]
    InvalidPath(String),
    /// A row the caller relied on is missing.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound(String::from("kv_store row")),
            other => Self::Query(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::Connection(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}
