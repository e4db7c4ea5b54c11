// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The deployment counter kept in `version.json`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Version reported when no counter file exists.
pub const DEFAULT_VERSION: u64 = 1;

/// Contents of the counter file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFile {
    /// Deployment counter.
    pub version: u64,
}

/// Reads the counter. A missing, unreadable or zero counter reads as
/// [`DEFAULT_VERSION`].
#[must_use]
pub fn read_version(path: &Path) -> u64 {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return DEFAULT_VERSION;
    };
    match serde_json::from_str::<VersionFile>(&contents) {
        Ok(file) if file.version > 0 => file.version,
        Ok(_) => DEFAULT_VERSION,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse version file");
            DEFAULT_VERSION
        }
    }
}

/// Resolves the version served for the lifetime of this process.
///
/// In production the counter is incremented and written back once. If the
/// write fails the current value is served.
#[must_use]
pub fn resolve_build_version(path: &Path, production: bool) -> u64 {
    let current: u64 = read_version(path);
    if !production {
        return current;
    }

    let next: u64 = current.saturating_add(1);
    let written: Result<(), String> = serde_json::to_string(&VersionFile { version: next })
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));

    match written {
        Ok(()) => {
            info!(version = next, "Deployment version incremented");
            next
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to write version file");
            current
        }
    }
}
