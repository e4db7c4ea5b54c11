// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use time::macros::format_description;

/// Prefix every generated correlation token starts with.
pub const CORRELATION_PREFIX: &str = "PTMNV0-";

/// Header carrying the correlation token between hops.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Builds the correlation token for a given instant.
///
/// Format: `PTMNV0-YYYYMMDDHHMMSS` in UTC.
#[must_use]
pub fn correlation_id_at(at: OffsetDateTime) -> String {
    let stamp: String = at
        .to_offset(time::UtcOffset::UTC)
        .format(format_description!(
            "[year][month][day][hour][minute][second]"
        ))
        .unwrap_or_else(|_| String::from("00000000000000"));
    format!("{CORRELATION_PREFIX}{stamp}")
}

/// Generates a correlation token for the current instant.
#[must_use]
pub fn generate_correlation_id() -> String {
    correlation_id_at(OffsetDateTime::now_utc())
}

/// Uses the caller-supplied token when present and non-blank, else
/// generates a fresh one.
#[must_use]
pub fn resolve_correlation_id(supplied: Option<&str>) -> String {
    supplied
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map_or_else(generate_correlation_id, str::to_string)
}
