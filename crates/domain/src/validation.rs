// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::Value;

/// Normalizes operator input for a customer search.
///
/// Surrounding whitespace is removed and the value is upper-cased, so
/// `" 72430367d "` becomes `"72430367D"`.
#[must_use]
pub fn normalize_search_value(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Reads a non-empty string field from a JSON object.
///
/// Upstream payloads are loosely typed: a field may be absent, `null`, an
/// empty string, or occasionally a number. Numbers are rendered to strings;
/// everything else that is not a non-empty string is treated as absent.
#[must_use]
pub fn non_empty_field(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns `value` or the `N/A` placeholder when absent.
#[must_use]
pub fn or_not_available(value: Option<&str>) -> &str {
    value.unwrap_or(crate::NOT_AVAILABLE)
}
