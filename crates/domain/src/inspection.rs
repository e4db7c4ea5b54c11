// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::non_empty_field;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inspection history for one supply point.
///
/// Dates use the fixed-width `AAAAMMDD` format, so the descending order is a
/// plain lexicographic sort. The first date is the most recent inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InspectionDates(Vec<String>);

impl InspectionDates {
    /// Builds the sequence from raw review dates, dropping empty ones.
    #[must_use]
    pub fn from_dates<I, S>(dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dates: Vec<String> = dates
            .into_iter()
            .map(Into::into)
            .filter(|date| !date.trim().is_empty())
            .collect();
        dates.sort_by(|a, b| b.cmp(a));
        Self(dates)
    }

    /// Extracts the review dates of an inspection-reports response body.
    ///
    /// A missing or empty `value.inspectionReports` list yields an empty
    /// sequence rather than an error.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let reports: &[Value] = body
            .get("value")
            .and_then(|value| value.get("inspectionReports"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Self::from_dates(
            reports
                .iter()
                .filter_map(|report| non_empty_field(report, "reviewDate")),
        )
    }

    /// The most recent inspection date, if any.
    #[must_use]
    pub fn most_recent(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// All dates, most recent first.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of recorded inspections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no inspection has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Formats an `AAAAMMDD` date as `AAAA/MM/DD`.
///
/// Anything that is not exactly eight ASCII characters renders as
/// `No disponible`.
#[must_use]
pub fn format_inspection_date(date: &str) -> String {
    if date.len() != 8 || !date.is_ascii() {
        return String::from("No disponible");
    }
    format!("{}/{}/{}", &date[0..4], &date[4..6], &date[6..8])
}
