// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// First day of the invoice window, `AAAAMMDD`.
pub const INVOICE_DATE_FROM: &str = "20200101";

/// Upstream status filter that selects invoices in every status.
pub const INVOICE_STATUS_ALL: &str = "TODOS";

/// Time zone the operators work in. Decides what "today" means.
pub const OPERATOR_TIME_ZONE: Tz = chrono_tz::Europe::Madrid;

/// Formats a calendar date as `AAAAMMDD`.
#[must_use]
pub fn format_compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// The calendar date of `now` in the given time zone, as `AAAAMMDD`.
#[must_use]
pub fn compact_date_in(now: DateTime<Utc>, tz: Tz) -> String {
    format_compact_date(now.with_timezone(&tz).date_naive())
}

/// Date window and status filter for an invoices lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceWindow {
    /// Window start, `AAAAMMDD`.
    pub date_from: String,
    /// Window end, `AAAAMMDD`.
    pub date_to: String,
    /// Status filter.
    pub status: String,
}

impl InvoiceWindow {
    /// The fixed window from [`INVOICE_DATE_FROM`] up to `now` in the
    /// operators' time zone, across all statuses.
    #[must_use]
    pub fn up_to(now: DateTime<Utc>) -> Self {
        Self {
            date_from: INVOICE_DATE_FROM.to_string(),
            date_to: compact_date_in(now, OPERATOR_TIME_ZONE),
            status: INVOICE_STATUS_ALL.to_string(),
        }
    }

    /// The window ending today.
    #[must_use]
    pub fn today() -> Self {
        Self::up_to(Utc::now())
    }
}
