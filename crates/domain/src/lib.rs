// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod calendar;
mod contract;
mod customer;
mod error;
mod history;
mod inspection;
mod resource;
mod types;
mod validation;

#[cfg(test)]
mod tests;

/// Placeholder rendered for missing contract fields.
pub const NOT_AVAILABLE: &str = "N/A";

pub use calendar::{
    INVOICE_DATE_FROM, INVOICE_STATUS_ALL, InvoiceWindow, OPERATOR_TIME_ZONE, compact_date_in,
    format_compact_date,
};
pub use contract::{Contract, GasType, contract_label, format_supply_address, project_contracts};
pub use customer::{CascadeBlock, CustomerSummary, contracts_cascade};
pub use error::DomainError;
pub use history::{HistoryItem, MAX_HISTORY_ITEMS, SearchHistory};
pub use inspection::{InspectionDates, format_inspection_date};
pub use resource::{DEFAULT_CUSTOMER_NIF, ResourceKind, ResourceQuery, encode_component};
pub use types::{ActiveTab, SearchMode, SearchQuery};
pub use validation::{non_empty_field, normalize_search_value};
