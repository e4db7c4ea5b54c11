// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the operator identifies the customer being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// National identity / tax number. Sent upstream as `nif`.
    #[default]
    Dni,
    /// Internal customer identifier. Sent upstream as `ic`.
    Ic,
}

impl SearchMode {
    /// The wire name of this mode (`dni` or `ic`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dni => "dni",
            Self::Ic => "ic",
        }
    }

    /// The upstream query parameter this mode maps to.
    #[must_use]
    pub const fn query_param(&self) -> &'static str {
        match self {
            Self::Dni => "nif",
            Self::Ic => "ic",
        }
    }

    /// Human-readable label used in operator-facing messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Dni => "DNI/NIF",
            Self::Ic => "IC",
        }
    }
}

impl FromStr for SearchMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dni" | "nif" => Ok(Self::Dni),
            "ic" => Ok(Self::Ic),
            _ => Err(DomainError::InvalidSearchMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated customer lookup.
///
/// The value is always trimmed, upper-cased and non-empty. Construct it
/// through [`SearchQuery::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    mode: SearchMode,
    value: String,
}

impl SearchQuery {
    /// Creates a search query, normalizing the raw operator input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptySearchValue` if the input is empty after
    /// trimming.
    pub fn new(mode: SearchMode, raw_value: &str) -> Result<Self, DomainError> {
        let value: String = crate::validation::normalize_search_value(raw_value);
        if value.is_empty() {
            return Err(DomainError::EmptySearchValue { mode });
        }
        Ok(Self { mode, value })
    }

    /// Returns the search mode.
    #[must_use]
    pub const fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Returns the normalized search value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// The detail tab currently shown for the selected contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActiveTab {
    /// Consumption readings for the selected contract.
    #[default]
    #[serde(rename = "consums")]
    Consumption,
    /// Invoices for the selected contract.
    #[serde(rename = "invoices")]
    Invoices,
}

impl ActiveTab {
    /// The wire name of this tab.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Consumption => "consums",
            Self::Invoices => "invoices",
        }
    }
}

impl FromStr for ActiveTab {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consums" | "consumption" => Ok(Self::Consumption),
            "invoices" => Ok(Self::Invoices),
            _ => Err(DomainError::InvalidTab(s.to_string())),
        }
    }
}

impl std::fmt::Display for ActiveTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
