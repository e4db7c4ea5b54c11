// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::SearchMode;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The search value was empty after normalization.
    EmptySearchValue {
        /// The search mode the value was entered for.
        mode: SearchMode,
    },
    /// The search mode is not one of the supported modes.
    InvalidSearchMode(String),
    /// The dashboard tab is not one of the supported tabs.
    InvalidTab(String),
    /// A resource request is missing one or more required parameters.
    MissingParameters {
        /// The resource path that was requested.
        resource: &'static str,
        /// The names of all parameters the resource requires.
        required: Vec<&'static str>,
    },
    /// The resource path is not one of the proxied resources.
    UnknownResource(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySearchValue { mode } => {
                write!(f, "Por favor, introduce un {} válido", mode.label())
            }
            Self::InvalidSearchMode(mode) => write!(f, "Invalid search mode: {mode}"),
            Self::InvalidTab(tab) => write!(f, "Invalid tab: {tab}"),
            Self::MissingParameters { resource, required } => {
                write!(
                    f,
                    "Missing parameters for '{resource}': requires {}",
                    required.join(", ")
                )
            }
            Self::UnknownResource(resource) => write!(f, "Unknown resource: {resource}"),
        }
    }
}

impl std::error::Error for DomainError {}
