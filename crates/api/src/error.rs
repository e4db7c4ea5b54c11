// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::auth::PasswordError;
use adc_desk::CoreError;
use adc_desk_domain::DomainError;
use adc_desk_persistence::PersistenceError;

/// Error label of a request missing required parameters.
pub const MISSING_PARAMETERS_ERROR: &str = "Parámetros incompletos";

/// Error label of a request that failed inside the server.
pub const INTERNAL_SERVER_ERROR: &str = "Error interno del servidor";

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A proxied resource was requested without its required parameters.
    MissingParameters {
        /// Which parameters the resource requires.
        details: String,
    },
    /// The access key was rejected.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller may not perform searches.
    Unauthorized {
        /// Why access was refused.
        reason: String,
    },
    /// The network check has not resolved yet.
    AccessPending {
        /// A human-readable description.
        message: String,
    },
    /// The server is missing required configuration.
    Configuration {
        /// What is missing.
        message: String,
    },
    /// The upstream answered with a non-2xx status.
    Upstream {
        /// The upstream status, passed through.
        status: u16,
        /// `Error <status>: <reason>`.
        error: String,
        /// The upstream body text.
        details: String,
    },
    /// The upstream could not be reached or answered with an unreadable body.
    Transport {
        /// Failure detail.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::MissingParameters { details } => {
                write!(f, "{MISSING_PARAMETERS_ERROR}: {details}")
            }
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { reason } => write!(f, "Unauthorized: {reason}"),
            Self::AccessPending { message } => write!(f, "Access pending: {message}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Upstream { error, details, .. } => write!(f, "{error} - {details}"),
            Self::Transport { message } => write!(f, "Upstream request failed: {message}"),
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// The operator-facing message of this error, without the technical
    /// prefix used by `Display`.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { message, .. }
            | Self::Unauthorized { reason: message }
            | Self::AccessPending { message }
            | Self::Configuration { message }
            | Self::ResourceNotFound { message, .. } => message.clone(),
            Self::AuthenticationFailed { .. } => String::from("Credenciales inválidas"),
            Self::MissingParameters { .. } => String::from(MISSING_PARAMETERS_ERROR),
            Self::Upstream { error, .. } => error.clone(),
            Self::Transport { .. } | Self::Internal { .. } => String::from(INTERNAL_SERVER_ERROR),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::NotConfigured => Self::Configuration {
                message: err.to_string(),
            },
            PasswordError::Empty => Self::InvalidInput {
                field: String::from("password"),
                message: err.to_string(),
            },
            PasswordError::Mismatch => Self::AuthenticationFailed {
                reason: err.to_string(),
            },
            PasswordError::Hashing(message) => Self::Internal { message },
        }
    }
}

/// Describes the required parameters of a resource in operator language.
///
/// `["ic", "cups"]` becomes `Se requieren los parámetros ic y cups`. The
/// conjunction is `e` before a word starting with an `i` sound.
#[must_use]
pub fn required_parameters_details(required: &[&str]) -> String {
    match required {
        [] => String::from("No se requieren parámetros"),
        [single] => format!("Se requiere el parámetro {single}"),
        [init @ .., last] => {
            let conjunction: &str = if last.to_lowercase().starts_with('i') {
                "e"
            } else {
                "y"
            };
            format!(
                "Se requieren los parámetros {} {conjunction} {last}",
                init.join(", ")
            )
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::EmptySearchValue { .. } => ApiError::InvalidInput {
            field: String::from("value"),
            message: err.to_string(),
        },
        DomainError::InvalidSearchMode(_) => ApiError::InvalidInput {
            field: String::from("mode"),
            message: err.to_string(),
        },
        DomainError::InvalidTab(_) => ApiError::InvalidInput {
            field: String::from("tab"),
            message: err.to_string(),
        },
        DomainError::MissingParameters { required, .. } => ApiError::MissingParameters {
            details: required_parameters_details(&required),
        },
        DomainError::UnknownResource(resource) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message: format!("Resource '{resource}' does not exist"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Validation(domain_err) => translate_domain_error(domain_err),
        CoreError::AccessPending => ApiError::AccessPending {
            message: err.to_string(),
        },
        CoreError::AccessDenied => ApiError::Unauthorized {
            reason: err.to_string(),
        },
        CoreError::UnknownContract(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Contract"),
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        _ => ApiError::Internal {
            message: err.to_string(),
        },
    }
}
