// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Access gating: the network origin check, the shared access key and the
//! per-session credential.

use adc_desk::Trigger;
use adc_desk_activity::generate_correlation_id;
use serde::Serialize;
use std::net::IpAddr;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Prefix of the corporate network addresses.
pub const DEFAULT_CORPORATE_PREFIX: &str = "212.142.";

/// Origin used when the caller address cannot be determined.
pub const PREVIEW_ORIGIN: &str = "0.0.0.0";

/// Result of checking a caller origin against the corporate network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkOriginCheck {
    /// The checked origin.
    pub ip: String,
    /// Whether the origin may search without the access key.
    pub is_authorized: bool,
    /// Whether access was granted only because no origin was available.
    #[serde(skip)]
    pub preview: bool,
    /// Operator-facing description of the result.
    pub message: String,
    /// Correlation token of the check.
    pub correlation_id: String,
}

impl NetworkOriginCheck {
    /// The trigger that feeds this result into a dashboard session.
    #[must_use]
    pub fn to_trigger(&self) -> Trigger {
        Trigger::NetworkOriginResolved {
            origin: self.ip.clone(),
            authorized: self.is_authorized,
            preview: self.preview,
        }
    }
}

/// Decides whether a caller origin belongs to the corporate network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkGate {
    corporate_prefix: String,
}

impl Default for NetworkGate {
    fn default() -> Self {
        Self::new(DEFAULT_CORPORATE_PREFIX)
    }
}

impl NetworkGate {
    /// Creates a gate for the given address prefix (for example `212.142.`).
    #[must_use]
    pub fn new(corporate_prefix: impl Into<String>) -> Self {
        Self {
            corporate_prefix: corporate_prefix.into(),
        }
    }

    /// The configured address prefix.
    #[must_use]
    pub fn corporate_prefix(&self) -> &str {
        &self.corporate_prefix
    }

    /// Checks an origin.
    ///
    /// The origin is authorized if it starts with the corporate prefix or is
    /// the preview sentinel.
    #[must_use]
    pub fn check(&self, origin: &str) -> NetworkOriginCheck {
        let correlation_id: String = generate_correlation_id();
        let preview: bool = origin == PREVIEW_ORIGIN;
        let is_authorized: bool = preview || origin.starts_with(&self.corporate_prefix);

        let message: String = if preview {
            String::from("IP autorizada (modo preview)")
        } else if is_authorized {
            String::from("IP autorizada")
        } else {
            format!(
                "Acceso restringido: Esta aplicación solo está disponible desde la red corporativa ({})",
                self.network_pattern()
            )
        };

        info!(
            ip = origin,
            is_authorized,
            correlation_id = %correlation_id,
            "Network origin checked"
        );

        NetworkOriginCheck {
            ip: origin.to_string(),
            is_authorized,
            preview,
            message,
            correlation_id,
        }
    }

    /// The corporate prefix written as a wildcard address (`212.142.*.*`).
    fn network_pattern(&self) -> String {
        let mut octets: Vec<&str> = self
            .corporate_prefix
            .trim_end_matches('.')
            .split('.')
            .filter(|octet| !octet.is_empty())
            .collect();
        while octets.len() < 4 {
            octets.push("*");
        }
        octets.join(".")
    }
}

/// Resolves the caller origin.
///
/// Uses the socket peer when known, else the first `x-forwarded-for` entry,
/// else the preview sentinel.
#[must_use]
pub fn resolve_origin(peer: Option<IpAddr>, forwarded_for: Option<&str>) -> String {
    if let Some(peer) = peer {
        return peer.to_string();
    }
    forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map_or_else(|| PREVIEW_ORIGIN.to_string(), str::to_string)
}

/// Errors raised while verifying the shared access key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// The server has no access key configured.
    #[error("La clave de acceso no está configurada en el servidor")]
    NotConfigured,
    /// The candidate was empty or whitespace.
    #[error("Se requiere una contraseña")]
    Empty,
    /// The candidate does not match the access key.
    #[error("Credenciales inválidas")]
    Mismatch,
    /// The access key could not be hashed or compared.
    #[error("Error al verificar credenciales: {0}")]
    Hashing(String),
}

/// Verifies candidates against the server-held access key.
///
/// Only a bcrypt hash of the key is kept after construction.
#[derive(Clone)]
pub struct PasswordVerifier {
    hash: Option<String>,
}

impl std::fmt::Debug for PasswordVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordVerifier")
            .field("configured", &self.hash.is_some())
            .finish()
    }
}

impl PasswordVerifier {
    /// Hashes the configured access key with the default bcrypt cost.
    ///
    /// A missing or blank key yields a verifier that rejects every
    /// candidate with `PasswordError::NotConfigured`.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::Hashing` if bcrypt fails.
    pub fn from_secret(secret: Option<&str>) -> Result<Self, PasswordError> {
        Self::with_cost(secret, bcrypt::DEFAULT_COST)
    }

    /// Hashes the configured access key with an explicit bcrypt cost.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::Hashing` if bcrypt fails.
    pub fn with_cost(secret: Option<&str>, cost: u32) -> Result<Self, PasswordError> {
        let hash: Option<String> = match secret.filter(|secret| !secret.trim().is_empty()) {
            Some(secret) => Some(
                bcrypt::hash(secret, cost)
                    .map_err(|e| PasswordError::Hashing(e.to_string()))?,
            ),
            None => None,
        };
        Ok(Self { hash })
    }

    /// Whether an access key is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.hash.is_some()
    }

    /// Verifies a candidate.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` without a key, `Empty` for a blank candidate
    /// and `Mismatch` when the candidate is wrong.
    pub fn verify(&self, candidate: &str) -> Result<(), PasswordError> {
        let hash: &str = self.hash.as_deref().ok_or(PasswordError::NotConfigured)?;
        if candidate.trim().is_empty() {
            return Err(PasswordError::Empty);
        }
        let matches: bool =
            bcrypt::verify(candidate, hash).map_err(|e| PasswordError::Hashing(e.to_string()))?;
        if matches {
            Ok(())
        } else {
            debug!("Access key mismatch");
            Err(PasswordError::Mismatch)
        }
    }
}

/// The access key latch of one dashboard session.
///
/// Once a key is accepted the session stays authenticated for its lifetime.
/// Only the masked key is kept, for logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCredential {
    masked_key: Option<String>,
}

impl SessionCredential {
    /// Creates an unauthenticated credential.
    #[must_use]
    pub const fn new() -> Self {
        Self { masked_key: None }
    }

    /// Latches the credential with a verified key.
    ///
    /// Returns `true` if this call latched it, `false` if it already was.
    pub fn accept(&mut self, key: &str) -> bool {
        if self.masked_key.is_some() {
            return false;
        }
        self.masked_key = Some(obfuscate(key));
        true
    }

    /// The accepted key with all but its first two and last two characters
    /// masked.
    #[must_use]
    pub fn masked_key(&self) -> Option<&str> {
        self.masked_key.as_deref()
    }
}

/// Masks a secret, keeping its first two and last two characters.
#[must_use]
pub fn obfuscate(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "•".repeat(chars.len());
    }
    let head: String = chars.iter().take(2).collect();
    let tail: String = chars.iter().skip(chars.len() - 2).collect();
    format!("{head}{}{tail}", "•".repeat(chars.len() - 4))
}

/// Generates an opaque dashboard session token.
#[must_use]
pub fn generate_session_token() -> String {
    let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
    format!("session_{timestamp}_{}", rand::random::<u64>())
}
