// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use adc_desk_domain::DomainError;

/// Errors that reject a trigger before any state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The trigger carried invalid input.
    Validation(DomainError),
    /// The network check has not resolved yet and no password was accepted.
    AccessPending,
    /// The network check denied access and no password was accepted.
    AccessDenied,
    /// The selected contract is not among the loaded contracts.
    UnknownContract(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::AccessPending => {
                write!(f, "Verificando acceso, inténtelo de nuevo en unos segundos")
            }
            Self::AccessDenied => {
                write!(f, "Acceso restringido: Por favor, autentíquese para continuar")
            }
            Self::UnknownContract(id) => write!(f, "Contrato no encontrado: {id}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err)
    }
}
