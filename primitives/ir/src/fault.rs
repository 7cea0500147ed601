//! Declared fault kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Business-level fault kinds the tracker service can declare for an operation.
///
/// Kinds are matched by value, never by a type hierarchy. Infrastructure
/// failures are not fault kinds; they surface as transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Credentials or session token were rejected
    AuthenticationFailed,
    /// The authenticated user lacks the required permission
    PermissionDenied,
    /// The request was well-formed but failed server-side validation
    ValidationFailed,
    /// Any other fault the service declares generically
    RemoteError,
}

impl FaultKind {
    /// All fault kinds, in declaration order.
    pub const ALL: [FaultKind; 4] = [
        FaultKind::AuthenticationFailed,
        FaultKind::PermissionDenied,
        FaultKind::ValidationFailed,
        FaultKind::RemoteError,
    ];

    /// Stable snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::AuthenticationFailed => "authentication_failed",
            FaultKind::PermissionDenied => "permission_denied",
            FaultKind::ValidationFailed => "validation_failed",
            FaultKind::RemoteError => "remote_error",
        }
    }

    /// Fault name the tracker service puts on the wire for this kind.
    pub fn wire_name(&self) -> &'static str {
        match self {
            FaultKind::AuthenticationFailed => "RemoteAuthenticationException",
            FaultKind::PermissionDenied => "RemotePermissionException",
            FaultKind::ValidationFailed => "RemoteValidationException",
            FaultKind::RemoteError => "RemoteException",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

impl FromStr for FaultKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FaultKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown fault kind: {}", s))
    }
}

/// One fault an operation declares: the wire fault name and the local kind it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultSpec {
    /// Fault identifier as reported by the remote side
    pub wire_fault_name: String,
    /// Local kind raised when this fault is matched
    pub kind: FaultKind,
}

impl FaultSpec {
    /// Declare `kind` under its standard wire name.
    pub fn of(kind: FaultKind) -> Self {
        Self { wire_fault_name: kind.wire_name().to_string(), kind }
    }

    /// Declare `kind` under a custom wire name.
    pub fn named(wire_fault_name: impl Into<String>, kind: FaultKind) -> Self {
        Self { wire_fault_name: wire_fault_name.into(), kind }
    }
}
