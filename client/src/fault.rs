//! Translation of remote fault payloads into typed outcomes.
//!
//! A payload is matched against the operation's declared faults by exact
//! wire fault name, in declaration order. An unmatched payload is kept as an
//! [`UndeclaredFault`] carrying the original kind and message unchanged.

use std::fmt;

use ir::{FaultKind, FaultSpec};
use serde_json::Value;
use transport::FaultPayload;

/// A fault the operation declares.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedFault {
    /// Matched kind
    pub kind: FaultKind,
    /// Message reported by the remote side
    pub message: String,
    /// Structured detail, if the service sent any
    pub detail: Option<Value>,
}

/// A fault the catalog did not expect for this operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UndeclaredFault {
    /// Raw kind identifier as reported by the remote side
    pub kind: String,
    /// Message reported by the remote side
    pub message: String,
    /// Structured detail, if the service sent any
    pub detail: Option<Value>,
}

/// A fault reported by the remote side.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteFault {
    /// One of the operation's declared faults
    #[error("{0}")]
    Declared(TypedFault),
    /// A fault kind the operation does not declare
    #[error("{0}")]
    Undeclared(UndeclaredFault),
}

impl fmt::Display for TypedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fault: {}", self.kind, self.message)
    }
}

impl fmt::Display for UndeclaredFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "undeclared fault {}: {}", self.kind, self.message)
    }
}

impl RemoteFault {
    /// The declared kind, when the fault was matched.
    pub fn kind(&self) -> Option<FaultKind> {
        match self {
            RemoteFault::Declared(fault) => Some(fault.kind),
            RemoteFault::Undeclared(_) => None,
        }
    }

    /// The message reported by the remote side.
    pub fn message(&self) -> &str {
        match self {
            RemoteFault::Declared(fault) => &fault.message,
            RemoteFault::Undeclared(fault) => &fault.message,
        }
    }

    /// Whether the fault matched a declared kind.
    pub fn is_declared(&self) -> bool { matches!(self, RemoteFault::Declared(_)) }
}

/// Maps fault payloads onto an operation's declared fault set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultTranslator;

impl FaultTranslator {
    /// Match `payload` against `declared`; the first exact wire name match wins.
    pub fn translate(payload: FaultPayload, declared: &[FaultSpec]) -> RemoteFault {
        let FaultPayload { kind, message, detail } = payload;
        match declared.iter().find(|spec| spec.wire_fault_name == kind) {
            Some(spec) => RemoteFault::Declared(TypedFault { kind: spec.kind, message, detail }),
            None => RemoteFault::Undeclared(UndeclaredFault { kind, message, detail }),
        }
    }
}
