#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `tracker-transport` — Outbound Call Boundary
//!
//! This crate defines the **transport abstraction** the tracker client
//! dispatches every remote call through. The client core serializes
//! arguments and interprets results; a transport only moves an encoded
//! [`Request`] to an endpoint and brings back a [`Reply`].
//!
//! ## Core Concepts
//!
//! ### `Transport` Trait
//! Sends one request and returns either a response body or a structured
//! application fault. Backends such as `tracker-http` implement it to do
//! their actual I/O, including any retry, pooling and timeout policy.
//!
//! ### `Reply` vs `TransportError`
//! A [`Reply::Fault`] is an application-level outcome reported by the remote
//! service (for example an authentication failure). A [`TransportError`] is
//! an infrastructure failure (network, timeout, cancellation, endpoint not
//! configured) and never carries a business fault.
//!
//! ### `DynTransport`
//! A type-erased (`Arc<dyn Transport>`) handle so clients and tests can
//! operate over any backend without generic parameters.
//!
//! ## Feature Flags
//! - `test-utils`: exposes [`mock::ScriptedTransport`], a transport that
//!   replays scripted replies and records every request it sees.
//!
//! ## Example
//! ```no_run
//! use transport::{DynTransport, Reply, Request, TransportError};
//! use serde_json::json;
//!
//! async fn demo(transport: DynTransport) -> Result<(), TransportError> {
//!     let request = Request::new("getServerInfo", vec![json!("token")], vec![]);
//!     match transport.send(&request).await? {
//!         Reply::Body(info) => println!("version = {}", info["version"]),
//!         Reply::Fault(fault) => println!("fault {}: {}", fault.kind, fault.message),
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod envelope;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use envelope::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Type alias for structured error handling in transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Canonical infrastructure error for all transport implementations.
///
/// Application faults reported by the remote service are not errors at this
/// layer; they come back as [`Reply::Fault`].
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// An HTTP-level failure (connection refused, reset, or bad status code).
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// The call did not complete within the configured time budget.
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// The call was cancelled before a reply arrived.
    #[error("Call cancelled: {0}")]
    Cancelled(String),

    /// No endpoint has been configured for this transport.
    #[error("Endpoint not set")]
    EndpointUnset,

    /// Failure to serialize or deserialize a JSON payload.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The response did not conform to the expected envelope format.
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Any other error not covered by the specific variants above.
    #[error("Other error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self { TransportError::Serialization(err.to_string()) }
}

/// One encoded call handed to a transport.
///
/// Parameters are already serialized to their wire form and ordered
/// positionally. `declared_faults` lists the wire fault names the operation
/// declares, for transports that need them to decode fault payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Remote operation name
    pub operation: String,
    /// Positional wire-encoded arguments
    pub params: Vec<Value>,
    /// Wire fault names declared by the operation
    #[serde(default)]
    pub declared_faults: Vec<String>,
}

impl Request {
    /// Build a request.
    pub fn new(
        operation: impl Into<String>,
        params: Vec<Value>,
        declared_faults: Vec<String>,
    ) -> Self {
        Self { operation: operation.into(), params, declared_faults }
    }
}

/// A structured application fault reported by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultPayload {
    /// Fault kind identifier, e.g. `RemoteAuthenticationException`
    pub kind: String,
    /// Human-readable message
    pub message: String,
    /// Any additional structured detail the service attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl FaultPayload {
    /// A fault without structured detail.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind: kind.into(), message: message.into(), detail: None }
    }
}

/// What a transport brings back from a successful round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Wire-encoded response body (`Value::Null` when the operation returned nothing)
    Body(Value),
    /// The remote side reported an application fault
    Fault(FaultPayload),
}

/// The base transport trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a single call and waits for its reply.
    ///
    /// Implementations must return infrastructure failures (including
    /// cancellation and timeouts) as [`TransportError`] and application faults
    /// as [`Reply::Fault`]; the two must never be conflated.
    async fn send(&self, request: &Request) -> Result<Reply>;

    /// Returns the configured endpoint or connection descriptor.
    ///
    /// For network transports, this is usually the URL.
    /// For mock or in-memory transports, it may be a symbolic name.
    fn endpoint(&self) -> &str;
}

/// Type alias for a shared, dynamically dispatched transport instance.
///
/// ```
/// use transport::DynTransport;
///
/// fn use_transport(t: DynTransport) {
///     println!("Using endpoint: {}", t.endpoint());
/// }
/// ```
pub type DynTransport = Arc<dyn Transport>;

/// Authentication mechanism attached to each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// No transport-level credentials
    #[default]
    None,
    /// HTTP basic authentication
    Basic,
    /// Bearer token
    Token,
}

/// Authentication configuration for transport connections.
///
/// # Examples
///
/// ```
/// use transport::{AuthConfig, AuthType};
///
/// let auth = AuthConfig {
///     auth_type: AuthType::Basic,
///     username: Some("admin".to_string()),
///     password: Some("secret".to_string()),
///     token: None,
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Auth type
    #[serde(default)]
    pub auth_type: AuthType,
    /// Username (for basic auth)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password (for basic auth)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Token (for token auth)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Transport configuration for communication backends.
///
/// # Examples
///
/// ```
/// use transport::TransportConfig;
///
/// let config = TransportConfig {
///     endpoint: "http://127.0.0.1:8080/rpc".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.max_retries, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Connection endpoint (URL)
    pub endpoint: String,
    /// Authentication settings (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
    /// Retries after a connection-level failure; faults are never retried
    pub max_retries: u32,
    /// Delay between retries in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            auth: None,
            timeout_ms: 30_000,
            max_retries: 0,
            retry_delay_ms: 500,
        }
    }
}
