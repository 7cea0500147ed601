//! Typed facade over the invoker.
//!
//! [`TrackerClient`] exposes one async method per catalog operation. The
//! methods themselves are generated alongside the operation table in
//! [`crate::catalog`]; this module holds what they share.

use std::any::Any;

use chrono::{DateTime, Utc};
use ir::{short_type_name, xsd, FaultKind, ReturnSpec, WireType};
use thiserror::Error;
use types::*;

use crate::fault::RemoteFault;
use crate::invoker::{CallInvoker, CallResult, InvokeError};

/// Failure of a typed forwarder call.
#[derive(Debug, Error)]
pub enum CallError {
    /// The call failed locally or in the transport.
    #[error(transparent)]
    Invoke(#[from] InvokeError),

    /// The remote side reported a fault.
    #[error("{operation}: {fault}")]
    Fault {
        /// Operation name
        operation: String,
        /// The translated fault
        fault: RemoteFault,
    },

    /// The result did not have the shape the forwarder expects.
    #[error("{operation}: expected {expected} result")]
    UnexpectedReturn {
        /// Operation name
        operation: String,
        /// Expected local type, or `nothing` for void operations
        expected: String,
    },
}

impl CallError {
    /// The declared fault kind, if this is a declared remote fault.
    pub fn fault_kind(&self) -> Option<FaultKind> {
        match self {
            CallError::Fault { fault, .. } => fault.kind(),
            _ => None,
        }
    }

    /// The remote fault, if any.
    pub fn remote_fault(&self) -> Option<&RemoteFault> {
        match self {
            CallError::Fault { fault, .. } => Some(fault),
            _ => None,
        }
    }
}

/// Local types with a canonical wire type.
pub trait WireTyped {
    /// The wire type values of this type travel as.
    fn wire_type() -> WireType;
}

/// Shapes a forwarder can return: `()` for void operations, a [`WireTyped`]
/// value, or `Option` of one for lookups that may find nothing.
pub trait ReturnShape: Sized {
    /// Return spec for a descriptor whose local return type is `local_type`.
    fn return_spec(local_type: &str) -> ReturnSpec;

    /// Extract the typed outcome of `operation` from `result`.
    fn from_result(operation: &str, result: CallResult) -> Result<Self, CallError>;
}

impl ReturnShape for () {
    fn return_spec(_local_type: &str) -> ReturnSpec { ReturnSpec::Void }

    fn from_result(operation: &str, result: CallResult) -> Result<Self, CallError> {
        match result {
            CallResult::Void => Ok(()),
            CallResult::Fault(fault) =>
                Err(CallError::Fault { operation: operation.to_string(), fault }),
            CallResult::Success(_) | CallResult::Nil => Err(CallError::UnexpectedReturn {
                operation: operation.to_string(),
                expected: "nothing".to_string(),
            }),
        }
    }
}

fn value_return_spec<T: WireTyped>(local_type: &str) -> ReturnSpec {
    ReturnSpec::Value {
        wire_type: T::wire_type(),
        local_type: Some(local_type.to_string()),
        nullable: false,
    }
}

fn typed_result<T: Any>(operation: &str, result: CallResult) -> Result<T, CallError> {
    match result.into_value::<T>() {
        Ok(value) => Ok(value),
        Err(CallResult::Fault(fault)) =>
            Err(CallError::Fault { operation: operation.to_string(), fault }),
        Err(_) => Err(CallError::UnexpectedReturn {
            operation: operation.to_string(),
            expected: short_type_name(std::any::type_name::<T>()),
        }),
    }
}

impl<T: WireTyped + Any> WireTyped for Vec<T> {
    fn wire_type() -> WireType { WireType::array_of(T::wire_type()) }
}

impl<T: WireTyped + Any> ReturnShape for Vec<T> {
    fn return_spec(local_type: &str) -> ReturnSpec { value_return_spec::<Self>(local_type) }

    fn from_result(operation: &str, result: CallResult) -> Result<Self, CallError> {
        typed_result(operation, result)
    }
}

impl<T: ReturnShape + WireTyped + Any> ReturnShape for Option<T> {
    fn return_spec(_local_type: &str) -> ReturnSpec {
        ReturnSpec::Value {
            wire_type: T::wire_type(),
            local_type: Some(short_type_name(std::any::type_name::<T>())),
            nullable: true,
        }
    }

    fn from_result(operation: &str, result: CallResult) -> Result<Self, CallError> {
        match result {
            CallResult::Nil => Ok(None),
            other => typed_result(operation, other).map(Some),
        }
    }
}

macro_rules! wire_typed {
    ($($ty:ty => $wire:expr),* $(,)?) => {
        $(
            impl WireTyped for $ty {
                fn wire_type() -> WireType { $wire }
            }

            impl ReturnShape for $ty {
                fn return_spec(local_type: &str) -> ReturnSpec {
                    value_return_spec::<Self>(local_type)
                }

                fn from_result(operation: &str, result: CallResult) -> Result<Self, CallError> {
                    typed_result(operation, result)
                }
            }
        )*
    };
}

wire_typed! {
    String => xsd::string(),
    i32 => xsd::int(),
    i64 => xsd::long(),
    bool => xsd::boolean(),
    f64 => xsd::double(),
    DateTime<Utc> => xsd::date_time(),
    RemoteUser => <RemoteUser as Entity>::wire_type(),
    RemoteGroup => <RemoteGroup as Entity>::wire_type(),
    RemoteProject => <RemoteProject as Entity>::wire_type(),
    RemoteVersion => <RemoteVersion as Entity>::wire_type(),
    RemoteComponent => <RemoteComponent as Entity>::wire_type(),
    RemoteIssue => <RemoteIssue as Entity>::wire_type(),
    RemoteComment => <RemoteComment as Entity>::wire_type(),
    RemoteFieldValue => <RemoteFieldValue as Entity>::wire_type(),
    RemoteCustomFieldValue => <RemoteCustomFieldValue as Entity>::wire_type(),
    RemoteWorklog => <RemoteWorklog as Entity>::wire_type(),
    RemotePermission => <RemotePermission as Entity>::wire_type(),
    RemotePermissionMapping => <RemotePermissionMapping as Entity>::wire_type(),
    RemotePermissionScheme => <RemotePermissionScheme as Entity>::wire_type(),
    RemoteServerInfo => <RemoteServerInfo as Entity>::wire_type(),
    RemoteStatus => <RemoteStatus as Entity>::wire_type(),
    RemotePriority => <RemotePriority as Entity>::wire_type(),
    RemoteIssueType => <RemoteIssueType as Entity>::wire_type(),
}

/// An authenticated session.
///
/// Obtained from [`TrackerClient::open_session`]; the token is attached as
/// the first argument of every authenticated call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    token: String,
}

impl Session {
    /// Wrap a token obtained elsewhere.
    pub fn from_token(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self { username: username.into(), token: token.into() }
    }

    /// Login name the session belongs to.
    pub fn username(&self) -> &str { &self.username }

    /// Opaque session token.
    pub fn token(&self) -> &str { &self.token }
}

/// Typed client for the tracker service.
#[derive(Debug, Clone)]
pub struct TrackerClient {
    pub(crate) invoker: CallInvoker,
}

impl TrackerClient {
    /// Wrap an invoker whose bindings include the tracker catalog.
    pub fn new(invoker: CallInvoker) -> Self { Self { invoker } }

    /// The underlying invoker, for operations without a typed forwarder.
    pub fn invoker(&self) -> &CallInvoker { &self.invoker }

    /// Log in and keep the returned token as a [`Session`].
    pub async fn open_session(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Session, CallError> {
        let username = username.into();
        let token = self.login(username.clone(), password.into()).await?;
        logging::trace("client", &format!("session opened for {}", username));
        Ok(Session { username, token })
    }

    /// Log out, consuming the session. Returns whether the server knew the token.
    pub async fn close_session(&self, session: Session) -> Result<bool, CallError> {
        self.logout(&session).await
    }
}
