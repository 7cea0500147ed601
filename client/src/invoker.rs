//! The call pipeline: lookup, arity check, argument encoding, dispatch,
//! and result decoding or fault translation.

use std::any::Any;
use std::sync::Arc;

use ir::{ReturnSpec, WireType};
use registry::{Bindings, CodecError, LocalValue};
use thiserror::Error;
use transport::{DynTransport, Reply, Request, TransportError};

use crate::fault::{FaultTranslator, RemoteFault};

/// Local and infrastructure failures of a single call.
///
/// Remote faults are not errors at this level; they are an expected outcome
/// carried by [`CallResult::Fault`].
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The operation name is not in the catalog.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// The argument count does not match the operation's parameters.
    #[error("operation '{operation}' takes {expected} argument(s), got {found}")]
    Arity {
        /// Operation name
        operation: String,
        /// Declared parameter count
        expected: usize,
        /// Arguments supplied
        found: usize,
    },

    /// A wire type has no registered mapping.
    #[error("operation '{operation}' uses unregistered wire type {wire_type}")]
    UnknownType {
        /// Operation name
        operation: String,
        /// The unresolved wire type
        wire_type: WireType,
    },

    /// An argument or the response could not be marshalled.
    #[error("operation '{operation}': {slot}: {source}")]
    Codec {
        /// Operation name
        operation: String,
        /// `param <name>` or `return`
        slot: String,
        /// Underlying codec failure
        source: CodecError,
    },

    /// The transport failed; the call may or may not have reached the server.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl InvokeError {
    fn codec(operation: &str, slot: String, err: CodecError) -> Self {
        match err {
            CodecError::UnknownType(wire_type) =>
                InvokeError::UnknownType { operation: operation.to_string(), wire_type },
            source => InvokeError::Codec { operation: operation.to_string(), slot, source },
        }
    }
}

/// Outcome of a call that reached the remote side.
#[derive(Debug)]
pub enum CallResult {
    /// The decoded return value, of the operation's local return type
    Success(LocalValue),
    /// The operation returns nothing
    Void,
    /// A nullable return came back `null`
    Nil,
    /// The remote side reported a fault
    Fault(RemoteFault),
}

impl CallResult {
    /// Take the return value as a `T`.
    ///
    /// Gives `self` back unchanged when this is not a success holding a `T`.
    pub fn into_value<T: Any>(self) -> Result<T, Self> {
        match self {
            CallResult::Success(value) =>
                value.downcast::<T>().map(|v| *v).map_err(CallResult::Success),
            other => Err(other),
        }
    }

    /// Borrow the return value as a `T`.
    pub fn value<T: Any>(&self) -> Option<&T> {
        match self {
            CallResult::Success(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Whether the call succeeded without a value.
    pub fn is_void(&self) -> bool { matches!(self, CallResult::Void) }

    /// Whether a nullable return came back empty.
    pub fn is_nil(&self) -> bool { matches!(self, CallResult::Nil) }

    /// The remote fault, if the call faulted.
    pub fn fault(&self) -> Option<&RemoteFault> {
        match self {
            CallResult::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

/// Dispatches calls described by shared [`Bindings`] over a [`DynTransport`].
///
/// Holds no per-call state; clones share the same bindings and transport and
/// may invoke concurrently.
#[derive(Clone)]
pub struct CallInvoker {
    bindings: Arc<Bindings>,
    transport: DynTransport,
}

impl std::fmt::Debug for CallInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallInvoker")
            .field("operations", &self.bindings.catalog().iter().count())
            .field("endpoint", &self.transport.endpoint())
            .finish()
    }
}

impl CallInvoker {
    /// Create an invoker over validated bindings.
    pub fn new(bindings: Arc<Bindings>, transport: DynTransport) -> Self {
        Self { bindings, transport }
    }

    /// The bindings calls are resolved against.
    pub fn bindings(&self) -> &Arc<Bindings> { &self.bindings }

    /// The transport calls are sent over.
    pub fn transport(&self) -> &DynTransport { &self.transport }

    /// Invoke `operation` with positional `args`.
    ///
    /// Unknown operations and arity mismatches fail before anything is sent.
    /// Dropping the returned future abandons the call.
    pub async fn invoke(
        &self,
        operation: &str,
        args: Vec<LocalValue>,
    ) -> Result<CallResult, InvokeError> {
        let descriptor = self
            .bindings
            .catalog()
            .lookup(operation)
            .map_err(|_| InvokeError::UnknownOperation(operation.to_string()))?;
        if args.len() != descriptor.arity() {
            return Err(InvokeError::Arity {
                operation: operation.to_string(),
                expected: descriptor.arity(),
                found: args.len(),
            });
        }

        let types = self.bindings.types();
        let params = descriptor
            .params
            .iter()
            .zip(&args)
            .map(|(spec, arg)| {
                types
                    .serialize(&**arg, &spec.wire_type)
                    .map_err(|e| InvokeError::codec(operation, format!("param {}", spec.name), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request = Request::new(operation, params, descriptor.declared_fault_names());
        tracing::debug!(
            "dispatching {} ({} args) to {}",
            operation,
            request.params.len(),
            self.transport.endpoint()
        );

        match self.transport.send(&request).await? {
            Reply::Body(body) => match &descriptor.returns {
                ReturnSpec::Void => Ok(CallResult::Void),
                ReturnSpec::Value { nullable: true, .. } if body.is_null() => Ok(CallResult::Nil),
                ReturnSpec::Value { wire_type, .. } => types
                    .deserialize(body, wire_type)
                    .map(CallResult::Success)
                    .map_err(|e| InvokeError::codec(operation, "return".to_string(), e)),
            },
            Reply::Fault(payload) =>
                Ok(CallResult::Fault(FaultTranslator::translate(payload, &descriptor.faults))),
        }
    }
}

#[cfg(test)]
mod tests {
    use ir::{xsd, FaultKind, OperationDescriptor};
    use registry::{local, OperationCatalog, TypeRegistry};
    use serde_json::json;
    use transport::mock::ScriptedTransport;

    use super::*;

    fn invoker(transport: Arc<ScriptedTransport>) -> CallInvoker {
        let catalog = OperationCatalog::from_descriptors([
            OperationDescriptor::new("echo")
                .param("text", xsd::string(), Some("String"))
                .returns(xsd::string(), Some("String"))
                .fault(FaultKind::RemoteError),
            OperationDescriptor::new("ping"),
        ])
        .expect("distinct descriptors");
        let mut types = TypeRegistry::builder();
        types.with_primitives().expect("primitives register once");
        let bindings = Bindings::new(catalog, types.build()).expect("valid bindings");
        CallInvoker::new(bindings, transport)
    }

    #[tokio::test]
    async fn test_invoke_encodes_and_decodes() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_body(json!("hello back"));
        let result = invoker(transport.clone())
            .invoke("echo", vec![local("hello".to_string())])
            .await
            .expect("call succeeds");

        assert_eq!(result.value::<String>().map(String::as_str), Some("hello back"));
        let sent = transport.requests();
        assert_eq!(sent[0].params, vec![json!("hello")]);
        assert_eq!(sent[0].declared_faults, vec!["RemoteException".to_string()]);
    }

    #[tokio::test]
    async fn test_argument_type_mismatch_is_local() {
        let transport = Arc::new(ScriptedTransport::new());
        let err = invoker(transport.clone())
            .invoke("echo", vec![local(42i64)])
            .await
            .expect_err("an i64 is not a String");

        match err {
            InvokeError::Codec { slot, source: CodecError::TypeMismatch { .. }, .. } =>
                assert_eq!(slot, "param text"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_bad_return_shape() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_body(json!({"not": "a string"}));
        let err = invoker(transport)
            .invoke("echo", vec![local("x".to_string())])
            .await
            .expect_err("an object is not a string");
        assert!(matches!(err, InvokeError::Codec { ref slot, .. } if slot == "return"));
    }

    #[tokio::test]
    async fn test_void_discards_body() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_body(json!({"ignored": true}));
        let result = invoker(transport).invoke("ping", vec![]).await.expect("call succeeds");
        assert!(result.is_void());
        assert!(result.fault().is_none());
    }

    #[test]
    fn test_into_value_gives_back_mismatch() {
        let result = CallResult::Success(local(7i32));
        let result = result.into_value::<String>().expect_err("not a String");
        assert_eq!(result.into_value::<i32>().expect("an i32"), 7);

        assert!(CallResult::Void.into_value::<i32>().expect_err("void").is_void());
    }
}
