//! JSON-RPC style envelope shared by the network backends.
//!
//! A fault travels as a JSON-RPC error object whose `data.fault` member names
//! the fault kind. An error object without a fault name is still an
//! application fault, reported under the synthetic kind `jsonrpc:<code>` so it
//! can never be mistaken for one of an operation's declared kinds.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{FaultPayload, Reply, Request, Result, TransportError};

/// Envelope protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// Outbound call envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Always [`JSONRPC_VERSION`]
    pub jsonrpc: String,
    /// Correlation id
    pub id: u64,
    /// Operation name
    pub method: String,
    /// Positional parameters
    pub params: Vec<Value>,
}

impl JsonRpcRequest {
    /// Wrap `request` with correlation id `id`.
    pub fn from_request(request: &Request, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: request.operation.clone(),
            params: request.params.clone(),
        }
    }
}

/// The error member of a response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code
    pub code: i64,
    /// Human-readable message
    pub message: String,
    /// Structured detail; `data.fault` carries the fault kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Fault kind named by `data.fault`, if any.
    pub fn fault_name(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.get("fault")).and_then(Value::as_str)
    }

    /// Convert into a fault payload.
    pub fn into_fault(self) -> FaultPayload {
        let kind = match self.fault_name() {
            Some(name) => name.to_string(),
            None => format!("jsonrpc:{}", self.code),
        };
        FaultPayload { kind, message: self.message, detail: self.data }
    }
}

/// Inbound response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcResponse {
    /// The value returned by the call (`Null` for operations without a result)
    pub result: Value,
    /// The error object returned by the server, if any
    pub error: Option<JsonRpcError>,
    /// Correlation id echoed by the server
    pub id: Value,
}

impl JsonRpcResponse {
    /// Parse a response body.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| TransportError::Serialization(format!("{} (body: {})", e, text)))?;
        Self::from_value(value)
    }

    /// Interpret an already-parsed JSON document as a response envelope.
    ///
    /// A non-null `error` member wins over `result`. Without an error the
    /// `result` member must be present, although it may be `null`.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(TransportError::InvalidFormat(format!(
                    "expected an envelope object, got {}",
                    other
                )))
            }
        };
        let id = map.remove("id").unwrap_or(Value::Null);
        let error = match map.remove("error") {
            None | Some(Value::Null) => None,
            Some(raw) => Some(serde_json::from_value::<JsonRpcError>(raw.clone()).map_err(|e| {
                TransportError::InvalidFormat(format!("malformed error object {}: {}", raw, e))
            })?),
        };
        let result = match (map.remove("result"), &error) {
            (Some(result), _) => result,
            (None, Some(_)) => Value::Null,
            (None, None) => return Err(TransportError::InvalidFormat(
                "envelope has neither result nor error".to_string(),
            )),
        };
        Ok(Self { result, error, id })
    }

    /// Convert into the transport-level reply.
    pub fn into_reply(self) -> Reply {
        match self.error {
            Some(error) => Reply::Fault(error.into_fault()),
            None => Reply::Body(self.result),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_envelope() {
        let req = Request::new("getUser", vec![json!("tok"), json!("alice")], vec![]);
        let envelope = JsonRpcRequest::from_request(&req, 7);
        assert_eq!(
            serde_json::to_value(&envelope).expect("serialize"),
            json!({"jsonrpc": "2.0", "id": 7, "method": "getUser", "params": ["tok", "alice"]})
        );
    }

    #[test]
    fn test_result_becomes_body() {
        let resp = JsonRpcResponse::parse(r#"{"jsonrpc":"2.0","id":1,"result":{"name":"alice"}}"#)
            .expect("valid envelope");
        assert_eq!(resp.into_reply(), Reply::Body(json!({"name": "alice"})));

        let void = JsonRpcResponse::parse(r#"{"id":1,"result":null}"#).expect("null result");
        assert_eq!(void.into_reply(), Reply::Body(Value::Null));
    }

    #[test]
    fn test_named_fault() {
        let resp = JsonRpcResponse::from_value(json!({
            "id": 1,
            "error": {
                "code": -32000,
                "message": "bad token",
                "data": {"fault": "RemoteAuthenticationException"}
            }
        }))
        .expect("valid envelope");

        match resp.into_reply() {
            Reply::Fault(fault) => {
                assert_eq!(fault.kind, "RemoteAuthenticationException");
                assert_eq!(fault.message, "bad token");
                assert!(fault.detail.is_some());
            }
            other => panic!("expected fault, got {:?}", other),
        }
    }

    #[test]
    fn test_unnamed_fault_uses_code() {
        let resp = JsonRpcResponse::from_value(json!({
            "id": 1,
            "error": {"code": -32601, "message": "Method not found"}
        }))
        .expect("valid envelope");

        match resp.into_reply() {
            Reply::Fault(fault) => assert_eq!(fault.kind, "jsonrpc:-32601"),
            other => panic!("expected fault, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_envelopes() {
        assert!(matches!(
            JsonRpcResponse::parse("not json"),
            Err(TransportError::Serialization(_))
        ));
        assert!(matches!(
            JsonRpcResponse::from_value(json!([1, 2])),
            Err(TransportError::InvalidFormat(_))
        ));
        assert!(matches!(
            JsonRpcResponse::from_value(json!({"id": 1})),
            Err(TransportError::InvalidFormat(_))
        ));
        assert!(matches!(
            JsonRpcResponse::from_value(json!({"id": 1, "error": "boom"})),
            Err(TransportError::InvalidFormat(_))
        ));
    }
}
