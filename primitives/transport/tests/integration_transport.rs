//! Integration tests for the shared transport API.
//!
//! These exercise consumer usage patterns without a running tracker server.

use serde_json::json;
use transport::{FaultPayload, Reply, Request, Transport, TransportError};

struct DummyTransport;

#[async_trait::async_trait]
impl transport::Transport for DummyTransport {
    async fn send(&self, request: &Request) -> Result<Reply, TransportError> {
        match request.operation.as_str() {
            "fail" => Err(TransportError::Http("connection reset".to_string())),
            "deny" => Ok(Reply::Fault(FaultPayload::new("RemotePermissionException", "no"))),
            _ => Ok(Reply::Body(json!({"ok": true}))),
        }
    }

    fn endpoint(&self) -> &str { "dummy://" }
}

#[tokio::test]
async fn consumer_can_call_transport() {
    let t = DummyTransport;
    let reply = t.send(&Request::new("ping", vec![], vec![])).await.expect("ok");
    match reply {
        Reply::Body(v) => assert_eq!(v["ok"], true),
        other => panic!("unexpected reply {:?}", other),
    }
}

#[tokio::test]
async fn consumer_distinguishes_fault_from_error() {
    let t = DummyTransport;

    let err = t.send(&Request::new("fail", vec![], vec![])).await.expect_err("should err");
    assert!(matches!(err, TransportError::Http(msg) if msg.contains("reset")));

    let reply = t.send(&Request::new("deny", vec![], vec![])).await.expect("fault is a reply");
    assert!(matches!(reply, Reply::Fault(f) if f.kind == "RemotePermissionException"));
}

#[cfg(feature = "test-utils")]
mod scripted {
    use transport::mock::ScriptedTransport;

    use super::*;

    #[tokio::test]
    async fn replays_in_order_and_records_requests() {
        let t = ScriptedTransport::new();
        t.push_body(json!(1)).push_fault("RemoteException", "boom");

        let first = t.send(&Request::new("a", vec![json!("x")], vec![])).await.expect("body");
        assert_eq!(first, Reply::Body(json!(1)));
        let second = t.send(&Request::new("b", vec![], vec![])).await.expect("fault");
        assert!(matches!(second, Reply::Fault(_)));
        let third = t.send(&Request::new("c", vec![], vec![])).await;
        assert!(matches!(third, Err(TransportError::Other(_))));

        assert_eq!(t.calls(), 3);
        let ops: Vec<_> = t.requests().into_iter().map(|r| r.operation).collect();
        assert_eq!(ops, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn empty_endpoint_is_unset() {
        let t = ScriptedTransport::with_endpoint("");
        t.push_body(json!(null));
        let err = t.send(&Request::new("a", vec![], vec![])).await.expect_err("unset");
        assert!(matches!(err, TransportError::EndpointUnset));
    }
}
