//! Scripted in-memory transport for tests.
//!
//! Replies are consumed in the order they were pushed. Every request that
//! reaches the transport is recorded, so tests can assert that a call failed
//! before any network interaction took place.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::{FaultPayload, Reply, Request, Result, Transport, TransportError};

/// A transport that replays scripted replies.
#[derive(Debug)]
pub struct ScriptedTransport {
    endpoint: String,
    replies: Mutex<VecDeque<Result<Reply>>>,
    requests: Mutex<Vec<Request>>,
    calls: AtomicUsize,
}

impl Default for ScriptedTransport {
    fn default() -> Self { Self::new() }
}

impl ScriptedTransport {
    /// A scripted transport with the symbolic endpoint `mock://tracker`.
    pub fn new() -> Self { Self::with_endpoint("mock://tracker") }

    /// A scripted transport reporting `endpoint`; an empty endpoint makes
    /// every send fail with [`TransportError::EndpointUnset`].
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a response body.
    pub fn push_body(&self, body: Value) -> &Self { self.push(Ok(Reply::Body(body))) }

    /// Queue an application fault.
    pub fn push_fault(&self, kind: &str, message: &str) -> &Self {
        self.push(Ok(Reply::Fault(FaultPayload::new(kind, message))))
    }

    /// Queue an infrastructure failure.
    pub fn push_error(&self, error: TransportError) -> &Self { self.push(Err(error)) }

    fn push(&self, reply: Result<Reply>) -> &Self {
        self.replies.lock().unwrap_or_else(|e| e.into_inner()).push_back(reply);
        self
    }

    /// Number of sends attempted.
    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &Request) -> Result<Reply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request.clone());
        if self.endpoint.is_empty() {
            return Err(TransportError::EndpointUnset);
        }
        self.replies.lock().unwrap_or_else(|e| e.into_inner()).pop_front().unwrap_or_else(|| {
            Err(TransportError::Other(format!("no scripted reply for {}", request.operation)))
        })
    }

    fn endpoint(&self) -> &str { &self.endpoint }
}
