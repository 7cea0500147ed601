#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `tracker-http` — HTTP Transport Backend
//!
//! This crate provides a concrete HTTP-based implementation of the
//! [`transport::Transport`] trait, speaking the JSON-RPC envelope defined in
//! [`transport::envelope`] to the tracker service.
//!
//! ## Overview
//!
//! - Implements [`HttpTransport`], a thin wrapper over [`reqwest::Client`]
//! - Supports unauthenticated, basic-authenticated and bearer-token calls
//! - Retries connection failures only; a fault reply is never retried
//!
//! ## Example
//! ```no_run
//! use tracker_http::HttpTransport;
//! use transport::{Request, Transport};
//! use serde_json::json;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = HttpTransport::with_auth(
//!     "http://127.0.0.1:8080/rpc/json-rpc/trackerservice-v2",
//!     "admin",
//!     "secret",
//! );
//!
//! let request = Request::new("getServerInfo", vec![json!("token")], vec![]);
//! let reply = transport.send(&request).await.unwrap();
//! println!("{:#?}", reply);
//! # });
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use transport::{
    AuthConfig, AuthType, JsonRpcRequest, JsonRpcResponse, Reply, Request, Transport,
    TransportConfig, TransportError,
};

/// Credentials attached to every request.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Credentials {
    Basic(String, String),
    Bearer(String),
}

impl Credentials {
    fn from_config(auth: &AuthConfig) -> Result<Option<Self>, TransportError> {
        match auth.auth_type {
            AuthType::None => Ok(None),
            AuthType::Basic => match (&auth.username, &auth.password) {
                (Some(u), Some(p)) => Ok(Some(Credentials::Basic(u.clone(), p.clone()))),
                _ => Err(TransportError::Other(
                    "basic auth requires username and password".to_string(),
                )),
            },
            AuthType::Token => auth
                .token
                .clone()
                .map(|t| Some(Credentials::Bearer(t)))
                .ok_or_else(|| TransportError::Other("token auth requires a token".to_string())),
        }
    }
}

/// A concrete implementation of the [`Transport`] trait using HTTP.
///
/// `HttpTransport` performs no typing of its own. It posts one JSON-RPC
/// envelope per call and hands the `result` back as a [`Reply::Body`], or
/// the `error` object as a [`Reply::Fault`].
///
/// Errors encountered at any stage (HTTP, timeout, JSON parsing) are
/// normalized into [`TransportError`] variants for uniform handling.
#[derive(Clone)]
pub struct HttpTransport {
    /// The underlying HTTP client used to perform requests.
    client: reqwest::Client,
    /// The full URL of the JSON-RPC endpoint.
    url: String,
    credentials: Option<Credentials>,
    timeout_ms: u64,
    max_retries: u32,
    retry_delay_ms: u64,
    next_id: Arc<AtomicU64>,
}

impl HttpTransport {
    /// Constructs a new `HttpTransport` targeting the provided URL.
    ///
    /// This variant does **not** use authentication and keeps the default
    /// timeout and retry policy of [`TransportConfig`].
    ///
    /// # Example
    /// ```
    /// use tracker_http::HttpTransport;
    /// use transport::Transport;
    ///
    /// let transport = HttpTransport::new("http://127.0.0.1:8080/rpc");
    /// assert_eq!(transport.endpoint(), "http://127.0.0.1:8080/rpc");
    /// ```
    pub fn new(url: impl Into<String>) -> Self {
        let defaults = TransportConfig::default();
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            credentials: None,
            timeout_ms: defaults.timeout_ms,
            max_retries: defaults.max_retries,
            retry_delay_ms: defaults.retry_delay_ms,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Constructs a new `HttpTransport` with basic authentication.
    pub fn with_auth(
        url: impl Into<String>,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Self {
        let mut transport = Self::new(url);
        logging::trace("HTTP", &format!("→ initializing HTTP transport for {}", transport.url));
        transport.credentials = Some(Credentials::Basic(user.into(), pass.into()));
        transport
    }

    /// Replaces the per-attempt timeout.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Constructs a transport from a full [`TransportConfig`].
    ///
    /// # Errors
    /// Returns [`TransportError::EndpointUnset`] for an empty endpoint and
    /// [`TransportError::Other`] when the auth section is incomplete or the
    /// HTTP client cannot be built.
    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportError> {
        if config.endpoint.trim().is_empty() {
            return Err(TransportError::EndpointUnset);
        }
        let credentials = match &config.auth {
            Some(auth) => Credentials::from_config(auth)?,
            None => None,
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to build HTTP client: {}", e)))?;
        logging::trace("HTTP", &format!("→ initializing HTTP transport for {}", config.endpoint));
        Ok(Self {
            client,
            url: config.endpoint.clone(),
            credentials,
            timeout_ms: config.timeout_ms,
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    async fn post_once(&self, body: &JsonRpcRequest) -> Result<Reply, Attempt> {
        let mut req = self
            .client
            .post(&self.url)
            .timeout(Duration::from_millis(self.timeout_ms))
            .json(body);
        match &self.credentials {
            Some(Credentials::Basic(u, p)) => req = req.basic_auth(u, Some(p)),
            Some(Credentials::Bearer(t)) => req = req.bearer_auth(t),
            None => {}
        }
        let resp = req.send().await.map_err(|e| {
            if e.is_connect() {
                Attempt::Retry(TransportError::Http(e.to_string()))
            } else {
                Attempt::Fail(self.map_reqwest_error(e))
            }
        })?;
        let status = resp.status();

        let text = resp.text().await.map_err(|e| {
            tracing::error!("HTTP Transport - Failed to read body: {}", e);
            Attempt::Fail(self.map_reqwest_error(e))
        })?;

        let parsed = JsonRpcResponse::parse(&text);
        if !status.is_success() {
            // Faults commonly arrive with a 500 status and an error envelope.
            return match parsed {
                Ok(envelope) if envelope.error.is_some() => Ok(envelope.into_reply()),
                _ => Err(Attempt::Fail(TransportError::Http(format!(
                    "HTTP {} from {}",
                    status, self.url
                )))),
            };
        }
        parsed.map(JsonRpcResponse::into_reply).map_err(Attempt::Fail)
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(self.timeout_ms)
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

/// Outcome of a failed attempt.
enum Attempt {
    /// The request never reached the server.
    Retry(TransportError),
    Fail(TransportError),
}

#[async_trait]
impl Transport for HttpTransport {
    /// Sends a single JSON-RPC request and returns its reply.
    ///
    /// # Errors
    /// - [`TransportError::Http`] if the connection fails or the server answers
    ///   with a non-success status and no error envelope
    /// - [`TransportError::Timeout`] if the per-attempt timeout elapses
    /// - [`TransportError::Serialization`] if the body is not JSON
    /// - [`TransportError::InvalidFormat`] if the body is not a valid envelope
    async fn send(&self, request: &Request) -> Result<Reply, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = JsonRpcRequest::from_request(request, id);
        logging::trace("HTTP", &format!("→ POST {} (method: {})", self.url, request.operation));

        let mut attempt = 0u32;
        loop {
            match self.post_once(&body).await {
                Ok(reply) => return Ok(reply),
                Err(Attempt::Retry(err)) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "HTTP Transport - {} failed ({}), retry {}/{}",
                        request.operation,
                        err,
                        attempt,
                        self.max_retries
                    );
                    tokio::time::sleep(Duration::from_millis(self.retry_delay_ms)).await;
                }
                Err(Attempt::Retry(err)) | Err(Attempt::Fail(err)) => {
                    tracing::error!("HTTP Transport - Request failed: {}", err);
                    return Err(err);
                }
            }
        }
    }

    /// Returns the configured JSON-RPC endpoint URL.
    fn endpoint(&self) -> &str { &self.url }
}
