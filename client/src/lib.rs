#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `tracker-client` — Typed Calls to the Tracker Service
//!
//! This crate ties the registries, the transport and the tracker data model
//! together:
//!
//! - [`CallInvoker`] runs one remote call end to end: catalog lookup, arity
//!   check, argument encoding, dispatch, and result decoding.
//! - [`FaultTranslator`] turns a remote fault payload into a [`TypedFault`]
//!   when the operation declares it, and an [`UndeclaredFault`] otherwise.
//! - [`TrackerClient`] offers one typed async method per tracker operation,
//!   generated from the same table as the catalog itself.
//!
//! Registries are built and validated eagerly, before the first call can be
//! made. Every call after that only reads them.
//!
//! ## Example
//! ```no_run
//! use config::Config;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let client = tracker_client::connect(&Config::default()).unwrap();
//! let session = client.open_session("admin", "secret").await.unwrap();
//! if let Some(user) = client.get_user(&session, "alice".to_string()).await.unwrap() {
//!     println!("{}", user.name);
//! }
//! client.close_session(session).await.unwrap();
//! # });
//! ```

pub mod catalog;
pub mod fault;
pub mod invoker;
pub mod service;

use std::sync::Arc;

use registry::RegistryError;
use thiserror::Error;
use tracker_http::HttpTransport;
use transport::TransportError;

pub use catalog::{
    bindings_from_file, tracker_bindings, tracker_catalog, tracker_descriptors, tracker_types,
};
pub use fault::{FaultTranslator, RemoteFault, TypedFault, UndeclaredFault};
pub use invoker::{CallInvoker, CallResult, InvokeError};
pub use service::{CallError, ReturnShape, Session, TrackerClient, WireTyped};

/// Errors raised while setting up a client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// The catalog or type registry failed to build or validate.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The transport could not be created.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The configured log file could not be opened.
    #[error("Failed to open log file: {0}")]
    LogFile(#[from] std::io::Error),
}

/// Build a [`TrackerClient`] speaking HTTP to the configured endpoint.
///
/// Installs the configured log level, builds and validates the bindings
/// (from `catalog.path` when set, the built-in table otherwise), then
/// creates the transport.
pub fn connect(config: &config::Config) -> Result<TrackerClient, ClientError> {
    config.validate()?;
    let installed = match &config.logging.file {
        Some(path) => logging::init_to_file(&config.logging.level, path)?,
        None => logging::init(&config.logging.level),
    };
    if !installed {
        tracing::debug!("keeping the already-installed log subscriber");
    }

    let bindings = match &config.catalog.path {
        Some(path) => bindings_from_file(path)?,
        None => tracker_bindings()?,
    };
    let transport = HttpTransport::from_config(&config.transport_config())?;
    logging::trace("client", &format!("connected to {}", config.endpoint.url));
    Ok(TrackerClient::new(CallInvoker::new(bindings, Arc::new(transport))))
}
