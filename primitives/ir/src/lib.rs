#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Tracker RPC Operation Model
//!
//! This crate defines the static metadata that describes the remote tracker
//! service: wire type identifiers, per-operation descriptors (ordered
//! parameters, return shape and declared faults), and the fault kinds a call
//! may end in. Descriptors are plain data; they are built once, validated
//! against a type registry at startup and never mutated afterwards.

pub mod descriptor;
pub mod fault;
pub mod wire_type;

pub use descriptor::*;
pub use fault::{FaultKind, FaultSpec};
pub use wire_type::{short_type_name, xsd, QualifiedName, WireType, WireTypeParseError};
