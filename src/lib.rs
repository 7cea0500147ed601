// SPDX-License-Identifier: CC0-1.0

//! Tracker RPC umbrella crate.
//!
//! Re-exports the client facade so applications can depend on a single crate.
//! The binding layer itself lives in the workspace members under `primitives`,
//! `backends`, `runtime` and `client`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

pub use client::*;

/// Miscellaneous metadata about the Tracker RPC workspace.
pub mod tracker_meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
