//! Wire type identifiers.
//!
//! A wire type names a value shape on the transport boundary independently of
//! its local Rust representation. Named types are namespace-qualified
//! (`beans:RemoteUser`, `xsd:string`); arrays wrap an element type and render
//! as `ArrayOf_<element>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix used when rendering an array wire type.
pub const ARRAY_PREFIX: &str = "ArrayOf_";

/// Errors produced while parsing a wire type identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireTypeParseError {
    /// The identifier was empty.
    #[error("empty wire type identifier")]
    Empty,
    /// The identifier lacked a `prefix:Local` qualification.
    #[error("wire type '{0}' is not namespace-qualified (expected prefix:Name)")]
    Unqualified(String),
}

/// A namespace-qualified type name, e.g. `beans:RemoteIssue`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Namespace prefix (`xsd`, `beans`, ...)
    pub prefix: String,
    /// Local part of the name
    pub local: String,
}

impl QualifiedName {
    /// Create a qualified name from its parts.
    pub fn new(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), local: local.into() }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local)
    }
}

/// Identifier of a value shape on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WireType {
    /// A single registered entity or primitive
    Named(QualifiedName),
    /// A sequence whose elements share one wire type
    ArrayOf(Box<WireType>),
}

impl WireType {
    /// Shorthand for [`WireType::Named`].
    pub fn named(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        WireType::Named(QualifiedName::new(prefix, local))
    }

    /// Wrap `element` into an array wire type.
    pub fn array_of(element: WireType) -> Self { WireType::ArrayOf(Box::new(element)) }

    /// Element type if this is an array.
    pub fn element(&self) -> Option<&WireType> {
        match self {
            WireType::ArrayOf(inner) => Some(inner),
            WireType::Named(_) => None,
        }
    }

    /// Whether this is an array wire type.
    pub fn is_array(&self) -> bool { matches!(self, WireType::ArrayOf(_)) }

    /// The innermost named type, looking through any number of array layers.
    pub fn base(&self) -> &QualifiedName {
        match self {
            WireType::Named(name) => name,
            WireType::ArrayOf(inner) => inner.base(),
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireType::Named(name) => write!(f, "{}", name),
            WireType::ArrayOf(inner) => write!(f, "{}{}", ARRAY_PREFIX, inner),
        }
    }
}

impl FromStr for WireType {
    type Err = WireTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(WireTypeParseError::Empty);
        }
        if let Some(rest) = s.strip_prefix(ARRAY_PREFIX) {
            return Ok(WireType::array_of(rest.parse()?));
        }
        match s.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() =>
                Ok(WireType::named(prefix, local)),
            _ => Err(WireTypeParseError::Unqualified(s.to_string())),
        }
    }
}

impl TryFrom<String> for WireType {
    type Error = WireTypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<WireType> for String {
    fn from(value: WireType) -> Self { value.to_string() }
}

/// XML-schema primitive wire types understood by every tracker endpoint.
pub mod xsd {
    use super::WireType;

    /// Namespace prefix for schema primitives.
    pub const PREFIX: &str = "xsd";

    /// `xsd:string`
    pub fn string() -> WireType { WireType::named(PREFIX, "string") }
    /// `xsd:int`
    pub fn int() -> WireType { WireType::named(PREFIX, "int") }
    /// `xsd:long`
    pub fn long() -> WireType { WireType::named(PREFIX, "long") }
    /// `xsd:boolean`
    pub fn boolean() -> WireType { WireType::named(PREFIX, "boolean") }
    /// `xsd:double`
    pub fn double() -> WireType { WireType::named(PREFIX, "double") }
    /// `xsd:dateTime`
    pub fn date_time() -> WireType { WireType::named(PREFIX, "dateTime") }
}

/// Strip module paths from a Rust type name, keeping generic structure.
///
/// `alloc::vec::Vec<tracker_types::RemoteUser>` becomes `Vec<RemoteUser>`.
/// Whitespace is dropped so names produced by `stringify!` compare equal to
/// names produced by [`std::any::type_name`].
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        match ch {
            '<' | '>' | ',' | '(' | ')' | '[' | ']' | ';' | '&' => {
                out.push_str(last_path_segment(&segment));
                segment.clear();
                out.push(ch);
            }
            c if c.is_whitespace() => {}
            c => segment.push(c),
        }
    }
    out.push_str(last_path_segment(&segment));
    out
}

fn last_path_segment(path: &str) -> &str { path.rsplit("::").next().unwrap_or(path) }
