//! Operation descriptors
//!
//! An [`OperationDescriptor`] is the static signature of one remote procedure:
//! its ordered positional parameters, its return shape and the ordered list of
//! faults it may raise. Descriptors carry wire-level information plus an
//! optional local type annotation that startup validation checks against the
//! type registry.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fault::{FaultKind, FaultSpec};
use crate::wire_type::WireType;

/// Catalog file format version written by [`CatalogFile::to_file`].
pub const CATALOG_FORMAT_VERSION: &str = "0.1.0";

/// One positional parameter of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name (documentation only; arguments are positional)
    pub name: String,
    /// Wire type the argument is serialized as
    pub wire_type: WireType,
    /// Expected local Rust type, e.g. `String` or `Vec<RemoteUser>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_type: Option<String>,
    /// Zero-based position in the argument list
    pub position: usize,
}

/// Return shape of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReturnSpec {
    /// The operation returns nothing; any response body is discarded
    Void,
    /// The operation returns a value of `wire_type`
    Value {
        /// Wire type of the response body
        wire_type: WireType,
        /// Expected local Rust type
        #[serde(default, skip_serializing_if = "Option::is_none")]
        local_type: Option<String>,
        /// A `null` body means "no value" rather than a malformed response
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        nullable: bool,
    },
}

impl ReturnSpec {
    /// Whether the operation returns nothing.
    pub fn is_void(&self) -> bool { matches!(self, ReturnSpec::Void) }

    /// Wire type of the return value, `None` for void operations.
    pub fn wire_type(&self) -> Option<&WireType> {
        match self {
            ReturnSpec::Void => None,
            ReturnSpec::Value { wire_type, .. } => Some(wire_type),
        }
    }

    /// Whether a `null` response body is a valid "no value" outcome.
    pub fn is_nullable(&self) -> bool { matches!(self, ReturnSpec::Value { nullable: true, .. }) }

    /// Expected local type of the return value, if annotated.
    pub fn local_type(&self) -> Option<&str> {
        match self {
            ReturnSpec::Void => None,
            ReturnSpec::Value { local_type, .. } => local_type.as_deref(),
        }
    }
}

/// Static signature of one remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Operation name; unique within a catalog
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Ordered positional parameters
    pub params: Vec<ParameterSpec>,
    /// Return shape
    pub returns: ReturnSpec,
    /// Declared faults, in match order
    pub faults: Vec<FaultSpec>,
}

impl OperationDescriptor {
    /// Start a descriptor with no parameters, a void return and no faults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            params: Vec::new(),
            returns: ReturnSpec::Void,
            faults: Vec::new(),
        }
    }

    /// Set the description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a positional parameter.
    pub fn param(
        mut self,
        name: impl Into<String>,
        wire_type: WireType,
        local_type: Option<&str>,
    ) -> Self {
        let position = self.params.len();
        self.params.push(ParameterSpec {
            name: name.into(),
            wire_type,
            local_type: local_type.map(str::to_string),
            position,
        });
        self
    }

    /// Declare a value return.
    pub fn returns(mut self, wire_type: WireType, local_type: Option<&str>) -> Self {
        self.returns = ReturnSpec::Value {
            wire_type,
            local_type: local_type.map(str::to_string),
            nullable: false,
        };
        self
    }

    /// Accept a `null` body as "no value". Has no effect on void operations.
    pub fn nullable(mut self) -> Self {
        if let ReturnSpec::Value { nullable, .. } = &mut self.returns {
            *nullable = true;
        }
        self
    }

    /// Declare a fault under its standard wire name.
    pub fn fault(mut self, kind: FaultKind) -> Self {
        self.faults.push(FaultSpec::of(kind));
        self
    }

    /// Number of positional arguments the operation takes.
    pub fn arity(&self) -> usize { self.params.len() }

    /// Declared wire fault names, in match order.
    pub fn declared_fault_names(&self) -> Vec<String> {
        self.faults.iter().map(|f| f.wire_fault_name.clone()).collect()
    }

    /// Every wire type this operation references, parameters first.
    pub fn referenced_wire_types(&self) -> impl Iterator<Item = &WireType> {
        self.params.iter().map(|p| &p.wire_type).chain(self.returns.wire_type())
    }

    /// First parameter whose recorded position disagrees with its index in
    /// `params`, paired with that index.
    pub fn misplaced_param(&self) -> Option<(&ParameterSpec, usize)> {
        self.params.iter().enumerate().find(|(i, p)| p.position != *i).map(|(i, p)| (p, i))
    }

    /// Wire fault names declared more than once.
    pub fn duplicate_faults(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.faults
            .iter()
            .map(|f| f.wire_fault_name.as_str())
            .filter(|name| !seen.insert(*name))
            .collect()
    }
}

/// Errors raised while reading or writing a catalog file.
#[derive(Debug, Error)]
pub enum CatalogFileError {
    /// I/O error while accessing the file
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The file was not a valid catalog document
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// On-disk representation of an operation table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Catalog format version
    pub version: String,
    /// Operation descriptors
    pub operations: Vec<OperationDescriptor>,
}

impl CatalogFile {
    /// Wrap descriptors with the current format version.
    pub fn new(operations: Vec<OperationDescriptor>) -> Self {
        Self { version: CATALOG_FORMAT_VERSION.to_string(), operations }
    }

    /// Load a catalog from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogFileError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the catalog as pretty-printed JSON.
    pub fn to_file(&self, path: &Path) -> Result<(), CatalogFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        // Ensure file ends with a newline (POSIX standard)
        use std::io::Write;
        writeln!(file)?;
        Ok(())
    }
}
