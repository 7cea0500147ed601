#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Call Registries — the read-only tables every remote call consults.
//!
//! This crate provides the two registries the invoker needs: the
//! [`OperationCatalog`] of operation descriptors keyed by name, and the
//! [`TypeRegistry`] mapping wire types to local Rust types. Both are filled
//! during an explicit registration phase, frozen, and then cross-checked by
//! [`Bindings::new`] so that configuration mistakes surface at startup rather
//! than on the first call that happens to hit them.

pub mod type_registry;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ir::{short_type_name, CatalogFile, CatalogFileError, OperationDescriptor, WireType};
use thiserror::Error;

pub use type_registry::{
    local, CodecError, LocalValue, Resolved, TypeMapping, TypeRegistry, TypeRegistryBuilder,
};

/// Errors raised while building or validating the registries.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A wire type was registered twice.
    #[error("wire type {0} is already registered")]
    DuplicateType(WireType),

    /// Array wire types are derived from their element and cannot be registered.
    #[error("cannot register array wire type {0}; register its element type instead")]
    ArrayRegistration(WireType),

    /// Two descriptors share a name.
    #[error("operation '{0}' is already registered")]
    DuplicateOperation(String),

    /// A descriptor declares the same wire fault more than once.
    #[error("operation '{operation}' declares fault '{fault}' more than once")]
    DuplicateFault {
        /// Operation name
        operation: String,
        /// Repeated wire fault name
        fault: String,
    },

    /// Parameter positions are not `0..arity` in list order.
    #[error("operation '{operation}' lists parameter '{param}' at index {index} but records position {position}")]
    MisplacedParameter {
        /// Operation name
        operation: String,
        /// Parameter name
        param: String,
        /// Index in the parameter list
        index: usize,
        /// Position recorded on the parameter
        position: usize,
    },

    /// No descriptor has this name.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// Descriptors reference wire types the type registry cannot satisfy.
    #[error("{} catalog validation issue(s): {}", .0.len(), join_issues(.0))]
    Invalid(Vec<ValidationIssue>),

    /// A catalog file could not be read or written.
    #[error("catalog file error: {0}")]
    CatalogFile(#[from] CatalogFileError),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues.iter().map(|i| i.to_string()).collect::<Vec<_>>().join("; ")
}

/// One problem found while cross-checking the catalog against the type registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A parameter or return wire type has no mapping.
    UnknownType {
        /// Operation name
        operation: String,
        /// `param <name>` or `return`
        slot: String,
        /// The unresolved wire type
        wire_type: WireType,
    },
    /// The descriptor's local type annotation disagrees with the registry.
    LocalTypeMismatch {
        /// Operation name
        operation: String,
        /// `param <name>` or `return`
        slot: String,
        /// Local type the descriptor expects
        declared: String,
        /// Local type the registry maps the wire type to
        registered: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownType { operation, slot, wire_type } => {
                write!(f, "{}: {} uses unregistered wire type {}", operation, slot, wire_type)
            }
            ValidationIssue::LocalTypeMismatch { operation, slot, declared, registered } => write!(
                f,
                "{}: {} declares local type {} but the registry maps it to {}",
                operation, slot, declared, registered
            ),
        }
    }
}

/// Mutable registration phase of an [`OperationCatalog`].
#[derive(Default)]
pub struct OperationCatalogBuilder {
    operations: BTreeMap<String, OperationDescriptor>,
}

impl OperationCatalogBuilder {
    /// Create an empty builder.
    pub fn new() -> Self { Self::default() }

    /// Add a descriptor. Names must be unique, parameter positions must run
    /// `0..arity` in list order, and declared faults must be disjoint.
    pub fn add(&mut self, descriptor: OperationDescriptor) -> Result<&mut Self, RegistryError> {
        if self.operations.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateOperation(descriptor.name));
        }
        if let Some((param, index)) = descriptor.misplaced_param() {
            return Err(RegistryError::MisplacedParameter {
                operation: descriptor.name.clone(),
                param: param.name.clone(),
                index,
                position: param.position,
            });
        }
        if let Some(fault) = descriptor.duplicate_faults().first() {
            return Err(RegistryError::DuplicateFault {
                operation: descriptor.name.clone(),
                fault: fault.to_string(),
            });
        }
        self.operations.insert(descriptor.name.clone(), descriptor);
        Ok(self)
    }

    /// Add every descriptor in `descriptors`.
    pub fn extend(
        &mut self,
        descriptors: impl IntoIterator<Item = OperationDescriptor>,
    ) -> Result<&mut Self, RegistryError> {
        for descriptor in descriptors {
            self.add(descriptor)?;
        }
        Ok(self)
    }

    /// Freeze the registrations.
    pub fn build(self) -> OperationCatalog { OperationCatalog { operations: self.operations } }
}

/// Immutable table of operation descriptors keyed by name.
///
/// Registration order carries no meaning; iteration is by name.
#[derive(Debug, Default)]
pub struct OperationCatalog {
    operations: BTreeMap<String, OperationDescriptor>,
}

impl OperationCatalog {
    /// Start a new registration phase.
    pub fn builder() -> OperationCatalogBuilder { OperationCatalogBuilder::new() }

    /// Build a catalog from a list of descriptors.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = OperationDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut builder = Self::builder();
        builder.extend(descriptors)?;
        Ok(builder.build())
    }

    /// Load a catalog from a JSON catalog file.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        Self::from_descriptors(CatalogFile::from_file(path)?.operations)
    }

    /// Save the catalog as a JSON catalog file.
    pub fn to_file(&self, path: &Path) -> Result<(), RegistryError> {
        Ok(CatalogFile::new(self.operations.values().cloned().collect()).to_file(path)?)
    }

    /// Resolve a descriptor by name.
    pub fn lookup(&self, name: &str) -> Result<&OperationDescriptor, RegistryError> {
        self.operations.get(name).ok_or_else(|| RegistryError::UnknownOperation(name.to_string()))
    }

    /// Iterate over all descriptors, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> { self.operations.values() }

    /// Cross-check every descriptor against `types`.
    ///
    /// Every referenced wire type must resolve, and where a descriptor
    /// annotates a local type it must match the registered one. All issues are
    /// collected and reported together.
    pub fn validate(&self, types: &TypeRegistry) -> Result<(), RegistryError> {
        let mut issues = Vec::new();
        for op in self.operations.values() {
            let slots = op
                .params
                .iter()
                .map(|p| (format!("param {}", p.name), &p.wire_type, p.local_type.as_deref()))
                .chain(
                    op.returns
                        .wire_type()
                        .map(|w| ("return".to_string(), w, op.returns.local_type())),
                );
            for (slot, wire_type, declared) in slots {
                let Some(registered) = types.local_type_of(wire_type) else {
                    issues.push(ValidationIssue::UnknownType {
                        operation: op.name.clone(),
                        slot,
                        wire_type: wire_type.clone(),
                    });
                    continue;
                };
                if let Some(declared) = declared {
                    let declared = short_type_name(declared);
                    if declared != registered {
                        issues.push(ValidationIssue::LocalTypeMismatch {
                            operation: op.name.clone(),
                            slot,
                            declared,
                            registered,
                        });
                    }
                }
            }
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Invalid(issues))
        }
    }
}

/// Read-only interface to the [`OperationCatalog`].
pub trait OperationCatalogReader {
    /// Get all operation names, sorted.
    fn list_operations(&self) -> Vec<&str>;

    /// Get an operation descriptor by name.
    ///
    /// Returns `None` if no operation with the given name exists.
    fn get_operation(&self, name: &str) -> Option<&OperationDescriptor>;

    /// Get the total number of operations.
    fn operation_count(&self) -> usize;
}

impl OperationCatalogReader for OperationCatalog {
    fn list_operations(&self) -> Vec<&str> { self.operations.keys().map(|s| s.as_str()).collect() }

    fn get_operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.get(name)
    }

    fn operation_count(&self) -> usize { self.operations.len() }
}

/// A validated pair of registries, shared read-only by every call.
#[derive(Debug)]
pub struct Bindings {
    catalog: OperationCatalog,
    types: TypeRegistry,
}

impl Bindings {
    /// Validate `catalog` against `types` and freeze both for sharing.
    pub fn new(catalog: OperationCatalog, types: TypeRegistry) -> Result<Arc<Self>, RegistryError> {
        catalog.validate(&types)?;
        logging::trace(
            "registry",
            &format!(
                "bindings ready: {} operations, {} wire types",
                catalog.operation_count(),
                types.len()
            ),
        );
        Ok(Arc::new(Self { catalog, types }))
    }

    /// The operation catalog.
    pub fn catalog(&self) -> &OperationCatalog { &self.catalog }

    /// The type registry.
    pub fn types(&self) -> &TypeRegistry { &self.types }
}
