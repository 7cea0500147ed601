//! Wire type to local type marshalling.
//!
//! Each [`TypeMapping`] ties one named wire type to one local Rust type and
//! holds the type-erased serialize/deserialize pair generated from that
//! type's serde implementation. Local values travel through the registry as
//! [`LocalValue`] boxes; a value whose runtime type is not the mapping's local
//! type is rejected before anything is encoded.
//!
//! Arrays are not registered one by one. Registering `T` under `W` makes
//! `ArrayOf_W` resolvable to `Vec<T>`, and every element of such an array is
//! (de)serialized through `W`'s own mapping.

use std::any::{type_name, Any};
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ir::{short_type_name, xsd, QualifiedName, WireType};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::RegistryError;

/// A type-erased local value.
pub type LocalValue = Box<dyn Any + Send + Sync>;

/// Box a value for passing through the registry.
pub fn local<T: Any + Send + Sync>(value: T) -> LocalValue { Box::new(value) }

/// Errors raised while marshalling a single value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The wire type has no registered mapping.
    #[error("no type mapping registered for wire type {0}")]
    UnknownType(WireType),

    /// The local value is not of the type the wire type maps to.
    #[error("value for {wire_type} must be a {expected}")]
    TypeMismatch {
        /// Wire type being marshalled
        wire_type: WireType,
        /// Local type the mapping expects
        expected: String,
    },

    /// serde failed to encode the local value.
    #[error("failed to serialize {wire_type}: {source}")]
    Serialize {
        /// Wire type being marshalled
        wire_type: WireType,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// The wire value did not match the local type's shape.
    #[error("failed to deserialize {wire_type}: {source}")]
    Deserialize {
        /// Wire type being marshalled
        wire_type: WireType,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// An array wire type received a non-array wire value.
    #[error("expected an array for {wire_type}, got {found}")]
    NotAnArray {
        /// Wire type being marshalled
        wire_type: WireType,
        /// JSON kind that was received instead
        found: &'static str,
    },
}

/// Failure inside one erased marshalling function, before wire context is attached.
#[derive(Debug)]
enum MarshalError {
    Mismatch,
    Serde(serde_json::Error),
}

type SerializeFn = fn(&(dyn Any + Send + Sync)) -> Result<Value, MarshalError>;
type DeserializeFn = fn(Value) -> Result<LocalValue, MarshalError>;
type SplitFn = for<'a> fn(&'a (dyn Any + Send + Sync)) -> Option<Vec<&'a (dyn Any + Send + Sync)>>;
type CollectFn = fn(Vec<LocalValue>) -> Result<LocalValue, MarshalError>;

fn serialize_as<T: Serialize + Any>(value: &(dyn Any + Send + Sync)) -> Result<Value, MarshalError> {
    let typed = value.downcast_ref::<T>().ok_or(MarshalError::Mismatch)?;
    serde_json::to_value(typed).map_err(MarshalError::Serde)
}

fn deserialize_as<T: DeserializeOwned + Any + Send + Sync>(
    value: Value,
) -> Result<LocalValue, MarshalError> {
    let typed: T = serde_json::from_value(value).map_err(MarshalError::Serde)?;
    Ok(Box::new(typed))
}

fn split_vec<T: Any + Send + Sync>(
    value: &(dyn Any + Send + Sync),
) -> Option<Vec<&(dyn Any + Send + Sync)>> {
    value
        .downcast_ref::<Vec<T>>()
        .map(|items| items.iter().map(|item| item as &(dyn Any + Send + Sync)).collect())
}

fn collect_vec<T: Any + Send + Sync>(items: Vec<LocalValue>) -> Result<LocalValue, MarshalError> {
    let typed = items
        .into_iter()
        .map(|item| item.downcast::<T>().map(|b| *b).map_err(|_| MarshalError::Mismatch))
        .collect::<Result<Vec<T>, _>>()?;
    Ok(Box::new(typed))
}

/// Sequence handling derived from an element mapping.
#[derive(Clone, Copy)]
struct ArrayRule {
    local_type: &'static str,
    split: SplitFn,
    collect: CollectFn,
}

/// Registration of one named wire type.
#[derive(Clone)]
pub struct TypeMapping {
    wire_type: WireType,
    local_type: &'static str,
    serialize: SerializeFn,
    deserialize: DeserializeFn,
    array: ArrayRule,
}

impl std::fmt::Debug for TypeMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeMapping")
            .field("wire_type", &self.wire_type)
            .field("local_type", &self.local_type)
            .finish()
    }
}

impl TypeMapping {
    fn of<T>(wire_type: WireType) -> Self
    where
        T: Serialize + DeserializeOwned + Any + Send + Sync,
    {
        Self {
            wire_type,
            local_type: type_name::<T>(),
            serialize: serialize_as::<T>,
            deserialize: deserialize_as::<T>,
            array: ArrayRule {
                local_type: type_name::<Vec<T>>(),
                split: split_vec::<T>,
                collect: collect_vec::<T>,
            },
        }
    }

    /// The wire type this mapping is registered under.
    pub fn wire_type(&self) -> &WireType { &self.wire_type }

    /// Full path of the local Rust type.
    pub fn local_type(&self) -> &'static str { self.local_type }

    fn encode(&self, value: &(dyn Any + Send + Sync), wire: &WireType) -> Result<Value, CodecError> {
        (self.serialize)(value).map_err(|e| match e {
            MarshalError::Mismatch => CodecError::TypeMismatch {
                wire_type: wire.clone(),
                expected: short_type_name(self.local_type),
            },
            MarshalError::Serde(source) => CodecError::Serialize { wire_type: wire.clone(), source },
        })
    }

    fn decode(&self, value: Value, wire: &WireType) -> Result<LocalValue, CodecError> {
        (self.deserialize)(value).map_err(|e| match e {
            MarshalError::Mismatch => CodecError::TypeMismatch {
                wire_type: wire.clone(),
                expected: short_type_name(self.local_type),
            },
            MarshalError::Serde(source) => CodecError::Deserialize { wire_type: wire.clone(), source },
        })
    }
}

/// How a wire type resolves against the registry.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// A registered named type
    Single(&'a TypeMapping),
    /// An array of a registered named type
    Array(&'a TypeMapping),
}

impl Resolved<'_> {
    /// Full path of the local Rust type the wire type resolves to.
    pub fn local_type(&self) -> &'static str {
        match self {
            Resolved::Single(m) => m.local_type,
            Resolved::Array(m) => m.array.local_type,
        }
    }
}

/// Mutable registration phase of a [`TypeRegistry`].
#[derive(Default)]
pub struct TypeRegistryBuilder {
    mappings: BTreeMap<QualifiedName, TypeMapping>,
}

impl TypeRegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self { Self::default() }

    /// Register local type `T` under the named wire type `wire_type`.
    ///
    /// Fails if `wire_type` is an array (arrays are derived from their element
    /// registration) or if it was already registered.
    pub fn register<T>(&mut self, wire_type: WireType) -> Result<&mut Self, RegistryError>
    where
        T: Serialize + DeserializeOwned + Any + Send + Sync,
    {
        let name = match &wire_type {
            WireType::Named(name) => name.clone(),
            WireType::ArrayOf(_) => return Err(RegistryError::ArrayRegistration(wire_type)),
        };
        if self.mappings.contains_key(&name) {
            return Err(RegistryError::DuplicateType(wire_type));
        }
        self.mappings.insert(name, TypeMapping::of::<T>(wire_type));
        Ok(self)
    }

    /// Register the schema primitives every tracker endpoint uses.
    pub fn with_primitives(&mut self) -> Result<&mut Self, RegistryError> {
        self.register::<String>(xsd::string())?
            .register::<i32>(xsd::int())?
            .register::<i64>(xsd::long())?
            .register::<bool>(xsd::boolean())?
            .register::<f64>(xsd::double())?
            .register::<DateTime<Utc>>(xsd::date_time())
    }

    /// Freeze the registrations.
    pub fn build(self) -> TypeRegistry { TypeRegistry { mappings: self.mappings } }
}

/// Immutable mapping from wire types to local types.
///
/// Safe to share across threads once built; nothing in it changes per call.
#[derive(Debug)]
pub struct TypeRegistry {
    mappings: BTreeMap<QualifiedName, TypeMapping>,
}

impl TypeRegistry {
    /// Start a new registration phase.
    pub fn builder() -> TypeRegistryBuilder { TypeRegistryBuilder::new() }

    /// Number of named registrations.
    pub fn len(&self) -> usize { self.mappings.len() }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool { self.mappings.is_empty() }

    /// Registered named wire types, in sorted order.
    pub fn wire_types(&self) -> impl Iterator<Item = &WireType> {
        self.mappings.values().map(|m| &m.wire_type)
    }

    /// Mapping for a named wire type.
    pub fn mapping(&self, name: &QualifiedName) -> Option<&TypeMapping> { self.mappings.get(name) }

    /// Resolve `wire_type`; only a single array layer is supported.
    pub fn resolve(&self, wire_type: &WireType) -> Result<Resolved<'_>, CodecError> {
        let resolved = match wire_type {
            WireType::Named(name) => self.mappings.get(name).map(Resolved::Single),
            WireType::ArrayOf(inner) => match inner.as_ref() {
                WireType::Named(name) => self.mappings.get(name).map(Resolved::Array),
                WireType::ArrayOf(_) => None,
            },
        };
        resolved.ok_or_else(|| CodecError::UnknownType(wire_type.clone()))
    }

    /// Whether `wire_type` resolves.
    pub fn contains(&self, wire_type: &WireType) -> bool { self.resolve(wire_type).is_ok() }

    /// Short local type name `wire_type` resolves to, e.g. `Vec<RemoteUser>`.
    pub fn local_type_of(&self, wire_type: &WireType) -> Option<String> {
        self.resolve(wire_type).ok().map(|r| short_type_name(r.local_type()))
    }

    /// Encode a local value as `wire_type`.
    pub fn serialize(
        &self,
        value: &(dyn Any + Send + Sync),
        wire_type: &WireType,
    ) -> Result<Value, CodecError> {
        match self.resolve(wire_type)? {
            Resolved::Single(mapping) => mapping.encode(value, wire_type),
            Resolved::Array(element) => {
                let items = (element.array.split)(value).ok_or_else(|| CodecError::TypeMismatch {
                    wire_type: wire_type.clone(),
                    expected: short_type_name(element.array.local_type),
                })?;
                let encoded = items
                    .into_iter()
                    .map(|item| element.encode(item, &element.wire_type))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(encoded))
            }
        }
    }

    /// Decode a wire value of `wire_type` into its local representation.
    ///
    /// A `null` wire value for an array type decodes to an empty sequence.
    pub fn deserialize(&self, value: Value, wire_type: &WireType) -> Result<LocalValue, CodecError> {
        match self.resolve(wire_type)? {
            Resolved::Single(mapping) => mapping.decode(value, wire_type),
            Resolved::Array(element) => {
                let items = match value {
                    Value::Array(items) => items,
                    Value::Null => Vec::new(),
                    other => {
                        return Err(CodecError::NotAnArray {
                            wire_type: wire_type.clone(),
                            found: json_kind(&other),
                        })
                    }
                };
                let decoded = items
                    .into_iter()
                    .map(|item| element.decode(item, &element.wire_type))
                    .collect::<Result<Vec<_>, _>>()?;
                (element.array.collect)(decoded).map_err(|_| CodecError::TypeMismatch {
                    wire_type: wire_type.clone(),
                    expected: short_type_name(element.array.local_type),
                })
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
