#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Tracker Domain Data Model
//!
//! This crate defines the typed entities exchanged with the remote tracker
//! service: users and groups, projects with their versions and components,
//! issues with comments and worklogs, permission schemes, and server
//! metadata. Every entity knows the wire type it travels as through the
//! [`Entity`] trait, which is what the client catalog uses to register the
//! entity with the type registry.

use ir::WireType;

/// Issues, comments and field updates.
pub mod issue;
/// Server information and named constants (statuses, priorities, issue types).
pub mod meta;
/// Permissions and permission schemes.
pub mod permission;
/// Projects, versions and components.
pub mod project;
/// Users and groups.
pub mod user;
/// Work log entries.
pub mod worklog;

pub use issue::{RemoteComment, RemoteCustomFieldValue, RemoteFieldValue, RemoteIssue};
pub use meta::{RemoteIssueType, RemotePriority, RemoteServerInfo, RemoteStatus};
pub use permission::{RemotePermission, RemotePermissionMapping, RemotePermissionScheme};
pub use project::{RemoteComponent, RemoteProject, RemoteVersion};
pub use user::{RemoteGroup, RemoteUser};
pub use worklog::RemoteWorklog;

/// Namespace prefix under which the tracker publishes its entity types.
pub const BEANS: &str = "beans";

/// A domain entity with a fixed wire type.
pub trait Entity {
    /// Local part of the entity's wire type name, e.g. `RemoteUser`.
    const WIRE_NAME: &'static str;

    /// Fully qualified wire type of a single entity.
    fn wire_type() -> WireType { WireType::named(BEANS, Self::WIRE_NAME) }

    /// Wire type of an array of this entity.
    fn array_wire_type() -> WireType { WireType::array_of(Self::wire_type()) }
}

macro_rules! entity {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(impl Entity for $ty {
            const WIRE_NAME: &'static str = $name;
        })*
    };
}

entity! {
    RemoteUser => "RemoteUser",
    RemoteGroup => "RemoteGroup",
    RemoteProject => "RemoteProject",
    RemoteVersion => "RemoteVersion",
    RemoteComponent => "RemoteComponent",
    RemoteIssue => "RemoteIssue",
    RemoteComment => "RemoteComment",
    RemoteFieldValue => "RemoteFieldValue",
    RemoteCustomFieldValue => "RemoteCustomFieldValue",
    RemoteWorklog => "RemoteWorklog",
    RemotePermission => "RemotePermission",
    RemotePermissionMapping => "RemotePermissionMapping",
    RemotePermissionScheme => "RemotePermissionScheme",
    RemoteServerInfo => "RemoteServerInfo",
    RemoteStatus => "RemoteStatus",
    RemotePriority => "RemotePriority",
    RemoteIssueType => "RemoteIssueType",
}
