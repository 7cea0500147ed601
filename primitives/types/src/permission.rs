use serde::{Deserialize, Serialize};

use crate::user::RemoteUser;

/// A permission known to the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePermission {
    /// Display name, e.g. `Browse Projects`
    pub name: String,
    /// Numeric permission id
    pub permission: i64,
}

/// Users granted one permission within a scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePermissionMapping {
    /// The permission
    pub permission: RemotePermission,
    /// Users holding it
    #[serde(default)]
    pub remote_entities: Vec<RemoteUser>,
}

/// A named set of permission grants that projects can share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePermissionScheme {
    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Scheme name
    pub name: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Grants
    #[serde(default)]
    pub permission_mappings: Vec<RemotePermissionMapping>,
}
