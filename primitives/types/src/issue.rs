use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::project::{RemoteComponent, RemoteVersion};

/// An issue.
///
/// Reference fields (`status`, `priority`, `issue_type`) hold constant ids as
/// returned by the metadata operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteIssue {
    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Issue key, e.g. `TRK-42`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Key of the owning project
    pub project: String,
    /// One-line summary
    pub summary: String,
    /// Long description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Environment the issue was observed in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Issue type id
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    /// Status id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Priority id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Login name of the assignee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Login name of the reporter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    /// Due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Number of votes
    #[serde(default)]
    pub votes: i64,
    /// Components the issue belongs to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<RemoteComponent>,
    /// Versions affected
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affects_versions: Vec<RemoteVersion>,
    /// Versions the issue is fixed in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fix_versions: Vec<RemoteVersion>,
    /// Custom field values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_field_values: Vec<RemoteCustomFieldValue>,
}

/// Value of a custom field on an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCustomFieldValue {
    /// Custom field id, e.g. `customfield_10010`
    pub custom_field_id: String,
    /// Parent option key for cascading fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Raw values
    #[serde(default)]
    pub values: Vec<String>,
}

/// A single field update used by update and workflow operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFieldValue {
    /// Field id, e.g. `summary` or `customfield_10010`
    pub id: String,
    /// New values
    #[serde(default)]
    pub values: Vec<String>,
}

impl RemoteFieldValue {
    /// Update field `id` to a single value.
    pub fn single(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self { id: id.into(), values: vec![value.into()] }
    }
}

/// A comment on an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteComment {
    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Login name of the author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Comment text
    pub body: String,
    /// Group the comment is restricted to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_level: Option<String>,
    /// Project role id the comment is restricted to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_level: Option<String>,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    /// Login name of the last editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_author: Option<String>,
}
