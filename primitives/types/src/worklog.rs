use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time logged against an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteWorklog {
    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Login name of the author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Free-text comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// When the work started
    pub start_date: DateTime<Utc>,
    /// Duration in tracker notation, e.g. `1h 30m`
    pub time_spent: String,
    /// Duration in seconds, as computed by the server
    #[serde(default)]
    pub time_spent_in_seconds: i64,
    /// Group the entry is visible to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_level: Option<String>,
    /// Project role id the entry is visible to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_level_id: Option<String>,
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
