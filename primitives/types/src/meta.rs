use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Information about the tracker server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteServerInfo {
    /// Public base URL
    pub base_url: String,
    /// Product version, e.g. `4.4.1`
    pub version: String,
    /// Build number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<String>,
    /// Build date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_date: Option<DateTime<Utc>>,
    /// Edition name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    /// Server clock at the time of the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_time: Option<DateTime<Utc>>,
}

macro_rules! named_constant {
    ($(#[$doc:meta] $ty:ident),* $(,)?) => {
        $(
            #[$doc]
            #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
            #[serde(rename_all = "camelCase")]
            pub struct $ty {
                /// Constant id referenced from issues
                pub id: String,
                /// Display name
                pub name: String,
                /// Description
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub description: Option<String>,
                /// Icon URL
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub icon: Option<String>,
            }
        )*
    };
}

named_constant! {
    /// A workflow status.
    RemoteStatus,
    /// An issue priority.
    RemotePriority,
    /// An issue type.
    RemoteIssueType,
}
