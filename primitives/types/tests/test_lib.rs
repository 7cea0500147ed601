use chrono::{TimeZone, Utc};
use serde_json::json;
use types::*;

#[test]
fn test_entity_wire_types() {
    assert_eq!(RemoteUser::wire_type().to_string(), "beans:RemoteUser");
    assert_eq!(RemoteIssue::array_wire_type().to_string(), "ArrayOf_beans:RemoteIssue");
    assert_eq!(RemotePermissionScheme::WIRE_NAME, "RemotePermissionScheme");
}

#[test]
fn test_user_uses_camel_case_and_omits_absent_fields() {
    let user = RemoteUser::named("alice");
    assert_eq!(serde_json::to_value(&user).expect("serialize"), json!({"name": "alice"}));

    let full: RemoteUser =
        serde_json::from_value(json!({"name": "bob", "fullname": "Bob B", "email": "b@x.io"}))
            .expect("deserialize");
    assert_eq!(full.fullname.as_deref(), Some("Bob B"));
    assert_eq!(full.email.as_deref(), Some("b@x.io"));
}

#[test]
fn test_issue_field_names() {
    let issue = RemoteIssue {
        project: "TRK".to_string(),
        summary: "Crash on save".to_string(),
        issue_type: Some("1".to_string()),
        due_date: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).single().expect("valid date")),
        fix_versions: vec![RemoteVersion { name: "1.0".to_string(), ..Default::default() }],
        ..Default::default()
    };

    let value = serde_json::to_value(&issue).expect("serialize");
    assert_eq!(value["type"], "1");
    assert_eq!(value["dueDate"], "2024-05-01T00:00:00Z");
    assert_eq!(value["fixVersions"][0]["name"], "1.0");
    assert!(value.get("affectsVersions").is_none());
    assert_eq!(value["votes"], 0);

    let back: RemoteIssue = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, issue);
}

#[test]
fn test_worklog_requires_start_and_time_spent() {
    let missing = serde_json::from_value::<RemoteWorklog>(json!({"comment": "x"}));
    assert!(missing.is_err());

    let worklog: RemoteWorklog = serde_json::from_value(json!({
        "startDate": "2024-03-04T09:00:00Z",
        "timeSpent": "1h 30m",
        "timeSpentInSeconds": 5400
    }))
    .expect("deserialize");
    assert_eq!(worklog.time_spent_in_seconds, 5400);
}

#[test]
fn test_named_constants_share_shape() {
    let status: RemoteStatus =
        serde_json::from_value(json!({"id": "3", "name": "In Progress"})).expect("status");
    let priority: RemotePriority =
        serde_json::from_value(json!({"id": "3", "name": "Major", "icon": "/p.png"}))
            .expect("priority");
    assert_eq!(status.name, "In Progress");
    assert_eq!(priority.icon.as_deref(), Some("/p.png"));
}

#[test]
fn test_permission_scheme_nesting() {
    let scheme = RemotePermissionScheme {
        id: Some(10000),
        name: "Default".to_string(),
        description: None,
        permission_mappings: vec![RemotePermissionMapping {
            permission: RemotePermission { name: "Browse Projects".to_string(), permission: 10 },
            remote_entities: vec![RemoteUser::named("alice")],
        }],
    };
    let value = serde_json::to_value(&scheme).expect("serialize");
    assert_eq!(value["permissionMappings"][0]["permission"]["permission"], 10);
    assert_eq!(value["permissionMappings"][0]["remoteEntities"][0]["name"], "alice");
}
