//! Unit tests for operation descriptors and catalog files

use tracker_ir::*;

fn get_user() -> OperationDescriptor {
    OperationDescriptor::new("getUser")
        .describe("Returns a user by username")
        .param("token", xsd::string(), Some("String"))
        .param("username", xsd::string(), Some("String"))
        .returns(WireType::named("beans", "RemoteUser"), Some("RemoteUser"))
        .fault(FaultKind::AuthenticationFailed)
        .fault(FaultKind::PermissionDenied)
}

#[test]
fn test_builder_assigns_positions_in_order() {
    let op = get_user();

    assert_eq!(op.arity(), 2);
    assert_eq!(op.params[0].name, "token");
    assert_eq!(op.params[0].position, 0);
    assert_eq!(op.params[1].name, "username");
    assert_eq!(op.params[1].position, 1);
    assert!(!op.returns.is_void());
    assert_eq!(op.returns.local_type(), Some("RemoteUser"));
    assert!(op.misplaced_param().is_none());
}

#[test]
fn test_misplaced_param_reports_first_disagreement() {
    let mut op = get_user();
    op.params.swap(0, 1);

    let (param, index) = op.misplaced_param().expect("positions swapped");
    assert_eq!(param.name, "username");
    assert_eq!(param.position, 1);
    assert_eq!(index, 0);
}

#[test]
fn test_declared_fault_names_preserve_order() {
    let op = get_user();

    assert_eq!(
        op.declared_fault_names(),
        vec!["RemoteAuthenticationException".to_string(), "RemotePermissionException".to_string()]
    );
    assert!(op.duplicate_faults().is_empty());

    let dup = get_user().fault(FaultKind::AuthenticationFailed);
    assert_eq!(dup.duplicate_faults(), vec!["RemoteAuthenticationException"]);
}

#[test]
fn test_referenced_wire_types() {
    let op = get_user();
    let referenced: Vec<String> = op.referenced_wire_types().map(|t| t.to_string()).collect();
    assert_eq!(referenced, vec!["xsd:string", "xsd:string", "beans:RemoteUser"]);

    let void = OperationDescriptor::new("deleteUser")
        .param("token", xsd::string(), None)
        .param("username", xsd::string(), None);
    assert!(void.returns.is_void());
    assert_eq!(void.returns.wire_type(), None);
    assert_eq!(void.referenced_wire_types().count(), 2);
}

#[test]
fn test_descriptor_json_shape() {
    let json = serde_json::to_value(get_user()).expect("serialize descriptor");

    assert_eq!(json["name"], "getUser");
    assert_eq!(json["params"][1]["wire_type"], "xsd:string");
    assert_eq!(json["returns"]["kind"], "value");
    assert_eq!(json["returns"]["wire_type"], "beans:RemoteUser");
    assert_eq!(json["faults"][0]["kind"], "authentication_failed");
    assert!(json["returns"].get("nullable").is_none());

    let void = serde_json::to_value(OperationDescriptor::new("logout")).expect("serialize");
    assert_eq!(void["returns"], serde_json::json!({"kind": "void"}));
}

#[test]
fn test_nullable_return() {
    let op = get_user().nullable();
    assert!(op.returns.is_nullable());
    assert!(!get_user().returns.is_nullable());
    assert!(!OperationDescriptor::new("logout").nullable().returns.is_nullable());

    let json = serde_json::to_value(&op).expect("serialize");
    assert_eq!(json["returns"]["nullable"], true);
    let back: OperationDescriptor = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, op);
}

#[test]
fn test_catalog_file_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("nested").join("catalog.json");

    let catalog = CatalogFile::new(vec![get_user(), OperationDescriptor::new("logout")]);
    catalog.to_file(&path).expect("write catalog");

    let content = std::fs::read_to_string(&path).expect("read back");
    assert!(content.ends_with('\n'));

    let loaded = CatalogFile::from_file(&path).expect("load catalog");
    assert_eq!(loaded.version, CATALOG_FORMAT_VERSION);
    assert_eq!(loaded.operations, catalog.operations);
}

#[test]
fn test_catalog_file_rejects_bad_wire_type() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"{"version":"0.1.0","operations":[{"name":"x","params":[{"name":"a","wire_type":"unqualified","position":0}],"returns":{"kind":"void"},"faults":[]}]}"#,
    )
    .expect("write file");

    match CatalogFile::from_file(&path) {
        Err(CatalogFileError::Json(e)) => assert!(e.to_string().contains("not namespace-qualified")),
        other => panic!("expected JSON error, got {:?}", other),
    }
}
