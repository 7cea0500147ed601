use std::sync::Arc;

use config::Config;
use ir::{CatalogFile, FaultKind, ReturnSpec};
use registry::{Bindings, OperationCatalog, OperationCatalogReader, RegistryError};
use serde_json::{json, Value};
use tempfile::TempDir;
use tracker_client::{
    bindings_from_file, connect, tracker_bindings, tracker_catalog, tracker_descriptors,
    tracker_types, CallError, CallInvoker, ClientError, InvokeError, RemoteFault, Session,
    TrackerClient,
};
use transport::mock::ScriptedTransport;
use transport::Transport;
use types::{RemoteFieldValue, RemoteIssue, RemoteUser};

fn client(transport: Arc<ScriptedTransport>) -> TrackerClient {
    TrackerClient::new(CallInvoker::new(tracker_bindings().expect("bindings"), transport))
}

#[tokio::test]
async fn test_session_lifecycle() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_body(json!("tok123")).push_body(json!({"name": "alice"})).push_body(json!(true));
    let client = client(transport.clone());

    let session = client.open_session("admin", "secret").await.expect("login");
    assert_eq!(session.token(), "tok123");
    assert_eq!(session.username(), "admin");

    let user = client.get_user(&session, "alice".to_string()).await.expect("getUser");
    assert_eq!(user, Some(RemoteUser::named("alice")));

    assert!(client.close_session(session).await.expect("logout"));

    let sent = transport.requests();
    let operations: Vec<_> = sent.iter().map(|r| r.operation.as_str()).collect();
    assert_eq!(operations, ["login", "getUser", "logout"]);
    assert_eq!(sent[0].params, vec![json!("admin"), json!("secret")]);
    assert_eq!(sent[1].params, vec![json!("tok123"), json!("alice")]);
    assert_eq!(sent[2].params, vec![json!("tok123")]);
}

#[tokio::test]
async fn test_forwarder_surfaces_declared_fault() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_fault("RemotePermissionException", "no access");
    let session = Session::from_token("bob", "tok");

    let err = client(transport).get_user(&session, "alice".to_string()).await.expect_err("fault");
    assert_eq!(err.fault_kind(), Some(FaultKind::PermissionDenied));
    assert_eq!(err.to_string(), "getUser: permission_denied fault: no access");
}

#[tokio::test]
async fn test_lookup_forwarders_map_null_to_none() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_body(Value::Null).push_body(Value::Null).push_body(json!({"name": "devs"}));
    let client = client(transport);
    let session = Session::from_token("bob", "tok");

    let user = client.get_user(&session, "ghost".to_string()).await.expect("getUser");
    assert_eq!(user, None);
    let issue = client.get_issue(&session, "TRK-404".to_string()).await.expect("getIssue");
    assert!(issue.is_none());
    let group = client.get_group(&session, "devs".to_string()).await.expect("getGroup");
    assert_eq!(group.map(|g| g.name), Some("devs".to_string()));
}

#[tokio::test]
async fn test_forwarder_surfaces_undeclared_fault() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_fault("QuotaExceeded", "slow down");
    let session = Session::from_token("bob", "tok");

    let err = client(transport).get_user(&session, "alice".to_string()).await.expect_err("fault");
    assert_eq!(err.fault_kind(), None);
    assert!(matches!(
        err.remote_fault(),
        Some(RemoteFault::Undeclared(fault)) if fault.kind == "QuotaExceeded"
    ));
}

#[tokio::test]
async fn test_update_issue_sends_field_array() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_body(json!({"key": "TRK-1", "project": "TRK", "summary": "Renamed"}));
    let session = Session::from_token("bob", "tok");

    let issue: RemoteIssue = client(transport.clone())
        .update_issue(&session, "TRK-1".to_string(), vec![RemoteFieldValue::single("summary", "Renamed")])
        .await
        .expect("updateIssue");
    assert_eq!(issue.summary, "Renamed");
    assert_eq!(
        transport.requests()[0].params[2],
        json!([{"id": "summary", "values": ["Renamed"]}])
    );
}

#[tokio::test]
async fn test_void_forwarder() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_body(Value::Null).push_body(json!([]));
    let session = Session::from_token("bob", "tok");
    let client = client(transport.clone());

    client.delete_issue(&session, "TRK-1".to_string()).await.expect("deleteIssue");
    let found = client
        .get_issues_from_jql_search(&session, "project = TRK".to_string(), 10)
        .await
        .expect("search");
    assert!(found.is_empty());
    assert_eq!(transport.requests()[1].params[2], json!(10));
}

#[tokio::test]
async fn test_unexpected_return_shape() {
    // A catalog that disagrees with the forwarder: getUser declared void.
    let descriptors = tracker_descriptors().into_iter().map(|mut d| {
        if d.name == "getUser" {
            d.returns = ReturnSpec::Void;
        }
        d
    });
    let catalog = OperationCatalog::from_descriptors(descriptors).expect("catalog");
    let bindings = Bindings::new(catalog, tracker_types().expect("types")).expect("bindings");
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_body(json!({"name": "alice"}));
    let client = TrackerClient::new(CallInvoker::new(bindings, transport));

    let err = client
        .get_user(&Session::from_token("bob", "tok"), "alice".to_string())
        .await
        .expect_err("void result for a typed forwarder");
    assert!(matches!(
        err,
        CallError::UnexpectedReturn { ref operation, ref expected }
            if operation == "getUser" && expected == "RemoteUser"
    ));
}

#[tokio::test]
async fn test_forwarder_transport_error() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_error(transport::TransportError::Http("connection reset".to_string()));

    let err = client(transport).get_server_info().await.expect_err("transport");
    assert!(matches!(err, CallError::Invoke(InvokeError::Transport(_))));
}

#[test]
fn test_catalog_file_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("catalog.json");
    let catalog = tracker_catalog().expect("catalog");
    catalog.to_file(&path).expect("write catalog");

    let bindings = bindings_from_file(&path).expect("catalog file validates");
    assert_eq!(bindings.catalog().list_operations(), catalog.list_operations());
    assert_eq!(
        bindings.catalog().lookup("getUser").expect("getUser"),
        catalog.lookup("getUser").expect("getUser")
    );
}

#[test]
fn test_catalog_file_with_reordered_params_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("catalog.json");
    let descriptors = tracker_descriptors()
        .into_iter()
        .map(|mut d| {
            if d.name == "getUser" {
                d.params.swap(0, 1);
            }
            d
        })
        .collect();
    CatalogFile::new(descriptors).to_file(&path).expect("write catalog");

    match bindings_from_file(&path) {
        Err(RegistryError::MisplacedParameter { operation, param, .. }) => {
            assert_eq!(operation, "getUser");
            assert_eq!(param, "username");
        }
        other => panic!("expected a misplaced parameter, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_connect_builds_http_client() {
    let client = connect(&Config::default()).expect("default config connects");
    assert_eq!(client.invoker().transport().endpoint(), config::DEFAULT_ENDPOINT);
    assert!(client.invoker().bindings().catalog().get_operation("getUser").is_some());
}

#[test]
fn test_connect_keeps_existing_subscriber() {
    let dir = TempDir::new().expect("tempdir");
    connect(&Config::default()).expect("first connect");

    let mut config = Config::default();
    config.logging.file = Some(dir.path().join("client.log"));
    let client = connect(&config).expect("second connect with a log file");
    assert_eq!(client.invoker().transport().endpoint(), config::DEFAULT_ENDPOINT);
    assert!(dir.path().join("client.log").exists());
}

#[test]
fn test_connect_rejects_bad_config() {
    let mut config = Config::default();
    config.endpoint.url = "tracker.example.com".to_string();
    assert!(matches!(connect(&config), Err(ClientError::Config(_))));

    let mut config = Config::default();
    config.catalog.path = Some("/definitely/not/here/catalog.json".into());
    assert!(matches!(connect(&config), Err(ClientError::Registry(_))));
}
