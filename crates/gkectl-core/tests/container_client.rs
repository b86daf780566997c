//! Integration tests for the container API client using a mock server

use gkectl_core::{
    ApiError, ClientConfig, ClusterHandle, ClusterController, ClusterManager, ClusterStatus,
    ClusterUpdate, ContainerClient, CoreError, CreateClusterRequest, OperationStatus,
    OperationWaiter, WaitConfig,
};
use gkectl_core::api::ClusterSpec;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASE: &str = "/v1/projects/my-project/locations/us-central1";

fn client(server: &MockServer) -> ContainerClient {
    ContainerClient::new(&ClientConfig::new(server.uri(), Some("test-token".to_string()))).unwrap()
}

fn cluster_json(status: &str, master: &str) -> serde_json::Value {
    json!({
        "name": "demo",
        "currentMasterVersion": master,
        "currentNodeVersion": master,
        "status": status,
        "locations": ["us-central1-a", "us-central1-b", "us-central1-c"]
    })
}

fn not_found_json() -> serde_json::Value {
    json!({
        "error": {
            "code": 404,
            "message": "Not found: projects/my-project/locations/us-central1/clusters/demo.",
            "status": "NOT_FOUND"
        }
    })
}

// ============================================================================
// Client tests
// ============================================================================

#[tokio::test]
async fn test_get_cluster_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/clusters/demo")))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_json("RUNNING", "1.9.2-gke.1")))
        .expect(1)
        .mount(&server)
        .await;

    let cluster = client(&server)
        .get_cluster("my-project", "us-central1", "demo")
        .await
        .unwrap();

    assert_eq!(cluster.status, ClusterStatus::Running);
    assert_eq!(cluster.current_master_version, "1.9.2-gke.1");
    assert_eq!(cluster.locations.len(), 3);
}

#[tokio::test]
async fn test_get_cluster_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/clusters/demo")))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_json()))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_cluster("my-project", "us-central1", "demo")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("clusters/demo"));
}

#[tokio::test]
async fn test_create_cluster_posts_spec() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE}/clusters")))
        .and(body_json(json!({"cluster": {"name": "demo", "initialNodeCount": 3}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operation-1",
            "operationType": "CREATE_CLUSTER",
            "status": "RUNNING",
            "startTime": "2024-05-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateClusterRequest {
        cluster: ClusterSpec {
            name: "demo".to_string(),
            initial_node_count: 3,
        },
    };
    let op = client(&server)
        .create_cluster("my-project", "us-central1", &request)
        .await
        .unwrap();

    assert_eq!(op.name, "operation-1");
    assert_eq!(op.status, OperationStatus::Running);
    assert!(op.start_time.is_some());
}

#[tokio::test]
async fn test_update_cluster_wraps_update_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{BASE}/clusters/demo")))
        .and(body_json(json!({"update": {"desiredNodeVersion": "1.9.2-gke.1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operation-2",
            "operationType": "UPGRADE_NODES",
            "status": "PENDING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let op = client(&server)
        .update_cluster(
            "my-project",
            "us-central1",
            "demo",
            &ClusterUpdate::node_version("1.9.2-gke.1"),
        )
        .await
        .unwrap();

    assert_eq!(op.operation_type, "UPGRADE_NODES");
}

#[tokio::test]
async fn test_get_server_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/serverConfig")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "defaultClusterVersion": "1.9.2-gke.1",
            "validMasterVersions": ["1.10.1-gke.5", "1.9.2-gke.1"],
            "validNodeVersions": ["1.10.1-gke.5", "1.9.2-gke.1", "1.8.4-gke.1"]
        })))
        .mount(&server)
        .await;

    let config = client(&server)
        .get_server_config("my-project", "us-central1")
        .await
        .unwrap();

    assert_eq!(config.valid_master_versions[0], "1.10.1-gke.5");
    assert_eq!(config.valid_node_versions.len(), 3);
}

#[tokio::test]
async fn test_server_error_is_retryable_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/operations/operation-1")))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_operation("my-project", "us-central1", "operation-1")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ServerError { status: 503, .. }));
    assert!(err.is_retryable());
}

// ============================================================================
// Controller over HTTP
// ============================================================================

fn controller(server: &MockServer) -> ClusterController<ContainerClient> {
    let waiter = OperationWaiter::new(WaitConfig {
        interval: Duration::from_millis(10),
        timeout: Some(Duration::from_secs(10)),
    });
    ClusterController::new(
        client(server),
        ClusterHandle::new("my-project", "us-central1", "demo", 3),
        waiter,
    )
}

#[tokio::test]
async fn test_create_and_upgrade_flow() {
    let server = MockServer::start().await;

    // first lookup misses, later lookups see the cluster
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/clusters/demo")))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_json()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE}/clusters")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operation-create",
            "operationType": "CREATE_CLUSTER",
            "status": "RUNNING"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/operations/operation-create")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operation-create",
            "status": "RUNNING"
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/operations/operation-create")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operation-create",
            "status": "DONE"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/clusters/demo")))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_json("RUNNING", "1.9.2-gke.1")))
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    let created = controller.create().await.unwrap();
    assert_eq!(created.current_master_version, "1.9.2-gke.1");

    Mock::given(method("PUT"))
        .and(path(format!("{BASE}/clusters/demo")))
        .and(body_json(json!({"update": {"desiredNodeVersion": "1.9.2-gke.1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operation-nodes",
            "status": "PENDING"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/operations/operation-nodes")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operation-nodes",
            "status": "DONE"
        })))
        .mount(&server)
        .await;

    controller.upgrade_nodes("1.9").await.unwrap();
}

#[tokio::test]
async fn test_failed_create_operation_carries_remote_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/clusters/demo")))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_json()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{BASE}/clusters")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operation-create",
            "status": "RUNNING"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/operations/operation-create")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operation-create",
            "status": "ABORTING",
            "error": {"code": 8, "message": "Insufficient regional quota to satisfy request"}
        })))
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    let err = controller.create().await.unwrap_err();

    match err {
        CoreError::OperationFailed { status, detail, .. } => {
            assert_eq!(status, OperationStatus::Aborting);
            assert!(detail.contains("Insufficient regional quota"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
