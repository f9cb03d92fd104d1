//! HTTP API tests against a mock server.

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use worlds_api::{ApiClient, ApiError, ApiRequest, WorldApi};
use worlds_core::{WorldAction, WorldCreate};

async fn api(server: &MockServer) -> WorldApi {
    WorldApi::new(ApiClient::new(format!("{}/api", server.uri())))
}

#[tokio::test]
async fn lists_worlds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/worlds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "arena", "plugin": "demo_game", "config": null}
        ])))
        .mount(&server)
        .await;

    let worlds = api(&server).await.worlds().await.unwrap();
    assert_eq!(worlds.len(), 1);
    assert_eq!(worlds[0].title, "arena");
}

#[tokio::test]
async fn creates_world_with_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/worlds"))
        .and(body_json(json!({"title": "arena", "plugin": "demo_game"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": 7, "title": "arena", "plugin": "demo_game", "config": null}),
        ))
        .mount(&server)
        .await;

    let world = api(&server)
        .await
        .create_world(&WorldCreate {
            title: "arena".into(),
            plugin: "demo_game".into(),
        })
        .await
        .unwrap();
    assert_eq!(world.id, 7);
}

#[tokio::test]
async fn start_world_passes_max_steps_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/worlds/3/start"))
        .and(query_param("maxSteps", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    api(&server).await.start_world(3, Some(100)).await.unwrap();
}

#[tokio::test]
async fn queues_action() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/worlds/3/actions/add"))
        .and(body_json(json!({"name": "left"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    api(&server)
        .await
        .send_action(3, &WorldAction { name: "left".into() })
        .await
        .unwrap();
}

#[tokio::test]
async fn reads_world_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/worlds/3/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isRunning": true,
            "steps": [{"id": 41, "stageId": 5}]
        })))
        .mount(&server)
        .await;

    let status = api(&server).await.status(3).await.unwrap();
    assert!(status.is_running);
    assert_eq!(status.steps[0].id, 41);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/worlds/9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = api(&server).await.world(9).await.unwrap_err();
    assert_matches!(err, ApiError::Status { status: 404, .. });
}

#[tokio::test]
async fn unexpected_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/worlds"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api(&server).await.worlds().await.unwrap_err();
    assert_matches!(err, ApiError::Decode(_));
}

#[tokio::test]
async fn paged_request_reads_the_total_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/worlds"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .insert_header("X-Total", "42"),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(format!("{}/api", server.uri()));
    let page = client
        .request_paged::<Vec<serde_json::Value>>(ApiRequest::get("worlds"))
        .await
        .unwrap();
    assert_eq!(page.total, 42);
    assert!(page.items.is_empty());
}
